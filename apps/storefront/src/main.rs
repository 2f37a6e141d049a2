//! # Evolv Storefront Command Line
//!
//! Drives a storefront session from the terminal. Every command prints its
//! result as JSON on stdout; failures print an `ApiError` on stderr and exit
//! with status 1.
//!
//! ```text
//! evolv-storefront add whey-choc --pack 6 --qty 2
//! evolv-storefront totals --checkout --promo SAVE10 --plain
//! evolv-storefront checkout --address home.json --payment cod
//! ```
//!
//! The cart is saved between runs. Discounts live for one run only, so
//! `totals` and `checkout` take `--promo` / `--points`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use evolv_client::PaymentConfirmation;
use evolv_core::{Address, Money, OrderTotals, PaymentMethod};
use evolv_storefront::commands::{self, PlaceOrderRequest, PromoResponse};
use evolv_storefront::state::StorefrontConfig;
use evolv_storefront::{init_tracing, ApiError, Storefront};

#[derive(Debug, Parser)]
#[command(name = "evolv-storefront", version, about = "Evolv storefront cart and checkout")]
struct Cli {
    /// Config file (default: storefront.toml in the platform config dir)
    #[arg(long, global = true, env = "EVOLV_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the cart
    Cart,

    /// Add packs of a product
    Add {
        product_id: String,
        #[arg(long)]
        pack: u32,
        #[arg(long, allow_negative_numbers = true)]
        qty: Option<i64>,
    },

    /// Set the quantity of a line (0 removes it)
    Update {
        product_id: String,
        #[arg(long)]
        pack: u32,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },

    /// Remove a line
    Remove {
        product_id: String,
        #[arg(long)]
        pack: u32,
    },

    /// Empty the cart
    Clear,

    /// Show order totals
    Totals {
        /// Include tax, as on the checkout page
        #[arg(long)]
        checkout: bool,
        /// Print a human-readable summary instead of JSON
        #[arg(long)]
        plain: bool,
        #[command(flatten)]
        discount: DiscountArgs,
    },

    /// Show the Evolv points balance
    Balance,

    /// Place an order for the cart
    Checkout {
        /// Shipping address as JSON
        #[arg(long)]
        address: PathBuf,
        /// Billing address as JSON (default: shipping address)
        #[arg(long)]
        billing: Option<PathBuf>,
        /// razorpay or cod
        #[arg(long, default_value = "razorpay")]
        payment: PaymentMethod,
        #[command(flatten)]
        discount: DiscountArgs,
    },
}

#[derive(Debug, Args)]
struct DiscountArgs {
    /// Apply a promo code
    #[arg(long)]
    promo: Option<String>,
    /// Redeem Evolv points
    #[arg(long, conflicts_with = "promo", allow_negative_numbers = true)]
    points: Option<i64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let body = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ApiError> {
    let config = StorefrontConfig::load(cli.config.as_deref())?;
    let store = Storefront::connect(&config).await?;
    info!("Storefront ready");

    match cli.command {
        Command::Cart => print_json(&commands::cart_items(&store)),
        Command::Add {
            product_id,
            pack,
            qty,
        } => print_json(&commands::add_to_cart(&store, &product_id, pack, qty).await?),
        Command::Update {
            product_id,
            pack,
            qty,
        } => print_json(&commands::update_quantity(&store, &product_id, pack, qty).await?),
        Command::Remove { product_id, pack } => {
            print_json(&commands::remove_item(&store, &product_id, pack).await)
        }
        Command::Clear => print_json(&commands::clear_cart(&store).await),
        Command::Totals {
            checkout,
            plain,
            discount,
        } => {
            apply_discount(&store, &discount).await?;
            let totals = if checkout {
                commands::checkout_totals(&store)
            } else {
                commands::cart_totals(&store)
            };
            if plain {
                print_plain(&config, &totals);
                Ok(())
            } else {
                print_json(&totals)
            }
        }
        Command::Balance => print_json(&commands::refresh_loyalty_balance(&store).await?),
        Command::Checkout {
            address,
            billing,
            payment,
            discount,
        } => {
            apply_discount(&store, &discount).await?;
            let request = PlaceOrderRequest {
                shipping_address: read_address(&address)?,
                billing_address: billing.as_deref().map(read_address).transpose()?,
                payment_method: payment,
            };
            checkout(&store, request).await
        }
    }
}

async fn apply_discount(store: &Storefront, args: &DiscountArgs) -> Result<(), ApiError> {
    if let Some(code) = &args.promo {
        if let PromoResponse::Superseded = commands::apply_promo_code(store, code).await? {
            return Err(ApiError::internal("Promo code was superseded"));
        }
    }
    if let Some(points) = args.points {
        commands::apply_evolv_points(store, points).await?;
    }
    Ok(())
}

/// Places the order and, for online payment, waits for the payment sheet
/// result on stdin: a `PaymentConfirmation` JSON line, or an empty line to
/// cancel.
async fn checkout(store: &Storefront, request: PlaceOrderRequest) -> Result<(), ApiError> {
    let placed = commands::place_order(store, request).await?;
    print_json(&placed)?;

    if placed.payment.is_none() {
        return Ok(());
    }

    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))?
    .map_err(|e| ApiError::internal(format!("Could not read payment result: {}", e)))?;

    let line = line.trim();
    let status = if line.is_empty() || line.eq_ignore_ascii_case("cancel") {
        commands::report_payment_failure(store, "Payment cancelled")?
    } else {
        let confirmation: PaymentConfirmation = serde_json::from_str(line)
            .map_err(|e| ApiError::validation(format!("Invalid payment result: {}", e)))?;
        commands::confirm_payment(store, confirmation).await?
    };
    print_json(&status)
}

fn read_address(path: &Path) -> Result<Address, ApiError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ApiError::validation(format!("Could not read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| ApiError::validation(format!("Invalid address in {}: {}", path.display(), e)))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn print_plain(config: &StorefrontConfig, totals: &OrderTotals) {
    let rows = [
        ("Subtotal", totals.subtotal),
        ("Shipping", totals.shipping_cost),
        ("Tax", totals.tax),
        ("Discount", Money::zero() - totals.discount),
        ("Total", totals.total),
    ];
    for (label, amount) in rows {
        println!("{:<10}{:>14}", label, config.format_currency(amount));
    }
}
