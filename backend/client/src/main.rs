//! Order form for the terminal.
//!
//! Fetches both catalogs, applies each flag as a form edit, shows the order
//! summary and submits the order.
//!
//! ```sh
//! client order --phone 5551234567 --name "Rex Owner" --email rex@example.com \
//!     --address "1 Bark Ln" --recipe Beef --pounds 10 --packaging Bulk
//! ```
use std::process::ExitCode;

use anyhow::Error;
use clap::{Parser, Subcommand};
use kitchen::{
    form::{FormEdit, OrderSession, Prefill, Rejected},
    models::OrderSubmission,
};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

mod api;
mod summary;

use api::{Api, DEFAULT_API_URL};
use summary::{order_summary, package_listing, recipe_listing};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "FOOD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recipes
    Recipes,
    /// List packaging options
    Packages,
    /// Dump every stored order row
    Orders,
    /// Fill in the order form and submit it
    Order(OrderArgs),
}

#[derive(clap::Args, Debug)]
struct OrderArgs {
    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    address: Option<String>,

    /// Defaults to the first recipe
    #[arg(long)]
    recipe: Option<String>,

    /// Whole pounds, defaults to 1 or rounded up from --total-food
    #[arg(long)]
    pounds: Option<String>,

    /// Daily food amount from the feeding calculator
    #[arg(long)]
    total_food: Option<f64>,

    /// Defaults to the first packaging option
    #[arg(long)]
    packaging: Option<String>,

    #[arg(long)]
    coupon: Option<String>,

    /// Show the summary without submitting
    #[arg(long)]
    dry_run: bool,
}

impl OrderArgs {
    fn edits(&self) -> Vec<FormEdit> {
        [
            self.phone.clone().map(FormEdit::Phone),
            self.name.clone().map(FormEdit::Name),
            self.email.clone().map(FormEdit::Email),
            self.address.clone().map(FormEdit::Address),
            self.pounds.clone().map(FormEdit::Pounds),
            self.packaging.clone().map(FormEdit::Packaging),
            self.coupon.clone().map(FormEdit::Coupon),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Error> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let api = Api::new(&args.api_url);

    match args.command {
        Command::Recipes => print!("{}", recipe_listing(&api.recipes().await?)),
        Command::Packages => print!("{}", package_listing(&api.packages().await?)),
        Command::Orders => {
            for row in api.orders().await? {
                println!("{}", row.join(" | "));
            }
        }
        Command::Order(order) => return place_order(&api, order).await,
    }

    Ok(ExitCode::SUCCESS)
}

async fn place_order(api: &Api, args: OrderArgs) -> Result<ExitCode, Error> {
    let mut session = OrderSession::new(Prefill {
        recipe: args.recipe.clone(),
        total_food: args.total_food,
    });

    let (recipes, packages) = tokio::join!(api.recipes(), api.packages());
    session.load_recipes(recipes);
    session.load_packages(packages);

    for edit in args.edits() {
        session.apply(edit);
    }

    println!("{}\n", order_summary(&session.quote()));

    if args.dry_run {
        for note in dry_run_notes(&session) {
            println!("{note}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let submission = match session.prepare_submission() {
        Ok(submission) => submission,
        Err(Rejected::MissingFields(errors)) => {
            for error in errors {
                eprintln!("{}: {}", error.field, error.message);
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(Rejected::PackageSize(message)) => {
            eprintln!("{message}");
            return Ok(ExitCode::FAILURE);
        }
    };

    match api.submit(&submission).await {
        Ok(_) => {
            println!("{}", confirm(&mut session, &submission));

            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            warn!("Order submission failed: {e:#}");
            eprintln!("Error submitting order");

            Ok(ExitCode::FAILURE)
        }
    }
}

/// What would block the order, or a ready line when nothing does.
fn dry_run_notes(session: &OrderSession) -> Vec<String> {
    if session.can_submit() {
        return vec!["Ready to submit".to_string()];
    }

    let mut notes: Vec<String> = session
        .form()
        .validate()
        .into_iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect();

    if let Some(message) = session.package_error() {
        notes.push(message.to_string());
    }

    notes
}

/// Accepted orders reset the form back to catalog defaults.
fn confirm(session: &mut OrderSession, submission: &OrderSubmission) -> String {
    session.submitted();

    format!("Order submitted!\nTotal: ${:.2}", submission.total)
}
