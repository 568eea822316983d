use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use discount_scout::config::LOG_VAR;
use discount_scout::results::format_price;
use discount_scout::{
    ClientConfig, ResultsSummary, ResultsView, SearchApi, SearchApiClient, SearchController,
    SearchForm, SearchList, SearchMode, SearchResults, View, DEFAULT_SEARCH_LIMIT,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "discount-scout", version)]
#[command(about = "Compare hotel rates across AARP, AAA, Senior, and other discount programs")]
struct Cli {
    /// Backend base URL (overrides DISCOUNT_SCOUT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a search and show the comparison
    Search(SearchArgs),
    /// Show the results of an existing search
    Results {
        search_id: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the backend's summary of a search
    Summary { search_id: String },
    /// List recent searches
    Searches {
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
    /// Check that the backend is up
    Health,
}

#[derive(Args)]
struct SearchArgs {
    /// City, state or hotel name
    #[arg(long)]
    location: Option<String>,
    /// Check-in date (YYYY-MM-DD), defaults to 30 days from today
    #[arg(long)]
    check_in: Option<NaiveDate>,
    /// Check-out date (YYYY-MM-DD), defaults to 32 days from today
    #[arg(long)]
    check_out: Option<NaiveDate>,
    /// Number of guests, 1 to 10
    #[arg(long)]
    guests: Option<u32>,
    /// Discount type to test; repeat for several (defaults to aarp, aaa, senior)
    #[arg(short, long = "discount")]
    discounts: Vec<String>,
    /// Use the backend's instant demo search instead of a live one
    #[arg(long, default_value_t = false)]
    mock: bool,
    /// Print the raw results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Also save the results snapshot to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr so JSON output stays clean
    let filter = if cli.verbose > 0 {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url)?;
    }
    let client = SearchApiClient::with_config(config)?;
    info!("🏨 Discount Scout - {}", client.base_url());

    match cli.command {
        Command::Search(args) => run_search(client, args).await,
        Command::Results { search_id, json } => {
            let results = client
                .get_results(&search_id)
                .await
                .with_context(|| format!("Failed to fetch results for {}", search_id))?;
            print_results(&results, json)
        }
        Command::Summary { search_id } => {
            let summary = client
                .get_results_summary(&search_id)
                .await
                .with_context(|| format!("Failed to fetch summary for {}", search_id))?;
            print_summary(&summary);
            Ok(())
        }
        Command::Searches { limit } => {
            let list = client
                .list_searches(limit)
                .await
                .context("Failed to list searches")?;
            print_searches(&list);
            Ok(())
        }
        Command::Health => {
            let health = client.health_check().await.context("Health check failed")?;
            println!(
                "{} (environment: {}, version: {})",
                health.status,
                health.environment.as_deref().unwrap_or("unknown"),
                health.version.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }
    }
}

async fn run_search(client: SearchApiClient, args: SearchArgs) -> Result<()> {
    let mut form = SearchForm::new();
    if let Some(location) = args.location {
        form.set_location(location);
    }
    if let Some(check_in) = args.check_in {
        form.set_check_in(check_in);
    }
    if let Some(check_out) = args.check_out {
        form.set_check_out(check_out);
    }
    if let Some(guests) = args.guests {
        form.set_guests(guests);
    }
    if !args.discounts.is_empty() {
        form.set_discount_types(args.discounts);
    }

    let mode = if args.mock {
        SearchMode::Mock
    } else {
        SearchMode::Live
    };
    let controller = SearchController::new(client, mode);

    info!("Searching hotels...");
    controller.handle_search(&form.to_request()).await;

    let state = controller.state().await;
    match state.view() {
        View::Results(results) => {
            print_results(results, args.json)?;
            if let Some(path) = &args.output {
                let json = serde_json::to_string_pretty(results)?;
                tokio::fs::write(path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("💾 Saved results to {}", path.display());
            }
            Ok(())
        }
        View::Error(message) => bail!("{}", message),
        View::Loading | View::Idle => bail!("Search finished without results"),
    }
}

fn print_results(results: &SearchResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print!("{}", ResultsView::from_results(results).render());
    }
    Ok(())
}

fn print_summary(summary: &ResultsSummary) {
    println!("Search {} ({})", summary.search_id, summary.status);
    if let Some(message) = &summary.message {
        println!("{}", message);
        return;
    }

    println!(
        "{} results across {} hotels",
        summary.total_results, summary.hotels_compared
    );
    if let Some(best) = &summary.best_deal {
        println!(
            "Best deal: {} with {} at {}",
            best.hotel,
            best.discount_type.to_uppercase(),
            format_price(Some(best.price))
        );
    }

    for (hotel, rates) in &summary.by_hotel {
        println!("\n{}", hotel);
        for rate in rates {
            let total = if rate.available {
                format_price(rate.total_price)
            } else {
                "unavailable".to_string()
            };
            println!("   {:<10} {}", rate.discount_type.to_uppercase(), total);
        }
    }
}

fn print_searches(list: &SearchList) {
    println!("{} recent searches\n", list.count);
    for (i, search) in list.searches.iter().enumerate() {
        println!("{}. {} ({})", i + 1, search.location, search.status);
        println!("   {} to {}, {} guests", search.check_in, search.check_out, search.guests);
        println!("   ID: {}", search.search_id);
        println!("   Created: {}", search.created_at);
        println!();
    }
}
