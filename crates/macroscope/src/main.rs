use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Commands::*, TraceLevel};
use dotenv::dotenv;
use futures::{stream, StreamExt};
use macroscope_client::{
    bond_frame, commodity_frame, macro_frame, market_frame, ApiClient, ClientConfig, Region,
    SearchConfig, SearchOutcome, SearchResult, StockSearch, SEARCH_FAILED_MESSAGE,
};
use macroscope_series::{ChartFrame, NormalizationMode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, subscriber, trace, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod ui;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::Trace => Level::TRACE,
        TraceLevel::Debug => Level::DEBUG,
        TraceLevel::Info => Level::INFO,
        TraceLevel::Warn => Level::WARN,
        TraceLevel::Error => Level::ERROR,
    };

    preprocess(log_level)?;
    trace!("Command line input recorded: {cli:#?}");

    let config = ClientConfig::from_env()?;
    debug!("API at {}", config.base_url);
    let api = ApiClient::new(&config)?;

    // "> macroscope <COMMAND>"
    match cli.command {
        // "> macroscope search <QUERY> [--limit N] [--once]"
        Search { query, limit, once } => {
            if once {
                let results = api.search(&query, limit).await?;
                print_results(&results);
            } else {
                search(api, query, limit).await?;
            }
        }

        // "> macroscope markets [--months 6] [--mode normalised] [--width 800]"
        Markets {
            months,
            mode,
            width,
        } => {
            info!("Fetching market indices");
            let payload = api.market(Some("indices"), true).await?;
            let frame = market_frame(&payload, today(), months, mode.into(), width);
            if frame.is_empty() {
                warn!("No index history available");
            }
            print_json(&frame)?;
        }

        // "> macroscope macro [--country 'United States'] [--indicator inflation] [--mode raw]"
        Macro {
            country,
            indicator,
            mode,
            width,
        } => {
            info!("Fetching {indicator} for {country}");
            let payload = api.macro_data(Some(country.as_str()), false).await?;
            print_json(&macro_frame(&payload, &country, indicator, mode.into(), width))?;
        }

        // "> macroscope bonds [--region us] [--months 6] [--mode normalised] [--width 800]"
        Bonds {
            region,
            months,
            mode,
            width,
        } => {
            let frame = bonds(&api, region, months, mode.into(), width).await;
            print_json(&frame)?;
        }

        // "> macroscope commodities [NAMES...] [--mode normalised] [--width 800]"
        Commodities { names, mode, width } => {
            info!("Fetching commodity histories");
            let payload = api.market(Some("commodities"), false).await?;
            print_json(&commodity_frame(&payload, &names, mode.into(), width))?;
        }

        // "> macroscope show [overview dashboard sentiment breadth all]"
        Show { section } => print_json(&api.summary(section.into()).await?)?,

        // "> macroscope ticker <SYMBOL>"
        Ticker { symbol } => print_json(&api.ticker(&symbol).await?)?,

        // "> macroscope stocks [SYMBOLS...]"
        Stocks { symbols } => {
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            print_json(&api.stocks(&symbols).await?)?;
        }

        // "> macroscope update"
        Update => {
            info!("Asking the backend to refresh its data");
            print_json(&api.update().await?)?;
        }

        // "> macroscope health"
        Health => print_json(&api.health().await?)?,
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No results.");
    }
    for result in results {
        println!("{}", ui::result_line(result));
    }
}

async fn search(api: ApiClient, query: String, limit: usize) -> Result<()> {
    let config = SearchConfig {
        limit,
        ..Default::default()
    };
    let mut search = StockSearch::new(Arc::new(api), config);
    let mut updates = search.subscribe();

    let pb = ui::spinner(format!("searching {query:?}"))?;
    let mut handle = search.set_query(query);

    let outcome = loop {
        tokio::select! {
            joined = &mut handle => break joined?,
            changed = updates.changed() => {
                if changed.is_err() {
                    break (&mut handle).await?;
                }
                let snapshot = updates.borrow_and_update().clone();
                pb.set_message(format!("{:?}: {} results", snapshot.state, snapshot.results.len()));
            }
        }
    };
    pb.finish_and_clear();

    match outcome {
        SearchOutcome::Finished { results, stop } => {
            debug!("search stopped: {stop:?}");
            print_results(&results);
        }
        SearchOutcome::Failed(e) => {
            error!("{e}");
            return Err(anyhow!(SEARCH_FAILED_MESSAGE));
        }
        SearchOutcome::Skipped => warn!("query too short to search"),
        SearchOutcome::Superseded => debug!("search superseded"),
    }

    Ok(())
}

async fn bonds(
    api: &ApiClient,
    region: Region,
    months: u32,
    mode: NormalizationMode,
    width: f64,
) -> ChartFrame {
    let bonds = region.bonds();
    info!("Fetching {} bond histories for {}", bonds.len(), region.label());

    let histories: Vec<_> = stream::iter(bonds)
        .map(|bond| async move {
            let symbol = bond.symbol();
            match api.bond_history(&symbol).await {
                Ok(points) => {
                    trace!("{symbol}: {} points", points.len());
                    Some((bond, points))
                }
                Err(e) => {
                    error!("{symbol} history failed: {e}");
                    None
                }
            }
        })
        .buffer_unordered(num_cpus::get())
        .filter_map(|fetched| async move { fetched })
        .collect()
        .await;

    let frame = bond_frame(histories, today(), months, mode, width);
    if frame.is_empty() {
        warn!("No bond time series data available for {}", region.label());
    }
    frame
}
