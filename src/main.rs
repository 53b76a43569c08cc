//! fipequote - FIPE vehicle reference prices from the command line
//!
//! Looks up brands, models, model years and reference prices from the FIPE
//! table, optionally comparing a price against what was paid.

use std::process::ExitCode;

use clap::Parser;

use fipequote::catalog::{CatalogService, UpstreamError};
use fipequote::cli::{Cli, Command};
use fipequote::config::Config;
use fipequote::logging;
use fipequote::money::Comparison;
use fipequote::output::{self, QuoteReport};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    // Load configuration first (no logging yet)
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    logging::init(&config.log, cli.verbose, cli.quiet);
    tracing::debug!(endpoint = %config.api.endpoint(), "Configuration loaded");

    let service = CatalogService::from_config(&config);

    match &cli.command {
        Command::Brands => {
            let listing = service.list_brands_with_source().await;
            if listing.is_fallback() {
                eprintln!("Warning: catalog unavailable, showing the offline brand list");
            }
            if cli.json {
                println!("{}", output::to_json(&listing)?);
            } else {
                println!("{}", output::entries_table(&listing.entries));
            }
        }
        Command::Models { brand } => {
            let models = service.list_models(brand).await.map_err(lookup_failed)?;
            print_entries(&models, cli.json)?;
        }
        Command::Years { brand, model } => {
            let years = service
                .list_years(brand, model)
                .await
                .map_err(lookup_failed)?;
            print_entries(&years, cli.json)?;
        }
        Command::Price {
            brand,
            model,
            year,
            spent,
        } => {
            let quote = service
                .get_price(brand, model, year)
                .await
                .map_err(lookup_failed)?;
            let comparison = spent
                .map(|spent| Comparison::from_quote(&quote, spent))
                .transpose()?;

            if cli.json {
                let report = QuoteReport {
                    quote: &quote,
                    comparison: comparison.as_ref(),
                };
                println!("{}", output::to_json(&report)?);
            } else {
                println!("{}", output::quote_text(&quote, comparison.as_ref()));
            }
        }
    }

    Ok(())
}

fn print_entries(entries: &[fipequote::catalog::CatalogEntry], json: bool) -> AppResult<()> {
    if json {
        println!("{}", output::to_json(entries)?);
    } else {
        println!("{}", output::entries_table(entries));
    }
    Ok(())
}

fn lookup_failed(err: UpstreamError) -> Box<dyn std::error::Error> {
    format!("lookup failed: {}", err).into()
}
