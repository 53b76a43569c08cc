//! Command-line interface parsing for fipequote
//!
//! Subcommands walk the catalog hierarchy (brands, models, years, price).
//! Global flags override values from the config file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::catalog::VehicleKind;
use crate::config::Config;
use crate::money::parse_amount;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The --spent value is not an amount
    #[error("Invalid amount: '{0}'. Use e.g. 30000, 30000.50 or \"R$ 30.000,50\"")]
    InvalidAmount(String),
}

/// fipequote - FIPE reference prices for Brazilian vehicles
#[derive(Parser, Debug)]
#[command(name = "fipequote")]
#[command(about = "FIPE vehicle reference prices from the command line")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Vehicle table to query
    #[arg(long, global = true, value_enum)]
    pub vehicle: Option<VehicleKind>,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List vehicle brands
    Brands,

    /// List the models of a brand
    Models {
        /// Brand code (see `brands`)
        brand: String,
    },

    /// List the model years of a model
    Years {
        /// Brand code
        brand: String,
        /// Model code (see `models`)
        model: String,
    },

    /// Show the reference price of a model year
    ///
    /// Examples:
    ///   fipequote price 21 4828 2015-1
    ///   fipequote price 21 4828 2015-1 --spent 30000
    Price {
        /// Brand code
        brand: String,
        /// Model code
        model: String,
        /// Year code (see `years`)
        year: String,
        /// Amount paid, compared against the reference price
        #[arg(long, value_name = "AMOUNT", value_parser = parse_amount_arg)]
        spent: Option<f64>,
    },
}

/// Parses the --spent argument
pub fn parse_amount_arg(s: &str) -> Result<f64, CliError> {
    parse_amount(s).map_err(|_| CliError::InvalidAmount(s.to_string()))
}

impl Cli {
    /// Applies command-line overrides on top of loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(kind) = self.vehicle {
            config.api.vehicle_kind = kind;
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
    }
}
