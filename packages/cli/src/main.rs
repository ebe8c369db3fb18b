#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the collision dashboard core.
//!
//! Loads the merged collision CSV, applies a dashboard request built from
//! the command-line flags, and prints the resulting aggregates (or the
//! dropdown choices) as pretty JSON.

use std::{collections::BTreeSet, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use collision_dash_analytics::{compute_aggregates, filter_options, load_config};
use collision_dash_analytics_models::AggregateConfig;
use collision_dash_collision_models::{Borough, PersonInjury, PersonSex};
use collision_dash_ingest::{
    load_csv,
    parsing::{parse_category, parse_contributing_factor},
};
use collision_dash_query::{DashboardRequest, FilterSelections};

/// Environment variable consulted when `--data` is not given.
const DATA_PATH_ENV: &str = "COLLISION_DATA_PATH";

#[derive(Parser)]
#[command(name = "collision_dash", about = "NYC motor vehicle collision dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print KPIs and chart data for a filtered view
    Report {
        #[command(flatten)]
        data: DataArgs,
        /// Free-text search (e.g. "pedestrians injured in brooklyn 2022")
        #[arg(long)]
        query: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
        /// TOML file overriding aggregate settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the choices for every filter dropdown
    Options {
        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Path to the merged collision CSV (falls back to `COLLISION_DATA_PATH`)
    #[arg(long)]
    data: Option<PathBuf>,
}

impl DataArgs {
    fn resolve(self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        self.data
            .or_else(|| std::env::var_os(DATA_PATH_ENV).map(PathBuf::from))
            .ok_or_else(|| format!("No data file given: pass --data or set {DATA_PATH_ENV}").into())
    }
}

/// Dropdown selections. Each flag may be repeated.
#[derive(Args)]
struct FilterArgs {
    /// Borough (e.g. BROOKLYN, "STATEN ISLAND")
    #[arg(long = "borough")]
    boroughs: Vec<Borough>,
    /// Crash year
    #[arg(long = "year")]
    years: Vec<i32>,
    /// Vehicle type (e.g. SEDAN)
    #[arg(long = "vehicle")]
    vehicle_types: Vec<String>,
    /// Person type (e.g. PEDESTRIAN)
    #[arg(long = "person-type")]
    person_types: Vec<String>,
    /// Person sex (M or F)
    #[arg(long = "gender")]
    genders: Vec<PersonSex>,
    /// Contributing factor
    #[arg(long = "factor")]
    contributing_factors: Vec<String>,
    /// Person injury outcome (INJURED, KILLED, UNINJURED)
    #[arg(long = "injury")]
    injury_types: Vec<PersonInjury>,
}

impl FilterArgs {
    /// Converts the flags into selections, canonicalizing free-text values
    /// the same way the loader does.
    fn into_selections(self) -> FilterSelections {
        FilterSelections {
            boroughs: self.boroughs.into_iter().collect(),
            years: self.years.into_iter().collect(),
            vehicle_types: canonical(&self.vehicle_types, parse_category),
            person_types: canonical(&self.person_types, parse_category),
            genders: self.genders.into_iter().collect(),
            contributing_factors: canonical(&self.contributing_factors, parse_contributing_factor),
            injury_types: self.injury_types.into_iter().collect(),
        }
    }
}

fn canonical(values: &[String], normalize: fn(&str) -> String) -> BTreeSet<String> {
    values.iter().map(|v| normalize(v)).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            data,
            query,
            filters,
            config,
        } => {
            let config = match config {
                Some(path) => load_config(&std::fs::read_to_string(path)?)?,
                None => AggregateConfig::default(),
            };
            let dataset = load_csv(data.resolve()?)?;
            let request = DashboardRequest {
                query,
                filters: filters.into_selections(),
            };

            let view = request.apply(&dataset);
            log::info!("{} of {} rows selected", view.len(), dataset.len());

            let result = compute_aggregates(&view, &config);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Options { data } => {
            let dataset = load_csv(data.resolve()?)?;
            let options = filter_options(&dataset);
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
    }

    Ok(())
}
