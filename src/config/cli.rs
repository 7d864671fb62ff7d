use crate::domain::model::{FactTemplate, TaxonGroup};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "local-wildlife")]
#[command(about = "Find wildlife observed near a place and learn how to track it")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List places matching a name, largest area first
    Locations {
        /// Region, county or city, e.g. "City of Austin"
        query: String,
    },
    /// List species observed at a place
    Species(SpeciesArgs),
    /// Describe a species
    Facts(FactsArgs),
    /// Search a place, pick a candidate, list its species and describe one
    Explore(ExploreArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SpeciesArgs {
    #[arg(long)]
    pub place_id: u64,

    /// Mammalia, Amphibia, Reptilia, Aves, Insecta, Mollusca or Arachnida
    #[arg(long)]
    pub group: Option<TaxonGroup>,

    #[arg(long, help = "Write the species table to the output directory")]
    pub export: bool,

    #[arg(long, help = "Export format (csv or json); overrides the config file")]
    pub format: Option<String>,

    #[arg(long, help = "Only print the first N species")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct FactsArgs {
    /// Common or scientific name of the animal
    pub species: String,

    #[arg(long, default_value = "tracking-signs")]
    pub template: FactTemplate,
}

#[derive(Debug, Clone, Args)]
pub struct ExploreArgs {
    pub query: String,

    #[arg(long)]
    pub group: Option<TaxonGroup>,

    #[arg(long, default_value = "0", help = "Index of the place candidate to use")]
    pub pick: usize,

    #[arg(long, help = "Index of the species to describe")]
    pub species: Option<usize>,

    #[arg(long, default_value = "tracking-signs")]
    pub template: FactTemplate,

    #[arg(long, help = "Only print the first N species")]
    pub limit: Option<usize>,
}
