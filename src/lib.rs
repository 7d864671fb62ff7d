pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::{inat::INatClient, llm::ChatCompletionClient, storage::LocalStorage};
pub use crate::core::{
    export::{ExportFormat, SpeciesExporter},
    facts::FactGenerator,
    normalize::normalize,
    session::{Session, WildlifeService},
};
pub use domain::model::{FactTemplate, Place, SpeciesListing, SpeciesRecord, TaxonGroup};
pub use utils::error::{Result, WildlifeError};
