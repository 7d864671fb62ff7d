pub mod export;
pub mod facts;
pub mod normalize;
pub mod session;

pub use crate::domain::model::{FactTemplate, Place, SpeciesListing, SpeciesRecord, TaxonGroup};
pub use crate::domain::ports::{ChatClient, ObservationSource, Storage};
pub use crate::utils::error::Result;
