use crate::domain::model::{Place, TaxonGroup};
use crate::domain::payload::SpeciesCountsPage;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where place candidates and species counts come from.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    async fn resolve_locations(&self, query: &str) -> Result<Vec<Place>>;
    async fn fetch_species_counts(
        &self,
        place_id: u64,
        group: TaxonGroup,
    ) -> Result<SpeciesCountsPage>;
}

/// Sends a single user prompt to a chat-completion service and returns the text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}
