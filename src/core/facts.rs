use crate::config::toml_config::CacheConfig;
use crate::domain::model::FactTemplate;
use crate::domain::ports::ChatClient;
use crate::utils::error::{Result, WildlifeError};
use moka::future::Cache;
use std::time::Duration;

/// Generates species descriptions and memoizes them per (name, template).
///
/// The cache is bounded by entry count; failed generations are never cached.
/// Concurrent lookups of the same key share a single completion call.
pub struct FactGenerator<C: ChatClient> {
    client: C,
    cache: Cache<(String, FactTemplate), String>,
}

impl<C: ChatClient> FactGenerator<C> {
    pub fn new(client: C, max_entries: u64) -> Self {
        Self::with_idle_expiry(client, max_entries, None)
    }

    pub fn with_idle_expiry(client: C, max_entries: u64, idle: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(max_entries);
        if let Some(idle) = idle {
            builder = builder.time_to_idle(idle);
        }

        Self {
            client,
            cache: builder.build(),
        }
    }

    pub fn from_config(client: C, config: &CacheConfig) -> Self {
        Self::with_idle_expiry(client, config.max_entries, config.time_to_idle())
    }

    pub async fn generate_text(&self, species_name: &str, template: FactTemplate) -> Result<String> {
        let key = (species_name.to_string(), template);

        // 失敗的結果不會寫入快取
        self.cache
            .try_get_with(key, async {
                tracing::info!("✍️ Generating {} text for '{}'", template, species_name);
                let prompt = template.render(species_name);
                self.client.complete(&prompt, template.max_tokens()).await
            })
            .await
            .map_err(WildlifeError::from_shared)
    }

    /// Drops every memoized text.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}
