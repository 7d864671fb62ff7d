use crate::config::toml_config::InatConfig;
use crate::core::normalize::{filter_area_places, to_places};
use crate::domain::model::{Place, TaxonGroup};
use crate::domain::payload::{AutocompleteResponse, SpeciesCountsPage};
use crate::domain::ports::ObservationSource;
use crate::utils::error::{Result, WildlifeError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const SOURCE_NAME: &str = "iNaturalist";

/// HTTP client for the iNaturalist v1 API.
#[derive(Debug, Clone)]
pub struct INatClient {
    client: Client,
    base_url: String,
    timeout_seconds: u64,
    per_page: Option<u32>,
}

impl INatClient {
    pub fn new(config: &InatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WildlifeError::ConfigError {
                message: format!("Failed to build iNaturalist HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
            per_page: config.per_page,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| WildlifeError::from_transport(url, self.timeout_seconds, e))?;

        let status = response.status();
        tracing::debug!("iNaturalist response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WildlifeError::Network {
                url: url.to_string(),
                message: format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| WildlifeError::from_transport(url, self.timeout_seconds, e))?;

        serde_json::from_str(&body).map_err(|e| WildlifeError::malformed(SOURCE_NAME, e.to_string()))
    }
}

#[async_trait]
impl ObservationSource for INatClient {
    async fn resolve_locations(&self, query: &str) -> Result<Vec<Place>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint("places/autocomplete");
        let params = [("q", query.to_string()), ("order_by", "area".to_string())];
        let response: AutocompleteResponse = self.get_json(&url, &params).await?;

        let total = response.results.len();
        let places = to_places(filter_area_places(response.results));
        tracing::info!(
            "🔎 '{}' matched {} places ({} without an area dropped)",
            query,
            places.len(),
            total - places.len()
        );

        Ok(places)
    }

    async fn fetch_species_counts(
        &self,
        place_id: u64,
        group: TaxonGroup,
    ) -> Result<SpeciesCountsPage> {
        let url = self.endpoint("observations/species_counts");
        let mut params = vec![
            ("rank", "species".to_string()),
            ("iconic_taxa", group.as_str().to_string()),
            ("quality_grade", "research".to_string()),
            ("place_id", place_id.to_string()),
            ("order", "desc".to_string()),
        ];
        if let Some(per_page) = self.per_page {
            params.push(("per_page", per_page.to_string()));
        }

        let page: SpeciesCountsPage = self.get_json(&url, &params).await?;
        tracing::info!(
            "🐾 place {} / {}: {} species with research-grade observations",
            place_id,
            group,
            page.total_results
        );

        Ok(page)
    }
}
