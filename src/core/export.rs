use crate::domain::model::{Place, SpeciesRecord, TaxonGroup};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, WildlifeError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = WildlifeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(WildlifeError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: csv, json".to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct SpeciesDocument<'a> {
    place_id: u64,
    /// 只有從搜尋結果選出的地點才有名稱與類型
    place: Option<&'a Place>,
    group: Option<TaxonGroup>,
    generated_at: DateTime<Utc>,
    total: usize,
    species: &'a [SpeciesRecord],
}

/// Default file name, e.g. `animal_list_55071_aves.csv`.
pub fn export_file_name(place_id: u64, group: TaxonGroup, format: ExportFormat) -> String {
    format!(
        "animal_list_{}_{}.{}",
        place_id,
        group.as_str().to_ascii_lowercase(),
        format.extension()
    )
}

/// Writes a species table through a [`Storage`] backend.
pub struct SpeciesExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> SpeciesExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn export(
        &self,
        records: &[SpeciesRecord],
        place_id: u64,
        place: Option<&Place>,
        group: Option<TaxonGroup>,
        format: ExportFormat,
        file_name: &str,
    ) -> Result<String> {
        let data = match format {
            ExportFormat::Csv => to_csv(records)?,
            ExportFormat::Json => {
                let document = SpeciesDocument {
                    place_id,
                    place,
                    group,
                    generated_at: Utc::now(),
                    total: records.len(),
                    species: records,
                };
                serde_json::to_vec_pretty(&document)?
            }
        };

        tracing::debug!("Writing {} ({} bytes) to storage", file_name, data.len());
        self.storage.write_file(file_name, &data).await?;
        tracing::info!("📁 Exported {} species to {}", records.len(), file_name);

        Ok(file_name.to_string())
    }
}

/// 欄位順序固定：common_name, scientific_name, observation_count, image_url, wikipedia_url, taxon_id
pub fn to_csv(records: &[SpeciesRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "common_name",
        "scientific_name",
        "observation_count",
        "image_url",
        "wikipedia_url",
        "taxon_id",
    ])?;

    for record in records {
        let count = record.observation_count.to_string();
        let taxon_id = record.taxon_id.map(|id| id.to_string()).unwrap_or_default();
        writer.write_record([
            record.common_name.as_str(),
            record.scientific_name.as_str(),
            count.as_str(),
            record.image_url.as_deref().unwrap_or(""),
            record.wikipedia_url.as_deref().unwrap_or(""),
            taxon_id.as_str(),
        ])?;
    }

    writer.into_inner().map_err(|e| WildlifeError::IoError(e.into_error()))
}
