use crate::utils::error::{Result, WildlifeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A place candidate returned by the location resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub id: u64,
    /// iNaturalist place category code; null for community-curated places.
    pub place_type: Option<i64>,
}

/// One row of the normalized species table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub common_name: String,
    pub scientific_name: String,
    pub image_url: Option<String>,
    pub observation_count: u64,
    pub wikipedia_url: Option<String>,
    pub taxon_id: Option<u64>,
}

/// Normalizer output. `NoObservations` is the expected empty-result branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesListing {
    Observed(Vec<SpeciesRecord>),
    NoObservations,
}

impl SpeciesListing {
    pub fn records(&self) -> &[SpeciesRecord] {
        match self {
            Self::Observed(records) => records,
            Self::NoObservations => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// 轉成錯誤流程：沒有觀察紀錄時回傳 `EmptyResult`
    pub fn into_records(self) -> Result<Vec<SpeciesRecord>> {
        match self {
            Self::Observed(records) => Ok(records),
            Self::NoObservations => Err(WildlifeError::no_observations()),
        }
    }
}

/// Iconic taxa accepted by the species-counts query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxonGroup {
    Mammalia,
    Amphibia,
    Reptilia,
    Aves,
    Insecta,
    Mollusca,
    Arachnida,
}

impl TaxonGroup {
    pub const ALL: [TaxonGroup; 7] = [
        TaxonGroup::Mammalia,
        TaxonGroup::Amphibia,
        TaxonGroup::Reptilia,
        TaxonGroup::Aves,
        TaxonGroup::Insecta,
        TaxonGroup::Mollusca,
        TaxonGroup::Arachnida,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonGroup::Mammalia => "Mammalia",
            TaxonGroup::Amphibia => "Amphibia",
            TaxonGroup::Reptilia => "Reptilia",
            TaxonGroup::Aves => "Aves",
            TaxonGroup::Insecta => "Insecta",
            TaxonGroup::Mollusca => "Mollusca",
            TaxonGroup::Arachnida => "Arachnida",
        }
    }
}

impl fmt::Display for TaxonGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxonGroup {
    type Err = WildlifeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        TaxonGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| WildlifeError::InvalidConfigValueError {
                field: "taxon_group".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown animal class. Valid classes: {}",
                    TaxonGroup::ALL.map(|g| g.as_str()).join(", ")
                ),
            })
    }
}

/// Prompt variants for the fact generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactTemplate {
    TrackingSigns,
    ShortSummary,
}

const TRACKING_SIGNS_PROMPT: &str = "What signs can I use to track this animal?
    - What do the tracks look like?
    - Describe the scat
    - What feeding signs does this animal leave?
    - Where does the animal make its home/ bed/ nest/ den?
    - In which seasons is the animal active?
    Return response in markdown with no formating except
    using these as level 4 headings:
    Tracks, Scat, Feeding_signs, Home, Seasonal Activity
    ";

const SHORT_SUMMARY_PROMPT: &str = "Write a short Wikipedia-style summary of this animal
    as 3 to 5 markdown bullet points.
    Do not use complete sentences and do not use the animal's name in the bullets.
    Animal: ";

impl FactTemplate {
    pub fn prompt(&self) -> &'static str {
        match self {
            FactTemplate::TrackingSigns => TRACKING_SIGNS_PROMPT,
            FactTemplate::ShortSummary => SHORT_SUMMARY_PROMPT,
        }
    }

    /// 各模板的輸出 token 上限
    pub fn max_tokens(&self) -> u32 {
        match self {
            FactTemplate::TrackingSigns => 350,
            FactTemplate::ShortSummary => 100,
        }
    }

    pub fn render(&self, species_name: &str) -> String {
        format!("{}{}", self.prompt(), species_name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactTemplate::TrackingSigns => "tracking-signs",
            FactTemplate::ShortSummary => "short-summary",
        }
    }
}

impl fmt::Display for FactTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactTemplate {
    type Err = WildlifeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "tracking-signs" | "tracking" => Ok(FactTemplate::TrackingSigns),
            "short-summary" | "summary" => Ok(FactTemplate::ShortSummary),
            _ => Err(WildlifeError::InvalidConfigValueError {
                field: "template".to_string(),
                value: s.to_string(),
                reason: "Valid templates: tracking-signs, short-summary".to_string(),
            }),
        }
    }
}
