//! Typed iNaturalist response bodies.
//!
//! Only the fields the resolver and normalizer read are declared; everything
//! else in the payload is ignored by serde. A missing required field fails
//! decoding and surfaces as `MalformedResponse`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub results: Vec<RawPlace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlace {
    pub id: u64,
    pub display_name: String,
    #[serde(default)]
    pub place_type: Option<i64>,
    #[serde(default)]
    pub geometry_geojson: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
}

impl RawPlace {
    /// 只有多邊形範圍的地點才算區域；缺少幾何或只有點位的不算
    pub fn has_area(&self) -> bool {
        match &self.geometry_geojson {
            Some(geometry) => !matches!(geometry.kind.as_str(), "Point" | "MultiPoint"),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesCountsPage {
    pub total_results: u64,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
    pub results: Vec<SpeciesCountEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesCountEntry {
    pub count: u64,
    pub taxon: Taxon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxon {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub preferred_common_name: Option<String>,
    #[serde(default)]
    pub default_photo: Option<Photo>,
    #[serde(default)]
    pub wikipedia_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub medium_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_place_with_null_geometry() {
        let place: RawPlace = serde_json::from_value(serde_json::json!({
            "id": 7,
            "display_name": "Zilker Park, TX, US",
            "place_type": null,
            "geometry_geojson": null,
            "uuid": "ignored"
        }))
        .unwrap();

        assert_eq!(place.place_type, None);
        assert!(!place.has_area());
    }

    #[test]
    fn test_point_geometry_has_no_area() {
        let place: RawPlace = serde_json::from_value(serde_json::json!({
            "id": 8,
            "display_name": "Barton Springs",
            "place_type": 9,
            "geometry_geojson": {"type": "Point", "coordinates": [-97.77, 30.26]}
        }))
        .unwrap();
        assert!(!place.has_area());
    }

    #[test]
    fn test_species_entry_requires_taxon_name() {
        let result = serde_json::from_value::<SpeciesCountEntry>(serde_json::json!({
            "count": 3,
            "taxon": {"id": 1, "preferred_common_name": "Raccoon"}
        }));
        assert!(result.is_err());
    }
}
