use crate::domain::model::{Place, SpeciesListing, SpeciesRecord};
use crate::domain::payload::{RawPlace, SpeciesCountEntry, SpeciesCountsPage};

/// 丟掉沒有面積（缺幾何或只有點位）的地點，保留 API 的排序
pub fn filter_area_places(places: Vec<RawPlace>) -> Vec<RawPlace> {
    places.into_iter().filter(RawPlace::has_area).collect()
}

pub fn to_places(places: Vec<RawPlace>) -> Vec<Place> {
    places
        .into_iter()
        .map(|raw| Place {
            name: raw.display_name,
            id: raw.id,
            place_type: raw.place_type,
        })
        .collect()
}

/// Flattens a species-counts page into table rows, in the order received.
pub fn normalize(page: &SpeciesCountsPage) -> SpeciesListing {
    if page.total_results == 0 || page.results.is_empty() {
        return SpeciesListing::NoObservations;
    }

    SpeciesListing::Observed(page.results.iter().map(to_record).collect())
}

fn to_record(entry: &SpeciesCountEntry) -> SpeciesRecord {
    let taxon = &entry.taxon;
    let common_name = taxon
        .preferred_common_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(&taxon.name)
        .to_string();

    SpeciesRecord {
        common_name,
        scientific_name: taxon.name.clone(),
        image_url: taxon
            .default_photo
            .as_ref()
            .and_then(|photo| photo.medium_url.clone()),
        observation_count: entry.count,
        wikipedia_url: taxon.wikipedia_url.clone(),
        taxon_id: taxon.id,
    }
}
