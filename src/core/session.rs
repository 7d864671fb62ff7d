use crate::core::facts::FactGenerator;
use crate::core::normalize::normalize;
use crate::domain::model::{FactTemplate, Place, SpeciesListing, SpeciesRecord, TaxonGroup};
use crate::domain::ports::{ChatClient, ObservationSource};
use crate::utils::error::{Result, WildlifeError};

/// Per-user selection state, passed explicitly into each handler.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub query: String,
    pub candidates: Vec<Place>,
    pub place: Option<Place>,
    pub group: Option<TaxonGroup>,
    pub listing: Option<SpeciesListing>,
    pub selected: Option<SpeciesRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(group: TaxonGroup) -> Self {
        Self {
            group: Some(group),
            ..Self::default()
        }
    }

    /// 選擇改變時清掉過期的物種列表
    fn clear_species(&mut self) {
        self.listing = None;
        self.selected = None;
    }

    /// Heading shown above a species table, e.g. "Aves in City of Austin".
    pub fn title(&self) -> Option<String> {
        match (&self.group, &self.place) {
            (Some(group), Some(place)) => Some(format!("{} in {}", group, place.name)),
            _ => None,
        }
    }
}

/// Handlers driving the search → species → description flow.
pub struct WildlifeService<S: ObservationSource, C: ChatClient> {
    source: S,
    facts: FactGenerator<C>,
}

impl<S: ObservationSource, C: ChatClient> WildlifeService<S, C> {
    pub fn new(source: S, facts: FactGenerator<C>) -> Self {
        Self { source, facts }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves `query`, stores the candidates and preselects the first one.
    pub async fn search<'s>(
        &self,
        session: &'s mut Session,
        query: &str,
    ) -> Result<&'s [Place]> {
        let candidates = self.source.resolve_locations(query).await?;

        session.query = query.to_string();
        session.place = candidates.first().cloned();
        session.candidates = candidates;
        session.clear_species();

        Ok(&session.candidates)
    }

    pub fn select_place(&self, session: &mut Session, index: usize) -> Result<Place> {
        let place = session
            .candidates
            .get(index)
            .cloned()
            .ok_or_else(|| WildlifeError::ValidationError {
                message: format!(
                    "place index {} out of range ({} candidates)",
                    index,
                    session.candidates.len()
                ),
            })?;

        if session.place.as_ref() != Some(&place) {
            session.clear_species();
        }
        session.place = Some(place.clone());
        Ok(place)
    }

    pub fn select_group(&self, session: &mut Session, group: TaxonGroup) {
        if session.group != Some(group) {
            session.clear_species();
        }
        session.group = Some(group);
    }

    pub async fn load_species(&self, session: &mut Session) -> Result<SpeciesListing> {
        let place_id = session
            .place
            .as_ref()
            .map(|place| place.id)
            .ok_or_else(|| WildlifeError::ValidationError {
                message: "no location selected".to_string(),
            })?;
        let group = session.group.ok_or_else(|| WildlifeError::ValidationError {
            message: "no animal class selected".to_string(),
        })?;

        let page = self.source.fetch_species_counts(place_id, group).await?;
        let listing = normalize(&page);
        if matches!(listing, SpeciesListing::NoObservations) {
            tracing::info!("No {} observations recorded for place {}", group, place_id);
        }

        session.selected = None;
        session.listing = Some(listing.clone());
        Ok(listing)
    }

    pub fn select_species(&self, session: &mut Session, index: usize) -> Result<SpeciesRecord> {
        let records = session
            .listing
            .as_ref()
            .map(SpeciesListing::records)
            .unwrap_or_default();

        let record = records
            .get(index)
            .cloned()
            .ok_or_else(|| WildlifeError::ValidationError {
                message: format!(
                    "species index {} out of range ({} species)",
                    index,
                    records.len()
                ),
            })?;

        session.selected = Some(record.clone());
        Ok(record)
    }

    /// Describes the selected species by its common name.
    pub async fn species_text(&self, session: &Session, template: FactTemplate) -> Result<String> {
        let record = session
            .selected
            .as_ref()
            .ok_or_else(|| WildlifeError::ValidationError {
                message: "no species selected".to_string(),
            })?;

        self.facts.generate_text(&record.common_name, template).await
    }
}
