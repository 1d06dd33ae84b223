use crate::{
    data::entity::{BuildingSpecs, CatalogEntity, Category, EntityDetails, MapEntity, RawEntity},
    Result,
};
use once_cell::sync::Lazy;

/// Static list of entities placed on the map, in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entities: Vec<CatalogEntity>,
}

static CHICAGO_LOOP: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new(vec![
        CatalogEntity::new("listing-001", "Riverside Lofts", Category::Residential)
            .at(41.8869, -87.6355)
            .with_details(EntityDetails {
                address: Some("333 W Wacker Dr, Chicago, IL".into()),
                rent: Some("$2,450/mo".into()),
                safety_score: Some(87.0),
                specs: Some(BuildingSpecs {
                    height: Some("120m".into()),
                    units: Some(240),
                    occupancy: Some("92% leased".into()),
                }),
                bedrooms: Some(2),
                bathrooms: Some(2.0),
                square_footage: Some(1_150.0),
                year_built: Some(2016),
                kind: Some("apartment".into()),
                ..EntityDetails::default()
            }),
        CatalogEntity::new("listing-002", "Lakeshore Residences", Category::Residential)
            .at(41.8858, -87.6181)
            .with_details(EntityDetails {
                address: Some("195 N Harbor Dr, Chicago, IL".into()),
                rent: Some("$3,100/mo".into()),
                price: Some(689_000.0),
                safety_score: Some(91.0),
                bedrooms: Some(3),
                bathrooms: Some(2.5),
                square_footage: Some(1_620.0),
                year_built: Some(2009),
                kind: Some("condo".into()),
                description: Some("Corner unit with lake and skyline views.".into()),
                ..EntityDetails::default()
            }),
        CatalogEntity::new("landmark-willis", "Willis Tower", Category::Landmark)
            .at(41.8789, -87.6359)
            .with_details(EntityDetails {
                address: Some("233 S Wacker Dr, Chicago, IL".into()),
                specs: Some(BuildingSpecs {
                    height: Some("442m".into()),
                    units: None,
                    occupancy: Some("Office".into()),
                }),
                year_built: Some(1973),
                ..EntityDetails::default()
            }),
        CatalogEntity::new("landmark-chase", "Chase Tower", Category::Landmark)
            .at(41.8820, -87.6300),
        CatalogEntity::new("sight-bean", "Cloud Gate", Category::Sightseeing)
            .at(41.8827, -87.6233)
            .with_details(EntityDetails {
                address: Some("Millennium Park, Chicago, IL".into()),
                description: Some("Reflective public sculpture in Millennium Park.".into()),
                ..EntityDetails::default()
            }),
        CatalogEntity::new("sight-art-institute", "Art Institute", Category::Sightseeing)
            .at(41.8796, -87.6237),
    ])
});

impl Catalog {
    pub fn new(entities: Vec<CatalogEntity>) -> Self {
        Self { entities }
    }

    /// Built-in sample catalog around the Chicago Loop
    pub fn chicago_loop() -> Self {
        CHICAGO_LOOP.clone()
    }

    /// Parses a JSON array of raw records. Invalid records are logged and
    /// skipped so one bad row does not empty the catalog.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Vec<RawEntity> = serde_json::from_str(json)?;
        let mut entities = Vec::with_capacity(raw.len());
        for (index, record) in raw.into_iter().enumerate() {
            match CatalogEntity::try_from(record) {
                Ok(entity) => entities.push(entity),
                Err(e) => log::warn!("Skipping catalog record {}: {}", index, e),
            }
        }
        Ok(Self::new(entities))
    }

    pub fn entities(&self) -> &[CatalogEntity] {
        &self.entities
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    /// Entities wrapped for reconciliation, in catalog order
    pub fn to_map_entities(&self) -> Vec<MapEntity> {
        self.entities.iter().cloned().map(MapEntity::Catalog).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
