//! Entities that can appear on the map.
//!
//! Raw records arrive as loosely shaped JSON (`name` or `label`, nested or flat
//! coordinates, free-form category strings). They are validated once here, at
//! the boundary, into the closed [`MapEntity`] enum so nothing downstream has
//! to second-guess field presence.

use crate::{core::geo::LatLng, ui::style::Rgba, MapError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed set of catalog categories used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Residential,
    Landmark,
    Sightseeing,
    /// Anything outside the known set; never matches a specific filter
    #[serde(other)]
    Unclassified,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Residential, Category::Landmark, Category::Sightseeing];

    /// Lossy parse: unknown tags become [`Category::Unclassified`].
    pub fn parse(tag: &str) -> Self {
        tag.parse().unwrap_or(Category::Unclassified)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Residential => "RESIDENTIAL",
            Category::Landmark => "LANDMARK",
            Category::Sightseeing => "SIGHTSEEING",
            Category::Unclassified => "UNCLASSIFIED",
        }
    }
}

impl FromStr for Category {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RESIDENTIAL" => Ok(Category::Residential),
            "LANDMARK" => Ok(Category::Landmark),
            "SIGHTSEEING" => Ok(Category::Sightseeing),
            other => Err(MapError::InvalidCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Building specification block shown in popups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingSpecs {
    pub height: Option<String>,
    pub units: Option<u32>,
    pub occupancy: Option<String>,
}

impl BuildingSpecs {
    pub fn is_empty(&self) -> bool {
        self.height.is_none() && self.units.is_none() && self.occupancy.is_none()
    }
}

/// Presentational extras; none of these influence marker behavior
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDetails {
    pub address: Option<String>,
    pub rent: Option<String>,
    pub price: Option<f64>,
    pub safety_score: Option<f64>,
    pub specs: Option<BuildingSpecs>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<f64>,
    pub year_built: Option<i32>,
    pub kind: Option<String>,
    pub description: Option<String>,
}

/// A building or point of interest from the static catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntity {
    pub id: String,
    pub name: String,
    pub position: Option<LatLng>,
    pub category: Category,
    /// Explicit marker color, wins over every palette rule
    pub color: Option<Rgba>,
    pub details: EntityDetails,
}

impl CatalogEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: None,
            category,
            color: None,
            details: EntityDetails::default(),
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.position = Some(LatLng::new(lat, lng));
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_details(mut self, details: EntityDetails) -> Self {
        self.details = details;
        self
    }

    /// Listings are recognised by their identity, not their category.
    pub fn is_listing(&self) -> bool {
        self.id.contains("listing")
    }
}

/// A point returned by a search; always rendered as an emphasised marker
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPoint {
    pub id: String,
    pub label: String,
    pub position: Option<LatLng>,
    pub address: Option<String>,
}

impl SearchPoint {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position: None,
            address: None,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.position = Some(LatLng::new(lat, lng));
        self
    }
}

/// Anything eligible to become a marker
#[derive(Debug, Clone, PartialEq)]
pub enum MapEntity {
    Catalog(CatalogEntity),
    Search(SearchPoint),
}

impl MapEntity {
    /// Reconciliation key
    pub fn id(&self) -> &str {
        match self {
            MapEntity::Catalog(entity) => &entity.id,
            MapEntity::Search(point) => &point.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MapEntity::Catalog(entity) => &entity.name,
            MapEntity::Search(point) => &point.label,
        }
    }

    /// Position, only when both coordinates are present and finite.
    pub fn position(&self) -> Option<LatLng> {
        let position = match self {
            MapEntity::Catalog(entity) => entity.position,
            MapEntity::Search(point) => point.position,
        };
        position.filter(LatLng::is_finite)
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            MapEntity::Catalog(entity) => Some(entity.category),
            MapEntity::Search(_) => None,
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            MapEntity::Catalog(entity) => entity.details.address.as_deref(),
            MapEntity::Search(point) => point.address.as_deref(),
        }
    }

    pub fn details(&self) -> Option<&EntityDetails> {
        match self {
            MapEntity::Catalog(entity) => Some(&entity.details),
            MapEntity::Search(_) => None,
        }
    }

    pub fn is_search_point(&self) -> bool {
        matches!(self, MapEntity::Search(_))
    }
}

impl From<CatalogEntity> for MapEntity {
    fn from(entity: CatalogEntity) -> Self {
        MapEntity::Catalog(entity)
    }
}

impl From<SearchPoint> for MapEntity {
    fn from(point: SearchPoint) -> Self {
        MapEntity::Search(point)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Loosely typed record as supplied by data collaborators
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub coordinates: Option<RawCoordinates>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub address: Option<String>,
    pub rent: Option<String>,
    pub price: Option<f64>,
    pub safety_score: Option<f64>,
    pub specs: Option<BuildingSpecs>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<f64>,
    pub year_built: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
}

impl RawEntity {
    fn identity(&self) -> Result<String> {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(MapError::InvalidEntity("record has no id".to_string())),
        }
    }

    fn display_name(&self, id: &str) -> String {
        self.name
            .clone()
            .or_else(|| self.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Nested `coordinates` take precedence over flat `lat`/`lng`.
    fn position(&self) -> Option<LatLng> {
        match &self.coordinates {
            Some(coords) => LatLng::from_parts(coords.lat, coords.lng),
            None => LatLng::from_parts(self.lat, self.lng),
        }
    }
}

impl TryFrom<RawEntity> for CatalogEntity {
    type Error = MapError;

    fn try_from(raw: RawEntity) -> Result<Self> {
        let id = raw.identity()?;
        let color = match raw.color.as_deref() {
            Some(hex) => Some(Rgba::from_hex(hex)?),
            None => None,
        };

        Ok(Self {
            name: raw.display_name(&id),
            position: raw.position(),
            category: raw
                .category
                .as_deref()
                .map(Category::parse)
                .unwrap_or(Category::Unclassified),
            color,
            details: EntityDetails {
                address: raw.address,
                rent: raw.rent,
                price: raw.price,
                safety_score: raw.safety_score,
                specs: raw.specs.filter(|specs| !specs.is_empty()),
                bedrooms: raw.bedrooms,
                bathrooms: raw.bathrooms,
                square_footage: raw.square_footage,
                year_built: raw.year_built,
                kind: raw.kind,
                description: raw.description,
            },
            id,
        })
    }
}

impl TryFrom<RawEntity> for SearchPoint {
    type Error = MapError;

    fn try_from(raw: RawEntity) -> Result<Self> {
        let id = raw.identity()?;
        Ok(Self {
            label: raw
                .label
                .clone()
                .or_else(|| raw.name.clone())
                .unwrap_or_else(|| id.clone()),
            position: raw.position(),
            address: raw.address,
            id,
        })
    }
}

/// Parses a JSON array of search results. Records without an id are rejected.
pub fn search_points_from_json(json: &str) -> Result<Vec<SearchPoint>> {
    let raw: Vec<RawEntity> = serde_json::from_str(json)?;
    raw.into_iter().map(SearchPoint::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive_and_lossy() {
        assert_eq!(Category::parse("residential"), Category::Residential);
        assert_eq!(Category::parse(" LANDMARK "), Category::Landmark);
        assert_eq!(Category::parse("parking"), Category::Unclassified);
        assert!("parking".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_deserializes_unknown_as_unclassified() {
        let category: Category = serde_json::from_str("\"HOSPITAL\"").unwrap();
        assert_eq!(category, Category::Unclassified);
        let category: Category = serde_json::from_str("\"SIGHTSEEING\"").unwrap();
        assert_eq!(category, Category::Sightseeing);
    }

    #[test]
    fn test_raw_catalog_record_with_nested_coordinates() {
        let raw: RawEntity = serde_json::from_str(
            r#"{
                "id": "listing-001",
                "name": "Riverside Lofts",
                "coordinates": { "lat": 41.8869, "lng": -87.6355 },
                "category": "RESIDENTIAL",
                "rent": "$2,450/mo",
                "safetyScore": 87,
                "specs": { "height": "120m", "units": 240 }
            }"#,
        )
        .unwrap();
        let entity = CatalogEntity::try_from(raw).unwrap();

        assert_eq!(entity.name, "Riverside Lofts");
        assert_eq!(entity.category, Category::Residential);
        assert_eq!(entity.position, Some(LatLng::new(41.8869, -87.6355)));
        assert_eq!(entity.details.safety_score, Some(87.0));
        assert_eq!(entity.details.specs.as_ref().and_then(|s| s.units), Some(240));
        assert!(entity.is_listing());
    }

    #[test]
    fn test_half_coordinates_are_dropped() {
        let raw = RawEntity {
            id: Some("landmark-9".into()),
            lat: Some(41.0),
            ..RawEntity::default()
        };
        let entity = CatalogEntity::try_from(raw).unwrap();
        assert!(entity.position.is_none());
        assert!(MapEntity::from(entity).position().is_none());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let raw = RawEntity {
            name: Some("Nameless".into()),
            ..RawEntity::default()
        };
        assert!(matches!(
            CatalogEntity::try_from(raw),
            Err(MapError::InvalidEntity(_))
        ));
    }

    #[test]
    fn test_search_points_prefer_label() {
        let points = search_points_from_json(
            r#"[{ "id": "s1", "label": "Willis Tower", "name": "ignored", "lat": 41.8789, "lng": -87.6359 }]"#,
        )
        .unwrap();
        assert_eq!(points[0].label, "Willis Tower");
        assert_eq!(points[0].position, Some(LatLng::new(41.8789, -87.6359)));
    }

    #[test]
    fn test_non_finite_position_is_not_renderable() {
        let entity: MapEntity = SearchPoint::new("nan", "Broken").at(f64::NAN, 1.0).into();
        assert!(entity.position().is_none());
    }
}
