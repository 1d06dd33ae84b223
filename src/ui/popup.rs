//! Popup content and placement.
//!
//! Popups are driven entirely by an entity and an anchor; they report user
//! actions back as [`PopupAction`] and never touch selection state.

use crate::{
    core::{
        config::PopupConfig,
        geo::{Point, Size},
        geometry::{place, PlacementPolicy},
    },
    data::entity::MapEntity,
    input::events::MapEvent,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ADDRESS: &str = "Chicago, IL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PopupKind {
    /// Compact card next to the clicked marker
    Summary,
    /// Full card, centred when there is no anchor
    Detail,
}

impl PopupKind {
    pub fn policy(&self) -> PlacementPolicy {
        match self {
            PopupKind::Summary => PlacementPolicy::Shift,
            PopupKind::Detail => PlacementPolicy::Flip,
        }
    }

    pub fn size(&self, config: &PopupConfig) -> Size {
        match self {
            PopupKind::Summary => config.summary_size,
            PopupKind::Detail => config.detail_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupAction {
    Close,
    ViewDetails,
}

/// One line of popup content
#[derive(Debug, Clone, PartialEq)]
pub enum PopupRow {
    Address(String),
    Rent(String),
    Safety(String),
    Spec { label: &'static str, value: String },
    Coordinates(String),
    Price(String),
    Rooms(String),
    Area(String),
    YearBuilt(String),
    Kind(String),
    Description(String),
}

impl PopupRow {
    pub fn text(&self) -> String {
        match self {
            PopupRow::Spec { label, value } => format!("{label}: {value}"),
            PopupRow::Address(s)
            | PopupRow::Rent(s)
            | PopupRow::Safety(s)
            | PopupRow::Coordinates(s)
            | PopupRow::Price(s)
            | PopupRow::Rooms(s)
            | PopupRow::Area(s)
            | PopupRow::YearBuilt(s)
            | PopupRow::Kind(s)
            | PopupRow::Description(s) => s.clone(),
        }
    }
}

/// A laid-out popup ready to paint
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub kind: PopupKind,
    pub entity: MapEntity,
    pub title: String,
    pub rows: Vec<PopupRow>,
    /// Top-left corner in screen pixels
    pub position: Point,
    pub size: Size,
}

impl PopupView {
    pub fn summary(entity: MapEntity, anchor: Point, viewport: Size, config: &PopupConfig) -> Self {
        Self::open(PopupKind::Summary, entity, Some(anchor), viewport, config)
    }

    pub fn detail(
        entity: MapEntity,
        anchor: Option<Point>,
        viewport: Size,
        config: &PopupConfig,
    ) -> Self {
        Self::open(PopupKind::Detail, entity, anchor, viewport, config)
    }

    pub fn open(
        kind: PopupKind,
        entity: MapEntity,
        anchor: Option<Point>,
        viewport: Size,
        config: &PopupConfig,
    ) -> Self {
        let size = kind.size(config);
        let position = match anchor {
            Some(anchor) => place(anchor, size, config.margin, viewport, kind.policy()),
            None => Point::new(
                ((viewport.width - size.width) / 2.0).max(config.margin),
                ((viewport.height - size.height) / 2.0).max(config.margin),
            ),
        };
        let rows = match kind {
            PopupKind::Summary => summary_rows(&entity),
            PopupKind::Detail => detail_rows(&entity),
        };

        Self {
            kind,
            title: entity.label().to_string(),
            entity,
            rows,
            position,
            size,
        }
    }

    pub fn id(&self) -> &str {
        self.entity.id()
    }

    pub fn contains(&self, pixel: &Point) -> bool {
        pixel.x >= self.position.x
            && pixel.y >= self.position.y
            && pixel.x <= self.position.x + self.size.width
            && pixel.y <= self.position.y + self.size.height
    }
}

fn summary_rows(entity: &MapEntity) -> Vec<PopupRow> {
    let mut rows = Vec::new();
    if let Some(address) = entity.address() {
        rows.push(PopupRow::Address(address.to_string()));
    }

    if let Some(details) = entity.details() {
        if let Some(rent) = &details.rent {
            rows.push(PopupRow::Rent(rent.clone()));
        }
        if let Some(score) = details.safety_score {
            rows.push(PopupRow::Safety(format!("{}/100", trim_number(score))));
        }
        if let Some(specs) = &details.specs {
            if let Some(height) = &specs.height {
                rows.push(PopupRow::Spec {
                    label: "Height",
                    value: height.clone(),
                });
            }
            if let Some(units) = specs.units {
                rows.push(PopupRow::Spec {
                    label: "Units",
                    value: units.to_string(),
                });
            }
            if let Some(occupancy) = &specs.occupancy {
                rows.push(PopupRow::Spec {
                    label: "Occupancy",
                    value: occupancy.clone(),
                });
            }
        }
    }

    if entity.address().is_none() {
        if let Some(at) = entity.position() {
            rows.push(PopupRow::Coordinates(format!("[{:.4}, {:.4}]", at.lat, at.lng)));
        }
    }
    rows
}

fn detail_rows(entity: &MapEntity) -> Vec<PopupRow> {
    let mut rows = vec![PopupRow::Address(
        entity.address().unwrap_or(DEFAULT_ADDRESS).to_string(),
    )];
    let Some(details) = entity.details() else {
        return rows;
    };

    if let Some(price) = details.price {
        rows.push(PopupRow::Price(format!("${}", group_thousands(price))));
    }
    if let Some(bedrooms) = details.bedrooms {
        rows.push(PopupRow::Rooms(format!("{bedrooms} Beds")));
    }
    if let Some(bathrooms) = details.bathrooms {
        rows.push(PopupRow::Rooms(format!("{} Baths", trim_number(bathrooms))));
    }
    if let Some(area) = details.square_footage {
        rows.push(PopupRow::Area(format!("{} sq ft", group_thousands(area))));
    }
    if let Some(year) = details.year_built {
        rows.push(PopupRow::YearBuilt(format!("Built {year}")));
    }
    if let Some(kind) = &details.kind {
        rows.push(PopupRow::Kind(capitalize(kind)));
    }
    if let Some(description) = &details.description {
        rows.push(PopupRow::Description(description.clone()));
    }
    rows
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// `1234567.5` → `1,234,567.5`
fn group_thousands(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let text = trim_number(rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }
    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The single popup currently shown, if any
#[derive(Debug, Clone, Default)]
pub struct PopupState {
    open: Option<PopupView>,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&PopupView> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Replaces whatever was showing
    pub fn show(&mut self, view: PopupView) -> Vec<MapEvent> {
        let mut events = self.close();
        events.push(MapEvent::PopupOpened {
            id: view.id().to_string(),
            kind: view.kind,
        });
        self.open = Some(view);
        events
    }

    pub fn close(&mut self) -> Vec<MapEvent> {
        match self.open.take() {
            Some(view) => vec![MapEvent::PopupClosed {
                id: view.id().to_string(),
            }],
            None => Vec::new(),
        }
    }

    /// Handles a popup button. `ViewDetails` on the detail popup also closes
    /// it; on the summary popup the caller decides what to open next.
    pub fn handle(&mut self, action: PopupAction) -> Vec<MapEvent> {
        let Some(view) = self.open.as_ref() else {
            return Vec::new();
        };
        match action {
            PopupAction::Close => self.close(),
            PopupAction::ViewDetails => {
                let id = view.id().to_string();
                let mut events = vec![MapEvent::ViewDetailsRequested { id }];
                if view.kind == PopupKind::Detail {
                    events.extend(self.close());
                }
                events
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::entity::{CatalogEntity, Category, EntityDetails, SearchPoint};

    fn viewport() -> Size {
        Size::new(1024.0, 768.0)
    }

    #[test]
    fn test_summary_shifts_inside_edges() {
        let entity: MapEntity = SearchPoint::new("s", "Spot").at(41.0, -87.0).into();
        let view = PopupView::summary(entity, Point::new(900.0, 700.0), viewport(), &PopupConfig::default());
        assert_eq!(view.position, Point::new(1024.0 - 320.0 - 20.0, 768.0 - 280.0 - 20.0));
        assert_eq!(view.size, Size::new(320.0, 280.0));
    }

    #[test]
    fn test_detail_flips_or_centers() {
        let entity: MapEntity = SearchPoint::new("s", "Spot").into();
        let config = PopupConfig::default();

        let flipped = PopupView::detail(entity.clone(), Some(Point::new(900.0, 100.0)), viewport(), &config);
        assert_eq!(flipped.position, Point::new(900.0 - 320.0 - 20.0, 100.0));

        let centered = PopupView::detail(entity, None, viewport(), &config);
        assert_eq!(centered.position, Point::new((1024.0 - 320.0) / 2.0, (768.0 - 400.0) / 2.0));
        assert_eq!(centered.rows[0], PopupRow::Address(DEFAULT_ADDRESS.into()));
    }

    #[test]
    fn test_centered_detail_on_small_viewport_keeps_margin() {
        let entity: MapEntity = SearchPoint::new("s", "Spot").into();
        let config = PopupConfig::default();

        let phone = PopupView::detail(entity.clone(), None, Size::new(300.0, 360.0), &config);
        assert_eq!(phone.position, Point::new(20.0, 20.0));

        let narrow = PopupView::detail(entity, None, Size::new(300.0, 768.0), &config);
        assert_eq!(narrow.position, Point::new(20.0, (768.0 - 400.0) / 2.0));
    }

    #[test]
    fn test_search_point_without_address_shows_coordinates() {
        let entity: MapEntity = SearchPoint::new("s", "Spot").at(41.87812, -87.62979).into();
        let rows = summary_rows(&entity);
        assert_eq!(rows, vec![PopupRow::Coordinates("[41.8781, -87.6298]".into())]);
    }

    #[test]
    fn test_detail_rows_format_numbers() {
        let details = EntityDetails {
            price: Some(1250000.0),
            bathrooms: Some(2.5),
            square_footage: Some(1800.0),
            kind: Some("condo".into()),
            safety_score: Some(88.0),
            ..Default::default()
        };
        let entity: MapEntity = CatalogEntity::new("listing-9", "Nine", Category::Residential)
            .with_details(details)
            .into();

        let texts: Vec<_> = detail_rows(&entity).iter().map(PopupRow::text).collect();
        assert_eq!(
            texts,
            vec!["Chicago, IL", "$1,250,000", "2.5 Baths", "1,800 sq ft", "Condo"]
        );
        assert!(summary_rows(&entity).contains(&PopupRow::Safety("88/100".into())));
    }

    #[test]
    fn test_view_details_closes_detail_only() {
        let entity: MapEntity = SearchPoint::new("s", "Spot").into();
        let config = PopupConfig::default();
        let mut state = PopupState::new();

        state.show(PopupView::summary(entity.clone(), Point::default(), viewport(), &config));
        let events = state.handle(PopupAction::ViewDetails);
        assert_eq!(events, vec![MapEvent::ViewDetailsRequested { id: "s".into() }]);
        assert!(state.is_open());

        state.show(PopupView::detail(entity, None, viewport(), &config));
        let events = state.handle(PopupAction::ViewDetails);
        assert_eq!(events.len(), 2);
        assert!(!state.is_open());
        assert!(state.handle(PopupAction::Close).is_empty());
    }
}
