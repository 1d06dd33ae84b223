//! Static schematic shown when the live engine is unavailable.
//!
//! Positions derive only from entity order, so the same inputs always give
//! the same picture.

use crate::{
    core::geo::{Point, Size},
    data::entity::{MapEntity, SearchPoint},
};

pub const LOADING_CAPTION: &str = "Initializing Satellite Link...";
pub const FALLBACK_CAPTION: &str = "System: Fallback Schematic Mode Active";

/// A placeholder dot, positioned by percentage of the schematic frame plus a
/// pixel offset
#[derive(Debug, Clone, PartialEq)]
pub struct SchematicPin {
    pub id: String,
    pub label: String,
    pub left_pct: f64,
    pub top_pct: f64,
    pub offset: Point,
}

impl SchematicPin {
    /// Pixel position inside a frame of the given size
    pub fn resolve(&self, frame: Size) -> Point {
        Point::new(
            frame.width * self.left_pct / 100.0 + self.offset.x,
            frame.height * self.top_pct / 100.0 + self.offset.y,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchematicScene {
    pub placeholders: Vec<SchematicPin>,
    pub search_pins: Vec<SchematicPin>,
}

impl SchematicScene {
    pub fn build(entities: &[MapEntity], search_results: &[SearchPoint]) -> Self {
        let placeholders = entities
            .iter()
            .enumerate()
            .map(|(i, entity)| SchematicPin {
                id: entity.id().to_string(),
                label: entity.label().to_string(),
                left_pct: 20.0 + i as f64 * 15.0,
                top_pct: 30.0 + (i % 3) as f64 * 20.0,
                offset: Point::default(),
            })
            .collect();

        let search_pins = search_results
            .iter()
            .enumerate()
            .map(|(i, point)| SchematicPin {
                id: point.id.clone(),
                label: point.label.clone(),
                left_pct: 50.0,
                top_pct: 50.0,
                offset: Point::new(i as f64 * 20.0, i as f64 * 20.0),
            })
            .collect();

        Self {
            placeholders,
            search_pins,
        }
    }

    pub fn caption(&self) -> &'static str {
        FALLBACK_CAPTION
    }
}
