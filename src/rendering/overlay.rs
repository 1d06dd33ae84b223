use crate::{
    core::{
        constants::SEARCH_HIT_BOX,
        geo::{Point, Size},
        selection::SelectionState,
    },
    data::entity::SearchPoint,
    engine::MapEngine,
};

/// Clickable square drawn over a projected search point
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHitBox {
    pub point: SearchPoint,
    /// Top-left corner in screen pixels
    pub min: Point,
    pub size: Size,
}

impl SearchHitBox {
    pub fn center(&self) -> Point {
        Point::new(self.min.x + self.size.width / 2.0, self.min.y + self.size.height / 2.0)
    }

    pub fn contains(&self, pixel: &Point) -> bool {
        pixel.x >= self.min.x
            && pixel.y >= self.min.y
            && pixel.x <= self.min.x + self.size.width
            && pixel.y <= self.min.y + self.size.height
    }
}

/// Projects each unique search result to a hit box centred on its screen
/// position. Points the engine cannot project are skipped.
pub fn project_search_points<E: MapEngine>(engine: &E, selection: &SelectionState) -> Vec<SearchHitBox> {
    let half = SEARCH_HIT_BOX / 2.0;
    selection
        .unique_search_results()
        .into_iter()
        .filter_map(|point| {
            let position = point.position.filter(|p| p.is_finite())?;
            match engine.project(position) {
                Ok(pixel) => Some(SearchHitBox {
                    point: point.clone(),
                    min: Point::new(pixel.x - half, pixel.y - half),
                    size: Size::new(SEARCH_HIT_BOX, SEARCH_HIT_BOX),
                }),
                Err(e) => {
                    log::debug!("Skipping overlay for {}: {}", point.id, e);
                    None
                }
            }
        })
        .collect()
}

/// Topmost box under `pixel`
pub fn hit<'a>(boxes: &'a [SearchHitBox], pixel: &Point) -> Option<&'a SearchHitBox> {
    boxes.iter().rev().find(|b| b.contains(pixel))
}
