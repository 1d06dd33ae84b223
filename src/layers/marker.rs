use crate::{
    core::constants::{
        ACTIVE_MARKER_SCALE, CATALOG_PULSE_MS, ORBIT_PARTICLES, SEARCH_PULSE_MS,
    },
    data::entity::MapEntity,
    ui::style::{MarkerPalette, Rgba},
};
use std::{sync::Arc, time::Duration};

/// Callback invoked with the original entity when its marker is clicked
pub type ClickHandler = Arc<dyn Fn(&MapEntity) + Send + Sync>;

/// Discrete size state of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Emphasized,
}

impl Emphasis {
    pub fn scale(&self) -> f32 {
        match self {
            Emphasis::Normal => 1.0,
            Emphasis::Emphasized => ACTIVE_MARKER_SCALE,
        }
    }
}

/// Breathing cadence; search points pulse faster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseCadence {
    Calm,
    Rapid,
}

impl PulseCadence {
    pub fn period(&self) -> Duration {
        match self {
            PulseCadence::Calm => Duration::from_millis(CATALOG_PULSE_MS),
            PulseCadence::Rapid => Duration::from_millis(SEARCH_PULSE_MS),
        }
    }

    /// Pulse phase in `[0, 1)` for an elapsed time
    pub fn phase(&self, elapsed: Duration) -> f32 {
        let period = self.period().as_secs_f32();
        (elapsed.as_secs_f32() % period) / period
    }
}

/// Everything needed to draw one marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVisual {
    pub color: Rgba,
    pub emphasis: Emphasis,
    pub pulse: PulseCadence,
    /// Decorative particles circling an active marker
    pub orbit_particles: usize,
    pub label: String,
    /// Active markers keep their label visible; others show it on hover
    pub label_pinned: bool,
}

impl MarkerVisual {
    pub fn is_active(&self) -> bool {
        self.emphasis == Emphasis::Emphasized
    }

    /// Particle offsets from the marker center, evenly spaced on a circle
    pub fn orbit_offsets(&self, radius: f32) -> Vec<(f32, f32)> {
        if self.orbit_particles == 0 {
            return Vec::new();
        }
        let step = std::f32::consts::TAU / self.orbit_particles as f32;
        (0..self.orbit_particles)
            .map(|i| {
                let angle = step * i as f32;
                (radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    }
}

/// A built marker: its visual plus the click binding to its entity
#[derive(Clone)]
pub struct MarkerElement {
    entity: MapEntity,
    visual: MarkerVisual,
    on_click: ClickHandler,
}

impl MarkerElement {
    pub fn entity(&self) -> &MapEntity {
        &self.entity
    }

    pub fn visual(&self) -> &MarkerVisual {
        &self.visual
    }

    pub fn id(&self) -> &str {
        self.entity.id()
    }

    /// Fires the bound click handler with the original entity
    pub fn click(&self) {
        (self.on_click)(&self.entity);
    }
}

impl std::fmt::Debug for MarkerElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerElement")
            .field("id", &self.entity.id())
            .field("visual", &self.visual)
            .finish()
    }
}

/// Builds marker elements from entities
#[derive(Debug, Clone, Default)]
pub struct MarkerFactory {
    palette: MarkerPalette,
}

impl MarkerFactory {
    pub fn new(palette: MarkerPalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &MarkerPalette {
        &self.palette
    }

    pub fn color_for(&self, entity: &MapEntity) -> Rgba {
        self.palette.resolve(entity)
    }

    pub fn build(
        &self,
        entity: &MapEntity,
        color: Rgba,
        active: bool,
        search_origin: bool,
        on_click: ClickHandler,
    ) -> MarkerElement {
        let visual = MarkerVisual {
            color,
            emphasis: if active {
                Emphasis::Emphasized
            } else {
                Emphasis::Normal
            },
            pulse: if search_origin {
                PulseCadence::Rapid
            } else {
                PulseCadence::Calm
            },
            orbit_particles: if active { ORBIT_PARTICLES } else { 0 },
            label: entity.label().to_string(),
            label_pinned: active,
        };

        MarkerElement {
            entity: entity.clone(),
            visual,
            on_click,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::entity::{CatalogEntity, Category, SearchPoint};
    use std::sync::Mutex;

    fn noop() -> ClickHandler {
        Arc::new(|_| {})
    }

    #[test]
    fn test_active_marker_is_emphasized_with_orbit() {
        let factory = MarkerFactory::default();
        let entity = MapEntity::from(CatalogEntity::new("tower", "Tower", Category::Landmark));
        let color = factory.color_for(&entity);

        let normal = factory.build(&entity, color, false, false, noop());
        let active = factory.build(&entity, color, true, false, noop());

        assert_eq!(normal.visual().emphasis.scale(), 1.0);
        assert_eq!(active.visual().emphasis.scale(), ACTIVE_MARKER_SCALE);
        assert_eq!(normal.visual().orbit_particles, 0);
        assert_eq!(active.visual().orbit_offsets(10.0).len(), ORBIT_PARTICLES);
        assert!(active.visual().label_pinned);
        assert_eq!(active.visual().label, "Tower");
    }

    #[test]
    fn test_search_origin_pulses_faster() {
        let factory = MarkerFactory::default();
        let point = MapEntity::from(SearchPoint::new("s1", "Result"));
        let marker = factory.build(&point, factory.color_for(&point), true, true, noop());

        assert_eq!(marker.visual().pulse, PulseCadence::Rapid);
        assert!(PulseCadence::Rapid.period() < PulseCadence::Calm.period());
        assert_eq!(marker.visual().color, factory.palette().search);
    }

    #[test]
    fn test_click_passes_original_entity() {
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let sink = clicked.clone();
        let handler: ClickHandler = Arc::new(move |entity: &MapEntity| {
            sink.lock().unwrap().push(entity.clone());
        });

        let factory = MarkerFactory::default();
        let entity = MapEntity::from(CatalogEntity::new("a", "Alpha", Category::Residential));
        let marker = factory.build(&entity, Rgba::rgb(0, 0, 0), false, false, handler);
        marker.click();

        assert_eq!(clicked.lock().unwrap().as_slice(), &[entity]);
    }

    #[test]
    fn test_pulse_phase_wraps() {
        let phase = PulseCadence::Rapid.phase(Duration::from_millis(1_250));
        assert!((phase - 0.25).abs() < 1e-4);
    }
}
