//! In-process engine: keeps markers in a table, projects with Web Mercator
//! and animates fly-to moves. Tiles are not fetched here; a host that wants
//! imagery draws it underneath using the style's URL template.

use crate::{
    core::{
        config::TileStyleConfig,
        geo::{LatLng, Point, Size},
        viewport::Viewport,
    },
    engine::{
        ControlCorner, EngineError, EngineMarkerId, EngineOptions, EngineSignal, FlyTo, MapControl,
        MapEngine, SignalSender,
    },
    layers::marker::MarkerElement,
};
use instant::Instant;
use std::{collections::BTreeMap, time::Duration};

/// Nominal flight time at speed 1.0
const BASE_FLIGHT_MS: f64 = 1_500.0;

#[derive(Debug, Clone)]
pub struct PlacedMarker {
    pub element: MarkerElement,
    pub position: LatLng,
}

#[derive(Debug, Clone)]
struct Flight {
    from_center: LatLng,
    from_zoom: f64,
    target: FlyTo,
    started: Instant,
    duration: Duration,
}

impl Flight {
    /// Ease-out cubic progress in `[0, 1]`
    fn progress(&self, now: Instant) -> f64 {
        let elapsed = if now > self.started {
            now.duration_since(self.started).as_secs_f64()
        } else {
            0.0
        };
        let t = (elapsed / self.duration.as_secs_f64().max(f64::EPSILON)).clamp(0.0, 1.0);
        1.0 - (1.0 - t).powi(3)
    }
}

pub struct SceneEngine {
    viewport: Viewport,
    style: TileStyleConfig,
    markers: BTreeMap<EngineMarkerId, PlacedMarker>,
    controls: Vec<(MapControl, ControlCorner)>,
    flight: Option<Flight>,
    next_id: u64,
    released: bool,
}

impl SceneEngine {
    /// Validates the style and reports `Loaded` right away; there is no
    /// remote resource to wait on.
    pub fn initialize(
        options: &EngineOptions,
        size: Size,
        signals: SignalSender,
    ) -> Result<Self, EngineError> {
        options
            .style
            .validate()
            .map_err(|e| EngineError::Init(e.to_string()))?;

        let viewport = Viewport::new(options.center, options.zoom, size)
            .with_orientation(options.pitch, options.bearing);

        let engine = Self {
            viewport,
            style: options.style.clone(),
            markers: BTreeMap::new(),
            controls: Vec::new(),
            flight: None,
            next_id: 0,
            released: false,
        };

        if signals.send(EngineSignal::Loaded).is_err() {
            log::debug!("Load signal dropped: controller already gone");
        }
        Ok(engine)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn style(&self) -> &TileStyleConfig {
        &self.style
    }

    pub fn set_size(&mut self, size: Size) {
        self.viewport.set_size(size);
    }

    pub fn controls(&self) -> &[(MapControl, ControlCorner)] {
        &self.controls
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Attached markers with their current screen position, oldest first
    pub fn projected_markers(&self) -> impl Iterator<Item = (&MarkerElement, Point)> + '_ {
        self.markers
            .values()
            .map(|placed| (&placed.element, self.viewport.lat_lng_to_pixel(&placed.position)))
    }

    /// Steps a running fly-to animation
    pub fn advance(&mut self, now: Instant) {
        let Some(flight) = &self.flight else {
            return;
        };
        let t = flight.progress(now);
        let center = LatLng::new(
            flight.from_center.lat + (flight.target.center.lat - flight.from_center.lat) * t,
            flight.from_center.lng + (flight.target.center.lng - flight.from_center.lng) * t,
        );
        let zoom = flight.from_zoom + (flight.target.zoom - flight.from_zoom) * t;
        let finished = t >= 1.0;

        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
        if finished {
            self.flight = None;
        }
    }

    /// Topmost marker whose center lies within `radius` pixels
    pub fn hit_test(&self, pixel: Point, radius: f64) -> Option<&MarkerElement> {
        self.projected_markers()
            .filter(|(_, at)| at.distance_to(&pixel) <= radius)
            .last()
            .map(|(element, _)| element)
    }

    /// Clicks the topmost marker under `pixel`
    pub fn click_at(&self, pixel: Point, radius: f64) -> bool {
        match self.hit_test(pixel, radius) {
            Some(element) => {
                element.click();
                true
            }
            None => false,
        }
    }

    fn ensure_live(&self) -> Result<(), EngineError> {
        if self.released {
            Err(EngineError::Released)
        } else {
            Ok(())
        }
    }
}

impl MapEngine for SceneEngine {
    fn add_control(&mut self, control: MapControl, corner: ControlCorner) -> Result<(), EngineError> {
        self.ensure_live()?;
        self.controls.push((control, corner));
        Ok(())
    }

    fn project(&self, at: LatLng) -> Result<Point, EngineError> {
        self.ensure_live()?;
        if !at.is_finite() {
            return Err(EngineError::Projection(format!("non-finite coordinate {:?}", at)));
        }
        Ok(self.viewport.lat_lng_to_pixel(&at))
    }

    fn fly_to(&mut self, target: &FlyTo) -> Result<(), EngineError> {
        self.ensure_live()?;
        if !target.center.is_finite() || target.speed.is_nan() || target.speed <= 0.0 {
            return Err(EngineError::Camera(format!("invalid fly-to target {:?}", target)));
        }
        let duration = Duration::try_from_secs_f64(BASE_FLIGHT_MS / 1000.0 / target.speed)
            .map_err(|e| EngineError::Camera(format!("fly-to speed {}: {}", target.speed, e)))?;
        self.flight = Some(Flight {
            from_center: self.viewport.center,
            from_zoom: self.viewport.zoom,
            target: *target,
            started: Instant::now(),
            duration,
        });
        Ok(())
    }

    fn create_marker(&mut self, element: MarkerElement, at: LatLng) -> Result<EngineMarkerId, EngineError> {
        self.ensure_live()?;
        if !at.is_valid() {
            return Err(EngineError::MarkerRejected(format!(
                "{} is outside the valid coordinate range",
                element.id()
            )));
        }
        let id = EngineMarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(id, PlacedMarker { element, position: at });
        Ok(id)
    }

    fn remove_marker(&mut self, id: EngineMarkerId) -> Result<(), EngineError> {
        self.ensure_live()?;
        self.markers.remove(&id);
        Ok(())
    }

    fn remove(&mut self) {
        if self.released {
            return;
        }
        self.markers.clear();
        self.controls.clear();
        self.flight = None;
        self.released = true;
    }
}
