use crate::core::geo::{LatLng, Point, Size};
use serde::{Deserialize, Serialize};

/// Camera state of a map surface: center, zoom, orientation and screen size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// Tilt in degrees; kept for engines that render in 3D
    pub pitch: f64,
    /// Rotation in degrees, clockwise from north
    pub bearing: f64,
    /// The size of the viewport in pixels
    pub size: Size,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Size) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 22.0),
            pitch: 0.0,
            bearing: 0.0,
            size,
            min_zoom: 0.0,
            max_zoom: 22.0,
        }
    }

    pub fn with_orientation(mut self, pitch: f64, bearing: f64) -> Self {
        self.pitch = pitch.clamp(0.0, 85.0);
        self.bearing = bearing;
        self
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), center.lng);
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Projects a LatLng to world pixel coordinates at the current zoom level
    /// (Web Mercator, EPSG:3857).
    pub fn project_world(&self, lat_lng: &LatLng) -> Point {
        const EARTH_RADIUS: f64 = 6378137.0;
        let scale = 256.0 * 2_f64.powf(self.zoom);
        let circumference = 2.0 * std::f64::consts::PI * EARTH_RADIUS;
        let mercator = lat_lng.to_mercator();

        Point::new(
            (mercator.x + circumference / 2.0) / circumference * scale,
            (-mercator.y + circumference / 2.0) / circumference * scale,
        )
    }

    /// Projects a LatLng to a screen pixel relative to the top-left corner,
    /// honoring the bearing.
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let offset = self
            .project_world(lat_lng)
            .subtract(&self.project_world(&self.center))
            .rotate(-self.bearing);
        self.size.center().add(&offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_viewport() -> Viewport {
        Viewport::new(LatLng::new(41.8781, -87.6298), 15.5, Size::new(1280.0, 800.0))
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let viewport = loop_viewport().with_orientation(60.0, -20.0);
        let pixel = viewport.lat_lng_to_pixel(&viewport.center);
        assert!((pixel.x - 640.0).abs() < 1e-6);
        assert!((pixel.y - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_north_east_point_is_up_and_right() {
        let viewport = loop_viewport();
        let pixel = viewport.lat_lng_to_pixel(&LatLng::new(41.8791, -87.6288));
        assert!(pixel.x > 640.0);
        assert!(pixel.y < 400.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = loop_viewport();
        viewport.set_zoom(40.0);
        assert_eq!(viewport.zoom, 22.0);
    }
}
