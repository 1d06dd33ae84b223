//! Configuration for the map view
//!
//! Every section has working defaults (satellite imagery over the Chicago
//! Loop), so a config file only needs to name what it changes.

use crate::{
    core::{
        constants::{
            DEFAULT_BEARING, DEFAULT_CENTER, DEFAULT_PITCH, DEFAULT_ZOOM, DETAIL_POPUP_SIZE,
            FLY_TO_SPEED, FLY_TO_ZOOM, LOAD_TIMEOUT_MS, MIN_FLY_TO_SPEED, POPUP_MARGIN,
            SATELLITE_ATTRIBUTION, SATELLITE_TILE_URL, SETTLE_POLL_INTERVAL_MS, SUMMARY_POPUP_SIZE,
            TILE_SIZE,
        },
        geo::{LatLng, Size},
    },
    engine::ControlCorner,
    ui::style::MarkerPalette,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raster source handed to the engine as its style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileStyleConfig {
    pub source_id: String,
    pub layer_id: String,
    /// URL template with `{z}`, `{x}` and `{y}` placeholders
    pub tiles: String,
    pub tile_size: u32,
    pub attribution: String,
    pub raster_opacity: f32,
}

impl Default for TileStyleConfig {
    fn default() -> Self {
        Self {
            source_id: "satellite-tiles".to_string(),
            layer_id: "satellite-base".to_string(),
            tiles: SATELLITE_TILE_URL.to_string(),
            tile_size: TILE_SIZE,
            attribution: SATELLITE_ATTRIBUTION.to_string(),
            raster_opacity: 1.0,
        }
    }
}

impl TileStyleConfig {
    pub fn validate(&self) -> Result<()> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.tiles.contains(placeholder) {
                return Err(MapError::Config(format!(
                    "tile template '{}' is missing {}",
                    self.tiles, placeholder
                )));
            }
        }
        if self.tile_size == 0 {
            return Err(MapError::Config("tile size must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.raster_opacity) {
            return Err(MapError::Config(format!(
                "raster opacity {} outside [0, 1]",
                self.raster_opacity
            )));
        }
        Ok(())
    }

    /// Fills the template for one tile
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        self.tiles
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// Initial camera and chrome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub attribution_control: bool,
    pub show_compass: bool,
    pub navigation_corner: ControlCorner,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            pitch: DEFAULT_PITCH,
            bearing: DEFAULT_BEARING,
            attribution_control: false,
            show_compass: true,
            navigation_corner: ControlCorner::TopRight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub load_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: LOAD_TIMEOUT_MS,
            poll_interval_ms: SETTLE_POLL_INTERVAL_MS,
        }
    }
}

impl LifecycleConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Camera move issued for fresh search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyToConfig {
    pub zoom: f64,
    pub speed: f64,
    pub essential: bool,
}

impl Default for FlyToConfig {
    fn default() -> Self {
        Self {
            zoom: FLY_TO_ZOOM,
            speed: FLY_TO_SPEED,
            essential: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub margin: f64,
    pub summary_size: Size,
    pub detail_size: Size,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            margin: POPUP_MARGIN,
            summary_size: Size::new(SUMMARY_POPUP_SIZE.0, SUMMARY_POPUP_SIZE.1),
            detail_size: Size::new(DETAIL_POPUP_SIZE.0, DETAIL_POPUP_SIZE.1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub style: TileStyleConfig,
    pub camera: CameraConfig,
    pub lifecycle: LifecycleConfig,
    pub fly_to: FlyToConfig,
    pub popup: PopupConfig,
    pub palette: MarkerPalette,
}

impl MapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.style.validate()?;
        if !self.camera.center.is_finite() || !self.camera.center.is_valid() {
            return Err(MapError::Config(format!(
                "camera center {:?} is not a valid coordinate",
                self.camera.center
            )));
        }
        if !self.fly_to.speed.is_finite() || self.fly_to.speed < MIN_FLY_TO_SPEED {
            return Err(MapError::Config(format!(
                "fly-to speed must be a finite value of at least {}",
                MIN_FLY_TO_SPEED
            )));
        }
        if self.lifecycle.load_timeout_ms == 0 {
            return Err(MapError::Config("load timeout must be positive".to_string()));
        }
        Ok(())
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.lifecycle.load_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_palette(mut self, palette: MarkerPalette) -> Self {
        self.palette = palette;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lifecycle.load_timeout(), Duration::from_secs(5));
        assert_eq!(config.camera.pitch, 60.0);
        assert_eq!(config.camera.bearing, -20.0);
        assert_eq!(config.fly_to.zoom, 16.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MapConfig::from_json_str(
            r#"{ "lifecycle": { "load_timeout_ms": 2000 }, "camera": { "navigation_corner": "top-left" } }"#,
        )
        .unwrap();
        assert_eq!(config.lifecycle.load_timeout_ms, 2000);
        assert_eq!(config.camera.navigation_corner, ControlCorner::TopLeft);
        assert_eq!(config.style, TileStyleConfig::default());
    }

    #[test]
    fn test_template_without_placeholders_is_rejected() {
        let result = MapConfig::from_json_str(r#"{ "style": { "tiles": "https://example.com/a.png" } }"#);
        assert!(matches!(result, Err(MapError::Config(_))));
    }

    #[test]
    fn test_fly_to_speed_needs_sane_minimum() {
        let mut config = MapConfig::default();
        for speed in [0.0, -1.0, 1e-20, f64::NAN, f64::INFINITY] {
            config.fly_to.speed = speed;
            assert!(matches!(config.validate(), Err(MapError::Config(_))), "speed {}", speed);
        }
        config.fly_to.speed = MIN_FLY_TO_SPEED;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tile_url_substitution() {
        let style = TileStyleConfig::default();
        assert!(style.tile_url(15, 8410, 12175).ends_with("/tile/15/12175/8410"));
    }
}
