//! Core constants for the marker layer and its embedded engine.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Satellite imagery tile template used by the default style.
pub const SATELLITE_TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";

pub const SATELLITE_ATTRIBUTION: &str = "© Esri";

/// Chicago Loop, the default camera center.
pub const DEFAULT_CENTER: (f64, f64) = (41.8781, -87.6298);
pub const DEFAULT_ZOOM: f64 = 15.5;
pub const DEFAULT_PITCH: f64 = 60.0;
pub const DEFAULT_BEARING: f64 = -20.0;

/// How long the engine gets to report `load` before the map falls back.
pub const LOAD_TIMEOUT_MS: u64 = 5_000;

/// Poll cadence of the async settle loop.
pub const SETTLE_POLL_INTERVAL_MS: u64 = 50;

/// Camera target when flying to a fresh search result.
pub const FLY_TO_ZOOM: f64 = 16.0;
pub const FLY_TO_SPEED: f64 = 1.2;
/// Slowest accepted fly-to speed; anything lower would take hours.
pub const MIN_FLY_TO_SPEED: f64 = 0.01;

/// Screen margin kept around floating panels.
pub const POPUP_MARGIN: f64 = 20.0;

/// Summary popup footprint (width, height).
pub const SUMMARY_POPUP_SIZE: (f64, f64) = (320.0, 280.0);

/// Detail popup footprint (width, height).
pub const DETAIL_POPUP_SIZE: (f64, f64) = (320.0, 400.0);

/// Side of the square hit box drawn over projected search points.
pub const SEARCH_HIT_BOX: f64 = 48.0;

/// Scale applied to an emphasised (active) marker.
pub const ACTIVE_MARKER_SCALE: f32 = 1.5;

/// Number of orbiting particles around an active marker.
pub const ORBIT_PARTICLES: usize = 6;

/// Pulse periods in milliseconds.
pub const SEARCH_PULSE_MS: u64 = 1_000;
pub const CATALOG_PULSE_MS: u64 = 3_000;
