//! # twinmap
//!
//! Marker lifecycle and viewport-aware layout for an embedded map engine.
//!
//! The crate keeps a set of styled markers in sync with changing selection
//! state (category filter, highlighted ids, search results), places detail
//! popups so they stay on screen, and falls back to a static schematic when
//! the underlying map engine fails to come up. The engine itself is reached
//! only through the [`engine::MapEngine`] trait, so any engine offering that
//! operation set can be plugged in.

pub mod core;
pub mod data;
pub mod engine;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapBuilder,
    config::MapConfig,
    geo::{LatLng, Point, Size},
    geometry::clamp_to_viewport,
    lifecycle::{LifecycleController, LifecycleState},
    map::TwinCityMap,
    selection::{CategoryFilter, OverlayType, SelectionState},
};

pub use data::{
    catalog::Catalog,
    entity::{CatalogEntity, Category, MapEntity, SearchPoint},
};

pub use engine::{EngineError, EngineOptions, EngineSignal, MapEngine};

pub use layers::{
    marker::{MarkerElement, MarkerFactory, MarkerVisual},
    registry::{MarkerHandle, MarkerRegistry},
};

pub use input::events::{EventManager, InputEvent, MapEvent};

pub use rendering::{camera::CameraController, fallback::SchematicScene};

pub use ui::{
    popup::{PopupAction, PopupKind, PopupView},
    style::{MarkerPalette, Rgba},
};

/// Installs an `env_logger` logger honoring `RUST_LOG`, defaulting to `info`.
/// Later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
