//! Prelude module for common twinmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use twinmap::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{CameraConfig, FlyToConfig, LifecycleConfig, MapConfig, PopupConfig, TileStyleConfig},
    geo::{LatLng, Point, Size},
    geometry::{clamp_to_viewport, place, PlacementPolicy},
    lifecycle::{LifecycleController, LifecycleMachine, LifecycleState, LoadOutcome},
    map::{RenderMode, TwinCityMap},
    selection::{CategoryFilter, OverlayType, SelectionState},
    viewport::Viewport,
};

pub use crate::data::{
    catalog::Catalog,
    entity::{CatalogEntity, Category, EntityDetails, MapEntity, SearchPoint},
};

pub use crate::engine::{
    scene::SceneEngine, ControlCorner, EngineError, EngineMarkerId, EngineOptions, EngineSignal,
    FlyTo, MapControl, MapEngine, SignalSender, StampedSignal,
};

pub use crate::layers::{
    marker::{ClickHandler, Emphasis, MarkerElement, MarkerFactory, MarkerVisual, PulseCadence},
    registry::{MarkerHandle, MarkerRegistry, ReconcileReport},
};

pub use crate::rendering::{
    camera::CameraController,
    fallback::{SchematicPin, SchematicScene},
    overlay::{project_search_points, SearchHitBox},
};

pub use crate::input::events::{EventManager, InputEvent, MapEvent};

pub use crate::ui::{
    popup::{PopupAction, PopupKind, PopupRow, PopupState, PopupView},
    style::{MarkerPalette, Rgba},
};

#[cfg(feature = "egui")]
pub use crate::ui::painter;

pub use crate::{Error as MapError, Result};

pub use std::{
    sync::Arc,
    time::Duration,
};

pub use instant::Instant;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
