//! Map builder for fluent configuration
//!
//! Collects config, catalog and click handling before mounting a
//! [`TwinCityMap`] on an engine.

use crate::{
    core::{
        config::MapConfig,
        geo::Size,
        map::TwinCityMap,
    },
    data::{catalog::Catalog, entity::MapEntity},
    engine::{EngineFactory, MapEngine},
    layers::marker::ClickHandler,
    ui::style::MarkerPalette,
    Result,
};
use std::{sync::Arc, time::Duration};

/// Builder for creating and configuring map views
pub struct MapBuilder {
    config: MapConfig,
    catalog: Catalog,
    on_click: Option<ClickHandler>,
    viewport_size: Size,
}

impl MapBuilder {
    /// Create a new MapBuilder with default settings and an empty catalog
    pub fn new() -> Self {
        Self {
            config: MapConfig::default(),
            catalog: Catalog::default(),
            on_click: None,
            viewport_size: Size::new(1024.0, 768.0),
        }
    }

    pub fn with_config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the callback invoked with the entity of any clicked marker
    pub fn with_click_handler<F>(mut self, on_click: F) -> Self
    where
        F: Fn(&MapEntity) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(on_click));
        self
    }

    pub fn with_palette(mut self, palette: MarkerPalette) -> Self {
        self.config.palette = palette;
        self
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_load_timeout(timeout);
        self
    }

    /// Size of the host surface in pixels, used for popup placement
    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.viewport_size = size;
        self
    }

    /// Validates the configuration and mounts the map on the engine the
    /// factory produces
    pub fn build<E, F>(self, factory: F) -> Result<TwinCityMap<E>>
    where
        E: MapEngine,
        F: EngineFactory<E>,
    {
        self.config.validate()?;
        let on_click = self.on_click.unwrap_or_else(|| Arc::new(|_: &MapEntity| {}));

        Ok(TwinCityMap::mount(
            self.config,
            self.catalog.to_map_entities(),
            on_click,
            self.viewport_size,
            factory,
        ))
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience presets
impl MapBuilder {
    /// Default camera over the built-in Chicago Loop catalog
    pub fn chicago_loop() -> Self {
        Self::new().with_catalog(Catalog::chicago_loop())
    }
}
