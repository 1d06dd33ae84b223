use crate::{
    core::{geo::LatLng, selection::SelectionState},
    data::entity::MapEntity,
    engine::{EngineMarkerId, MapEngine},
    layers::marker::{ClickHandler, MarkerElement, MarkerFactory},
    prelude::HashMap,
};

/// A marker currently attached to the engine
#[derive(Debug, Clone)]
pub struct MarkerHandle {
    pub engine_id: EngineMarkerId,
    pub position: LatLng,
    pub search_origin: bool,
    element: MarkerElement,
}

impl MarkerHandle {
    pub fn id(&self) -> &str {
        self.element.id()
    }

    pub fn element(&self) -> &MarkerElement {
        &self.element
    }
}

/// Outcome counters of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Handles detached at the start of the pass
    pub released: usize,
    pub attached: usize,
    pub filtered_out: usize,
    pub missing_position: usize,
    pub duplicate_search_results: usize,
    /// Search points that took over an identity already held by a catalog marker
    pub replaced: usize,
    pub failed: usize,
}

/// Owns the identity → marker mapping for one map view.
///
/// Every [`reconcile`](Self::reconcile) pass detaches all held markers
/// before building the new set, so repeated passes never accumulate stale
/// handles and there is never more than one handle per identity.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    factory: MarkerFactory,
    handles: HashMap<String, MarkerHandle>,
    /// Attachment order, for deterministic iteration
    order: Vec<String>,
}

impl MarkerRegistry {
    pub fn new(factory: MarkerFactory) -> Self {
        Self {
            factory,
            handles: HashMap::default(),
            order: Vec::new(),
        }
    }

    pub fn factory(&self) -> &MarkerFactory {
        &self.factory
    }

    pub fn reconcile<E: MapEngine>(
        &mut self,
        engine: &mut E,
        entities: &[MapEntity],
        selection: &SelectionState,
        on_click: &ClickHandler,
    ) -> ReconcileReport {
        let mut report = ReconcileReport {
            released: self.clear(engine),
            ..ReconcileReport::default()
        };

        for entity in entities {
            if !selection.category_filter.matches(entity) {
                report.filtered_out += 1;
                continue;
            }
            let active = selection.is_highlighted(entity.id());
            self.attach(engine, entity, active, false, on_click, &mut report);
        }

        let unique = selection.unique_search_results();
        report.duplicate_search_results = selection.search_results.len() - unique.len();
        for point in unique {
            let entity = MapEntity::Search(point.clone());
            self.attach(engine, &entity, true, true, on_click, &mut report);
        }

        log::debug!(
            "Reconciled markers: {} attached, {} released, {} filtered, {} without position, {} failed",
            report.attached,
            report.released,
            report.filtered_out,
            report.missing_position,
            report.failed
        );
        report
    }

    fn attach<E: MapEngine>(
        &mut self,
        engine: &mut E,
        entity: &MapEntity,
        active: bool,
        search_origin: bool,
        on_click: &ClickHandler,
        report: &mut ReconcileReport,
    ) {
        let Some(position) = entity.position() else {
            report.missing_position += 1;
            return;
        };

        let color = self.factory.color_for(entity);
        let element = self
            .factory
            .build(entity, color, active, search_origin, on_click.clone());

        match engine.create_marker(element.clone(), position) {
            Ok(engine_id) => {
                let id = entity.id().to_string();
                if self.release(engine, &id) {
                    report.replaced += 1;
                }
                self.order.push(id.clone());
                self.handles.insert(
                    id,
                    MarkerHandle {
                        engine_id,
                        position,
                        search_origin,
                        element,
                    },
                );
                report.attached += 1;
            }
            Err(e) => {
                log::error!("Error creating marker {}: {}", entity.id(), e);
                report.failed += 1;
            }
        }
    }

    fn release<E: MapEngine>(&mut self, engine: &mut E, id: &str) -> bool {
        let Some(handle) = self.handles.remove(id) else {
            return false;
        };
        self.order.retain(|held| held != id);
        if let Err(e) = engine.remove_marker(handle.engine_id) {
            log::warn!("Failed to detach marker {}: {}", id, e);
        }
        true
    }

    /// Detaches every held marker. Returns how many were held.
    pub fn clear<E: MapEngine>(&mut self, engine: &mut E) -> usize {
        let count = self.handles.len();
        for id in std::mem::take(&mut self.order) {
            if let Some(handle) = self.handles.remove(&id) {
                if let Err(e) = engine.remove_marker(handle.engine_id) {
                    log::warn!("Failed to detach marker {}: {}", id, e);
                }
            }
        }
        self.handles.clear();
        count
    }

    /// Drops all handles without touching the engine, for when the engine
    /// instance itself is already gone.
    pub fn forget(&mut self) {
        self.handles.clear();
        self.order.clear();
    }

    pub fn get(&self, id: &str) -> Option<&MarkerHandle> {
        self.handles.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handles.contains_key(id)
    }

    /// Held identities in attachment order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn handles(&self) -> impl Iterator<Item = &MarkerHandle> {
        self.order.iter().filter_map(|id| self.handles.get(id))
    }

    /// Fires the click binding of the marker with this identity
    pub fn click(&self, id: &str) -> bool {
        match self.handles.get(id) {
            Some(handle) => {
                handle.element.click();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
