use crate::{
    core::{
        config::MapConfig,
        geo::{Point, Size},
        lifecycle::{LifecycleController, LifecycleState},
        selection::{CategoryFilter, OverlayType, SelectionState},
    },
    data::entity::{MapEntity, SearchPoint},
    engine::{EngineFactory, EngineOptions, MapControl, MapEngine},
    input::events::{EventManager, InputEvent, MapEvent},
    layers::{
        marker::{ClickHandler, MarkerFactory},
        registry::{MarkerRegistry, ReconcileReport},
    },
    rendering::{
        camera::CameraController,
        fallback::SchematicScene,
        overlay::{self, project_search_points, SearchHitBox},
    },
    ui::popup::{PopupAction, PopupKind, PopupState, PopupView},
};
use crossbeam_channel::{Receiver, Sender};
use instant::Instant;
use std::sync::Arc;

/// What the host should draw this frame
#[derive(Debug, Clone, PartialEq)]
pub enum RenderMode {
    /// Loading screen, engine still starting
    Loading,
    /// Live engine surface with markers
    Live,
    /// Static schematic in place of the engine
    Fallback(SchematicScene),
}

/// One embedded map view: engine lifecycle, markers, camera and popups.
///
/// Selection inputs are pushed in with the `set_*` methods; every change
/// rebuilds the marker set while the engine is ready. Nothing touches the
/// engine before `Ready` or after unmount.
pub struct TwinCityMap<E: MapEngine> {
    config: MapConfig,
    controller: LifecycleController<E>,
    registry: MarkerRegistry,
    selection: SelectionState,
    entities: Vec<MapEntity>,
    camera: CameraController,
    popup: PopupState,
    event_manager: EventManager,
    on_click: ClickHandler,
    clicks: Receiver<MapEntity>,
    viewport_size: Size,
    unmounted: bool,
}

impl<E: MapEngine> TwinCityMap<E> {
    pub fn mount<F: EngineFactory<E>>(
        config: MapConfig,
        entities: Vec<MapEntity>,
        on_click: ClickHandler,
        viewport_size: Size,
        factory: F,
    ) -> Self {
        Self::mount_at(Instant::now(), config, entities, on_click, viewport_size, factory)
    }

    /// Mounts with the load timeout measured from `now`
    pub fn mount_at<F: EngineFactory<E>>(
        now: Instant,
        config: MapConfig,
        entities: Vec<MapEntity>,
        on_click: ClickHandler,
        viewport_size: Size,
        factory: F,
    ) -> Self {
        let options = EngineOptions::from_config(&config);
        let controls = [(
            MapControl::Navigation {
                show_compass: config.camera.show_compass,
            },
            config.camera.navigation_corner,
        )];
        let controller =
            LifecycleController::mount_at(now, &options, &config.lifecycle, &controls, factory);

        let (tx, clicks) = crossbeam_channel::unbounded();
        let mut map = Self {
            registry: MarkerRegistry::new(MarkerFactory::new(config.palette.clone())),
            camera: CameraController::new(config.fly_to.clone()),
            controller,
            selection: SelectionState::default(),
            entities,
            popup: PopupState::new(),
            event_manager: EventManager::new(),
            on_click: forward_clicks(on_click, tx),
            clicks,
            viewport_size,
            unmounted: false,
            config,
        };

        // engine construction itself may already have decided the race
        if map.state() == LifecycleState::Fallback {
            map.event_manager.emit(MapEvent::LifecycleChanged {
                state: LifecycleState::Fallback,
            });
        }
        map
    }

    pub fn state(&self) -> LifecycleState {
        self.controller.state()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn entities(&self) -> &[MapEntity] {
        &self.entities
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn engine(&self) -> Option<&E> {
        self.controller.engine()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.controller.engine_mut()
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted && self.controller.is_mounted()
    }

    /// Advances the lifecycle race and collects marker clicks. Returns the
    /// state entered during this call, if any.
    pub fn poll(&mut self, now: Instant) -> Option<LifecycleState> {
        let entered = self.controller.poll(now);
        if let Some(state) = entered {
            self.event_manager.emit(MapEvent::LifecycleChanged { state });
            if state == LifecycleState::Ready {
                self.reconcile();
                self.fly_to_latest();
            }
        }

        let clicked: Vec<MapEntity> = self.clicks.try_iter().collect();
        for entity in clicked {
            self.event_manager.emit(MapEvent::MarkerClicked { entity });
        }
        entered
    }

    /// Polls until the engine is ready or the map has fallen back.
    #[cfg(feature = "tokio-runtime")]
    pub async fn settle(&mut self) -> LifecycleState {
        loop {
            self.poll(Instant::now());
            if self.state() != LifecycleState::Initializing {
                return self.state();
            }
            tokio::time::sleep(self.controller.config().poll_interval()).await;
        }
    }

    /// Rebuilds the marker set from the catalog and current selection.
    /// Does nothing unless the engine is ready.
    pub fn reconcile(&mut self) -> Option<ReconcileReport> {
        if self.unmounted || !self.controller.is_ready() {
            return None;
        }
        let engine = self.controller.engine_mut()?;
        Some(
            self.registry
                .reconcile(engine, &self.entities, &self.selection, &self.on_click),
        )
    }

    fn fly_to_latest(&mut self) {
        let state = self.controller.state();
        let flown = self.camera.on_search_results(
            state,
            self.controller.engine_mut(),
            &self.selection.search_results,
        );
        if let Some(target) = flown {
            self.event_manager.emit(MapEvent::CameraFlown {
                target: target.center,
            });
        }
    }

    pub fn set_entities(&mut self, entities: Vec<MapEntity>) -> Option<ReconcileReport> {
        self.entities = entities;
        self.reconcile()
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) -> Option<ReconcileReport> {
        self.selection.set_category_filter(filter);
        self.reconcile()
    }

    pub fn set_highlighted_ids(&mut self, ids: Vec<String>) -> Option<ReconcileReport> {
        self.selection.set_highlighted_ids(ids);
        self.reconcile()
    }

    /// Rebuilds markers and flies the camera to the last result
    pub fn set_search_results(&mut self, results: Vec<SearchPoint>) -> Option<ReconcileReport> {
        self.selection.set_search_results(results);
        let report = self.reconcile();
        self.fly_to_latest();
        report
    }

    /// Presentational only; markers are not rebuilt
    pub fn set_overlay(&mut self, overlay: OverlayType) {
        self.selection.set_overlay(overlay);
    }

    pub fn render_mode(&self) -> RenderMode {
        match self.state() {
            LifecycleState::Initializing => RenderMode::Loading,
            LifecycleState::Ready => RenderMode::Live,
            LifecycleState::Fallback => RenderMode::Fallback(SchematicScene::build(
                &self.entities,
                &self.selection.search_results,
            )),
        }
    }

    /// Hit boxes over projected search results, while ready
    pub fn search_overlay(&self) -> Vec<SearchHitBox> {
        if !self.controller.is_ready() || self.selection.search_results.is_empty() {
            return Vec::new();
        }
        match self.controller.engine() {
            Some(engine) => project_search_points(engine, &self.selection),
            None => Vec::new(),
        }
    }

    /// Fires the click binding of the marker with this identity
    pub fn click_marker(&self, id: &str) -> bool {
        self.registry.click(id)
    }

    /// Returns whether the input was consumed
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        match input {
            InputEvent::Resize { size } => {
                self.viewport_size = size;
                true
            }
            InputEvent::Click { position } => {
                if self.popup.current().is_some_and(|view| view.contains(&position)) {
                    return true;
                }
                let boxes = self.search_overlay();
                match overlay::hit(&boxes, &position) {
                    Some(hit) => {
                        (self.on_click)(&MapEntity::Search(hit.point.clone()));
                        true
                    }
                    None => false,
                }
            }
        }
    }

    pub fn popup(&self) -> Option<&PopupView> {
        self.popup.current()
    }

    pub fn open_summary(&mut self, entity: MapEntity, anchor: Point) {
        let view = PopupView::summary(entity, anchor, self.viewport_size, &self.config.popup);
        let events = self.popup.show(view);
        self.emit_all(events);
    }

    pub fn open_detail(&mut self, entity: MapEntity, anchor: Option<Point>) {
        let view = PopupView::detail(entity, anchor, self.viewport_size, &self.config.popup);
        let events = self.popup.show(view);
        self.emit_all(events);
    }

    /// Applies a popup button press. Viewing details from the summary card
    /// swaps it for the detail card at the same spot.
    pub fn popup_action(&mut self, action: PopupAction) {
        let summary = self
            .popup
            .current()
            .filter(|view| view.kind == PopupKind::Summary)
            .map(|view| (view.entity.clone(), view.position));

        let events = self.popup.handle(action);
        self.emit_all(events);

        if let (PopupAction::ViewDetails, Some((entity, at))) = (action, summary) {
            self.open_detail(entity, Some(at));
        }
    }

    pub fn close_popup(&mut self) {
        let events = self.popup.close();
        self.emit_all(events);
    }

    fn emit_all(&mut self, events: Vec<MapEvent>) {
        for event in events {
            self.event_manager.emit(event);
        }
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// Detaches every marker, cancels the timeout and releases the engine.
    /// Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.unmounted = true;
        match self.controller.engine_mut() {
            Some(engine) => {
                self.registry.clear(engine);
            }
            None => self.registry.forget(),
        }
        self.controller.unmount();
        self.popup = PopupState::new();
        log::debug!("Map unmounted");
    }
}

impl<E: MapEngine> Drop for TwinCityMap<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Wraps the host callback so clicks also surface as [`MapEvent`]s
fn forward_clicks(on_click: ClickHandler, tx: Sender<MapEntity>) -> ClickHandler {
    Arc::new(move |entity: &MapEntity| {
        on_click(entity);
        let _ = tx.send(entity.clone());
    })
}
