use twinmap::{
    engine::{EngineError, EngineOptions, SignalSender},
    prelude::*,
    ui::painter,
};

/// Marker hit radius in pixels
const CLICK_RADIUS: f64 = 14.0;

/// Places the "search" button cycles through
const SEARCH_POOL: [(&str, &str, f64, f64); 4] = [
    ("poi-coffee", "Intelligentsia Coffee", 41.8842, -87.6270),
    ("poi-theater", "Chicago Theatre", 41.8854, -87.6274),
    ("poi-museum", "Field Museum", 41.8663, -87.6170),
    ("poi-pier", "Navy Pier", 41.8917, -87.6086),
];

/// Standalone map viewer application
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("TwinMap - Chicago Loop"),
        ..Default::default()
    };

    eframe::run_native(
        "twinmap-app",
        options,
        Box::new(|cc| Box::new(TwinMapApp::new(cc))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {e}"))?;

    Ok(())
}

struct TwinMapApp {
    map: TwinCityMap<SceneEngine>,
    catalog: Catalog,
    started: Instant,
    filter: CategoryFilter,
    highlighted: Vec<String>,
    search: Vec<SearchPoint>,
    overlay: OverlayType,
    simulate_failure: bool,
    last_click: Point,
    surface: Size,
}

impl TwinMapApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let catalog = Catalog::chicago_loop();
        let surface = Size::new(1000.0, 800.0);
        let map = mount(&catalog, surface, false);

        Self {
            map,
            catalog,
            started: Instant::now(),
            filter: CategoryFilter::All,
            highlighted: Vec::new(),
            search: Vec::new(),
            overlay: OverlayType::None,
            simulate_failure: false,
            last_click: Point::default(),
            surface,
        }
    }

    /// Swaps in a fresh map view and replays the current selection into it
    fn remount(&mut self) {
        self.map = mount(&self.catalog, self.surface, self.simulate_failure);
        self.map.set_category_filter(self.filter);
        self.map.set_highlighted_ids(self.highlighted.clone());
        self.map.set_search_results(self.search.clone());
        self.map.set_overlay(self.overlay);
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Layers");
        ui.horizontal_wrapped(|ui| {
            for choice in CategoryFilter::CHOICES {
                if ui
                    .selectable_label(self.filter == choice, choice.to_string())
                    .clicked()
                {
                    self.filter = choice;
                    self.map.set_category_filter(choice);
                }
            }
        });

        ui.separator();
        ui.heading("Overlay");
        ui.horizontal(|ui| {
            for (overlay, label) in [
                (OverlayType::None, "None"),
                (OverlayType::Safety, "Safety"),
                (OverlayType::Commerce, "Commerce"),
            ] {
                if ui.radio(self.overlay == overlay, label).clicked() {
                    self.overlay = overlay;
                    self.map.set_overlay(overlay);
                }
            }
        });

        ui.separator();
        ui.heading("Highlight");
        let mut changed = false;
        for entity in self.catalog.entities() {
            let mut on = self.highlighted.contains(&entity.id);
            if ui.checkbox(&mut on, &entity.name).changed() {
                changed = true;
                if on {
                    self.highlighted.push(entity.id.clone());
                } else {
                    self.highlighted.retain(|id| id != &entity.id);
                }
            }
        }
        if changed {
            self.map.set_highlighted_ids(self.highlighted.clone());
        }

        ui.separator();
        ui.heading("Search");
        ui.horizontal(|ui| {
            if ui.button("Add result").clicked() {
                let (id, label, lat, lng) = SEARCH_POOL[self.search.len() % SEARCH_POOL.len()];
                self.search.push(SearchPoint::new(id, label).at(lat, lng));
                self.map.set_search_results(self.search.clone());
            }
            if ui.button("Clear").clicked() {
                self.search.clear();
                self.map.set_search_results(Vec::new());
            }
        });
        for point in &self.search {
            ui.label(format!("• {}", point.label));
        }

        ui.separator();
        ui.heading("Engine");
        ui.label(format!("State: {}", self.map.state()));
        ui.label(format!("Markers: {}", self.map.registry().len()));
        if ui
            .checkbox(&mut self.simulate_failure, "Simulate engine failure")
            .changed()
        {
            self.remount();
        }
        if ui.button("Remount").clicked() {
            self.remount();
        }
    }

    fn surface(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
        let size = Size::new(rect.width() as f64, rect.height() as f64);
        if size != self.surface {
            self.surface = size;
            self.map.handle_input(InputEvent::Resize { size });
            if let Some(engine) = self.map.engine_mut() {
                engine.set_size(size);
            }
        }

        let now = Instant::now();
        self.map.poll(now);
        if let Some(engine) = self.map.engine_mut() {
            engine.advance(now);
        }

        let painter = ui.painter_at(rect);
        let elapsed = now.duration_since(self.started);
        match self.map.render_mode() {
            RenderMode::Loading => painter::paint_loading(&painter, rect),
            RenderMode::Fallback(scene) => painter::paint_schematic(&painter, rect, &scene),
            RenderMode::Live => {
                painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(18, 24, 38));
                if let Some(engine) = self.map.engine() {
                    painter::paint_markers(&painter, rect, engine, elapsed);
                }
                painter::paint_search_overlay(&painter, rect, &self.map.search_overlay());
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let pixel = Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
                self.last_click = pixel;
                let consumed = self.map.handle_input(InputEvent::Click { position: pixel });
                if !consumed {
                    let hit = self
                        .map
                        .engine()
                        .map(|engine| engine.click_at(pixel, CLICK_RADIUS))
                        .unwrap_or(false);
                    if !hit {
                        self.map.close_popup();
                    }
                }
            }
        }

        for event in self.map.process_events() {
            match event {
                MapEvent::MarkerClicked { entity } => self.map.open_summary(entity, self.last_click),
                MapEvent::ViewDetailsRequested { id } => log::info!("Details requested for {}", id),
                _ => {}
            }
        }

        if let Some(view) = self.map.popup().cloned() {
            if let Some(action) = painter::show_popup(ui, rect, &view) {
                self.map.popup_action(action);
            }
        }
    }
}

impl eframe::App for TwinMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.surface(ui));

        // markers pulse continuously
        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

fn mount(catalog: &Catalog, surface: Size, fail: bool) -> TwinCityMap<SceneEngine> {
    let config = MapConfig::default();
    let entities = catalog.to_map_entities();
    let on_click: ClickHandler = Arc::new(|entity: &MapEntity| {
        log::debug!("Marker clicked: {}", entity.id());
    });

    if fail {
        TwinCityMap::mount(
            config,
            entities,
            on_click,
            surface,
            |_: &EngineOptions, _: SignalSender| -> std::result::Result<SceneEngine, EngineError> {
                Err(EngineError::Init("simulated engine failure".into()))
            },
        )
    } else {
        TwinCityMap::mount(
            config,
            entities,
            on_click,
            surface,
            move |options: &EngineOptions, signals: SignalSender| {
                SceneEngine::initialize(options, surface, signals)
            },
        )
    }
}
