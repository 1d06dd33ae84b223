//! egui painting for marker visuals, the loading screen, the fallback
//! schematic and popups.
//!
//! All positions coming from the core are relative to the map surface; the
//! `rect` passed in gives the surface's placement inside the window.

use crate::{
    core::geo::Point,
    engine::scene::SceneEngine,
    layers::marker::MarkerVisual,
    rendering::{
        fallback::{SchematicScene, LOADING_CAPTION},
        overlay::SearchHitBox,
    },
    ui::popup::{PopupAction, PopupView},
};
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Ui, Vec2};
use std::time::Duration;

const MARKER_RADIUS: f32 = 7.0;
const BACKDROP: Color32 = Color32::from_rgb(10, 14, 24);

fn to_pos(rect: Rect, point: Point) -> Pos2 {
    rect.min + Vec2::new(point.x as f32, point.y as f32)
}

/// Paints every marker attached to the scene engine
pub fn paint_markers(painter: &Painter, rect: Rect, engine: &SceneEngine, elapsed: Duration) {
    for (element, pixel) in engine.projected_markers() {
        let center = to_pos(rect, pixel);
        if rect.contains(center) {
            paint_marker(painter, center, element.visual(), elapsed);
        }
    }
}

pub fn paint_marker(painter: &Painter, center: Pos2, visual: &MarkerVisual, elapsed: Duration) {
    let color: Color32 = visual.color.into();
    let radius = MARKER_RADIUS * visual.emphasis.scale();

    // breathing halo
    let phase = visual.pulse.phase(elapsed);
    let halo = radius * (1.0 + phase);
    let alpha = ((1.0 - phase) * 120.0) as u8;
    painter.circle_filled(center, halo, visual.color.with_alpha(alpha));

    painter.circle_filled(center, radius, color);
    painter.circle_stroke(center, radius, Stroke::new(1.5, Color32::WHITE));

    for (dx, dy) in visual.orbit_offsets(radius * 2.0) {
        painter.circle_filled(center + Vec2::new(dx, dy), 1.5, color);
    }

    if visual.label_pinned {
        painter.text(
            center + Vec2::new(0.0, -radius - 6.0),
            Align2::CENTER_BOTTOM,
            &visual.label,
            FontId::proportional(12.0),
            Color32::WHITE,
        );
    }
}

pub fn paint_search_overlay(painter: &Painter, rect: Rect, boxes: &[SearchHitBox]) {
    for hit in boxes {
        let min = to_pos(rect, hit.min);
        let area = Rect::from_min_size(min, Vec2::new(hit.size.width as f32, hit.size.height as f32));
        painter.rect_stroke(area, 6.0, Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 0, 102, 90)));
    }
}

pub fn paint_loading(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKDROP);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        LOADING_CAPTION,
        FontId::monospace(14.0),
        Color32::from_rgb(96, 165, 250),
    );
}

pub fn paint_schematic(painter: &Painter, rect: Rect, scene: &SchematicScene) {
    painter.rect_filled(rect, 0.0, BACKDROP);

    let grid = Stroke::new(0.5, Color32::from_rgba_unmultiplied(255, 255, 255, 12));
    let step = 40.0;
    let mut x = rect.left();
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], grid);
        x += step;
    }
    let mut y = rect.top();
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], grid);
        y += step;
    }

    let frame = crate::core::geo::Size::new(rect.width() as f64, rect.height() as f64);
    for pin in &scene.placeholders {
        let at = to_pos(rect, pin.resolve(frame));
        painter.circle_filled(at, 5.0, Color32::from_rgb(59, 130, 246));
        painter.text(
            at + Vec2::new(8.0, 0.0),
            Align2::LEFT_CENTER,
            &pin.label,
            FontId::proportional(11.0),
            Color32::from_gray(160),
        );
    }
    for pin in &scene.search_pins {
        let at = to_pos(rect, pin.resolve(frame));
        painter.circle_filled(at, 6.0, Color32::from_rgb(255, 0, 102));
        painter.text(
            at + Vec2::new(8.0, 0.0),
            Align2::LEFT_CENTER,
            &pin.label,
            FontId::proportional(11.0),
            Color32::WHITE,
        );
    }

    painter.text(
        rect.center_bottom() + Vec2::new(0.0, -16.0),
        Align2::CENTER_BOTTOM,
        scene.caption(),
        FontId::monospace(12.0),
        Color32::from_rgb(250, 204, 21),
    );
}

/// Shows a popup card and returns the button the user pressed, if any
pub fn show_popup(ui: &mut Ui, rect: Rect, view: &PopupView) -> Option<PopupAction> {
    let mut action = None;
    let size = Vec2::new(view.size.width as f32, view.size.height as f32);

    egui::Area::new(egui::Id::new(("twinmap_popup", view.id())))
        .fixed_pos(to_pos(rect, view.position))
        .order(egui::Order::Foreground)
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(size.x);
                ui.set_max_height(size.y);
                ui.horizontal(|ui| {
                    ui.heading(&view.title);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("x").clicked() {
                            action = Some(PopupAction::Close);
                        }
                    });
                });
                ui.separator();
                for row in &view.rows {
                    ui.label(row.text());
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("View Details").clicked() {
                        action = Some(PopupAction::ViewDetails);
                    }
                    if ui.button("Close").clicked() {
                        action = Some(PopupAction::Close);
                    }
                });
            });
        });

    action
}
