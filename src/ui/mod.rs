pub mod popup;
pub mod style;

#[cfg(feature = "egui")]
pub mod painter;

pub use popup::{PopupAction, PopupKind, PopupRow, PopupState, PopupView};
pub use style::{MarkerPalette, Rgba};
