pub mod marker;
pub mod registry;

pub use marker::{ClickHandler, Emphasis, MarkerElement, MarkerFactory, MarkerVisual, PulseCadence};
pub use registry::{MarkerHandle, MarkerRegistry, ReconcileReport};
