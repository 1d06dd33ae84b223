pub mod camera;
pub mod fallback;
pub mod overlay;

// Re-export main types
pub use camera::CameraController;
pub use fallback::{SchematicPin, SchematicScene, FALLBACK_CAPTION, LOADING_CAPTION};
pub use overlay::{project_search_points, SearchHitBox};
