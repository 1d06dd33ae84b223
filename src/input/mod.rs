pub mod events;

pub use events::{EventCallback, EventManager, InputEvent, MapEvent};
