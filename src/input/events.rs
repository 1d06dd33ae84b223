use crate::{
    core::{
        geo::{LatLng, Point, Size},
        lifecycle::LifecycleState,
    },
    data::entity::MapEntity,
    ui::popup::PopupKind,
};
use std::collections::VecDeque;

use crate::prelude::HashMap;

/// Pointer and window input forwarded from the host surface
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary click/tap in screen pixels
    Click { position: Point },
    /// Viewport/window resize
    Resize { size: Size },
}

impl InputEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position } => Some(*position),
            InputEvent::Resize { .. } => None,
        }
    }
}

/// Events emitted by the map to the host
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A marker or search overlay was activated
    MarkerClicked { entity: MapEntity },
    LifecycleChanged { state: LifecycleState },
    /// Camera move issued toward a search result
    CameraFlown { target: LatLng },
    PopupOpened { id: String, kind: PopupKind },
    PopupClosed { id: String },
    /// The host should navigate to the detail view for this entity
    ViewDetailsRequested { id: String },
}

impl MapEvent {
    /// Listener key for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::MarkerClicked { .. } => "markerclick",
            MapEvent::LifecycleChanged { .. } => "lifecycle",
            MapEvent::CameraFlown { .. } => "camera",
            MapEvent::PopupOpened { .. } => "popupopen",
            MapEvent::PopupClosed { .. } => "popupclose",
            MapEvent::ViewDetailsRequested { .. } => "viewdetails",
        }
    }
}

/// Event callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Queues map events and dispatches them to named listeners
#[derive(Default)]
pub struct EventManager {
    listeners: HashMap<String, Vec<EventCallback>>,
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Dispatches all queued events and hands them back to the caller
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    pub fn pending(&self) -> usize {
        self.event_queue.len()
    }

    pub fn clear_events(&mut self) {
        self.event_queue.clear();
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .field("queued", &self.event_queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn test_listeners_receive_matching_events() {
        let mut manager = EventManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        manager.on("popupclose", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.emit(MapEvent::PopupClosed { id: "a".into() });
        manager.emit(MapEvent::ViewDetailsRequested { id: "a".into() });
        assert_eq!(manager.pending(), 2);

        let processed = manager.process_events();
        assert_eq!(processed.len(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending(), 0);
    }

    #[test]
    fn test_input_event_position() {
        let click = InputEvent::Click {
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(click.position(), Some(Point::new(100.0, 200.0)));
        assert_eq!(
            InputEvent::Resize {
                size: Size::new(10.0, 10.0)
            }
            .position(),
            None
        );
    }
}
