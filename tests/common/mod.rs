#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex},
};
use twinmap::{
    core::geo::{LatLng, Point},
    engine::{
        ControlCorner, EngineError, EngineMarkerId, EngineOptions, FlyTo, MapControl, MapEngine,
        SignalSender,
    },
    layers::marker::{ClickHandler, MarkerElement},
    prelude::Instant,
    MapEntity,
};

/// Failures the fake engine should inject
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub reject_markers: HashSet<String>,
    pub fail_camera: bool,
    pub fail_controls: bool,
    pub fail_projection: bool,
}

impl Faults {
    pub fn rejecting(ids: &[&str]) -> Self {
        Self {
            reject_markers: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }
}

/// Everything the fake engine was asked to do, shared with the test
#[derive(Debug, Default)]
pub struct EngineLog {
    pub live: BTreeMap<EngineMarkerId, MarkerElement>,
    pub created: Vec<String>,
    pub removed: usize,
    pub flights: Vec<FlyTo>,
    pub controls: Vec<(MapControl, ControlCorner)>,
    pub releases: usize,
}

impl EngineLog {
    pub fn live_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.live.values().map(|e| e.id().to_string()).collect();
        ids.sort();
        ids
    }

    pub fn live_element(&self, id: &str) -> Option<&MarkerElement> {
        self.live.values().find(|e| e.id() == id)
    }
}

pub type SharedLog = Arc<Mutex<EngineLog>>;

pub struct FakeEngine {
    log: SharedLog,
    faults: Faults,
    next_id: u64,
    released: bool,
}

impl FakeEngine {
    pub fn new(log: SharedLog, faults: Faults) -> Self {
        Self {
            log,
            faults,
            next_id: 0,
            released: false,
        }
    }

    fn live(&self) -> Result<(), EngineError> {
        if self.released {
            Err(EngineError::Released)
        } else {
            Ok(())
        }
    }
}

impl MapEngine for FakeEngine {
    fn add_control(&mut self, control: MapControl, corner: ControlCorner) -> Result<(), EngineError> {
        self.live()?;
        if self.faults.fail_controls {
            return Err(EngineError::Init("control rejected".into()));
        }
        self.log.lock().unwrap().controls.push((control, corner));
        Ok(())
    }

    fn project(&self, at: LatLng) -> Result<Point, EngineError> {
        self.live()?;
        if self.faults.fail_projection {
            return Err(EngineError::Projection("no transform".into()));
        }
        Ok(Point::new((at.lng + 180.0) * 10.0, (90.0 - at.lat) * 10.0))
    }

    fn fly_to(&mut self, target: &FlyTo) -> Result<(), EngineError> {
        self.live()?;
        if self.faults.fail_camera {
            return Err(EngineError::Camera("camera busy".into()));
        }
        self.log.lock().unwrap().flights.push(*target);
        Ok(())
    }

    fn create_marker(&mut self, element: MarkerElement, _at: LatLng) -> Result<EngineMarkerId, EngineError> {
        self.live()?;
        if self.faults.reject_markers.contains(element.id()) {
            return Err(EngineError::MarkerRejected(element.id().to_string()));
        }
        self.next_id += 1;
        let id = EngineMarkerId(self.next_id);
        let mut log = self.log.lock().unwrap();
        log.created.push(element.id().to_string());
        log.live.insert(id, element);
        Ok(id)
    }

    fn remove_marker(&mut self, id: EngineMarkerId) -> Result<(), EngineError> {
        self.live()?;
        let mut log = self.log.lock().unwrap();
        log.live.remove(&id);
        log.removed += 1;
        Ok(())
    }

    fn remove(&mut self) {
        if !self.released {
            self.released = true;
            self.log.lock().unwrap().releases += 1;
        }
    }
}

/// Slot holding the signal sender so the test can play the engine's
/// asynchronous side
pub type SignalSlot = Arc<Mutex<Option<SignalSender>>>;

/// Factory for an engine that stays loading until the test signals it
pub fn pending_factory(
    log: SharedLog,
    faults: Faults,
    slot: SignalSlot,
) -> impl FnOnce(&EngineOptions, SignalSender) -> Result<FakeEngine, EngineError> {
    move |_options, signals| {
        *slot.lock().unwrap() = Some(signals);
        Ok(FakeEngine::new(log, faults))
    }
}

/// Factory for an engine that reports `Loaded` during construction
pub fn loaded_factory(
    log: SharedLog,
    faults: Faults,
) -> impl FnOnce(&EngineOptions, SignalSender) -> Result<FakeEngine, EngineError> {
    move |_options, signals| {
        signals
            .send(twinmap::EngineSignal::Loaded)
            .expect("controller listening");
        Ok(FakeEngine::new(log, faults))
    }
}

pub fn broken_factory() -> impl FnOnce(&EngineOptions, SignalSender) -> Result<FakeEngine, EngineError> {
    |_options, _signals| Err(EngineError::Init("webgl unavailable".into()))
}

pub fn send(slot: &SignalSlot, signal: twinmap::EngineSignal) {
    if let Some(tx) = slot.lock().unwrap().as_ref() {
        let _ = tx.send(signal);
    }
}

/// Sends a signal stamped with an explicit time, for fake-clock tests
pub fn send_at(slot: &SignalSlot, signal: twinmap::EngineSignal, at: Instant) {
    if let Some(tx) = slot.lock().unwrap().as_ref() {
        let _ = tx.send_at(signal, at);
    }
}

/// Click handler that records the identities it was called with
pub fn recording_handler() -> (ClickHandler, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handler: ClickHandler = Arc::new(move |entity: &MapEntity| {
        sink.lock().unwrap().push(entity.id().to_string());
    });
    (handler, seen)
}

pub fn noop_handler() -> ClickHandler {
    Arc::new(|_: &MapEntity| {})
}
