//! Boundary to the embedded map engine.
//!
//! The core only ever needs a handful of engine operations: construct with a
//! style, add a control, project a coordinate, fly the camera, attach and
//! detach markers, and release the instance. Anything offering that set can
//! drive the marker layer; [`scene::SceneEngine`] is the in-process one.

pub mod scene;

use crate::{
    core::{
        config::{MapConfig, TileStyleConfig},
        geo::{LatLng, Point},
    },
    layers::marker::MarkerElement,
};
use crossbeam_channel::{Receiver, Sender};
use instant::Instant;

/// Identifier the engine hands out for an attached marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineMarkerId(pub u64);

/// Asynchronous readiness signals raised by an engine after construction
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSignal {
    Loaded,
    Error(String),
}

/// A signal together with the moment the engine raised it
pub type StampedSignal = (EngineSignal, Instant);

/// Channel end handed to the engine so it can report load/error later.
/// Every signal is stamped on send, so the controller can tell whether it
/// arrived before the load timeout no matter when it gets polled.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: Sender<StampedSignal>,
}

impl SignalSender {
    /// Creates a sender and the receiving end the controller drains
    pub fn channel() -> (Self, Receiver<StampedSignal>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }

    pub fn send(&self, signal: EngineSignal) -> Result<(), EngineError> {
        self.send_at(signal, Instant::now())
    }

    pub fn send_at(&self, signal: EngineSignal, at: Instant) -> Result<(), EngineError> {
        self.tx.send((signal, at)).map_err(|_| EngineError::Released)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    Init(String),

    #[error("engine failed to load: {0}")]
    Load(String),

    #[error("marker rejected: {0}")]
    MarkerRejected(String),

    #[error("projection failed: {0}")]
    Projection(String),

    #[error("camera move failed: {0}")]
    Camera(String),

    #[error("engine instance already released")]
    Released,
}

/// Style and initial camera passed to the engine constructor
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub style: TileStyleConfig,
    pub center: LatLng,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub attribution_control: bool,
}

impl EngineOptions {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            style: config.style.clone(),
            center: config.camera.center,
            zoom: config.camera.zoom,
            pitch: config.camera.pitch,
            bearing: config.camera.bearing,
            attribution_control: config.camera.attribution_control,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapControl {
    Navigation { show_compass: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Programmatic camera animation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyTo {
    pub center: LatLng,
    pub zoom: f64,
    pub speed: f64,
    /// Animate even when the user prefers reduced motion
    pub essential: bool,
}

/// The operation set the marker layer depends on
pub trait MapEngine {
    fn add_control(&mut self, control: MapControl, corner: ControlCorner) -> Result<(), EngineError>;

    /// Geographic coordinate to screen pixel
    fn project(&self, at: LatLng) -> Result<Point, EngineError>;

    fn fly_to(&mut self, target: &FlyTo) -> Result<(), EngineError>;

    fn create_marker(&mut self, element: MarkerElement, at: LatLng) -> Result<EngineMarkerId, EngineError>;

    fn remove_marker(&mut self, id: EngineMarkerId) -> Result<(), EngineError>;

    /// Releases the instance and everything attached to it. Must tolerate
    /// being called more than once.
    fn remove(&mut self);
}

/// Constructs an engine for the given options. Load and error are reported
/// later through the signal channel; a constructor error means the engine
/// never came up at all.
pub trait EngineFactory<E: MapEngine> {
    fn create(self, options: &EngineOptions, signals: SignalSender) -> Result<E, EngineError>;
}

impl<E, F> EngineFactory<E> for F
where
    E: MapEngine,
    F: FnOnce(&EngineOptions, SignalSender) -> Result<E, EngineError>,
{
    fn create(self, options: &EngineOptions, signals: SignalSender) -> Result<E, EngineError> {
        self(options, signals)
    }
}
