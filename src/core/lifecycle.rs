//! Engine lifecycle: start the engine, race load against error and a bounded
//! timeout, and settle into `Ready` or the terminal `Fallback`.

use crate::{
    core::config::LifecycleConfig,
    engine::{
        ControlCorner, EngineFactory, EngineOptions, EngineSignal, MapControl, MapEngine,
        SignalSender, StampedSignal,
    },
};
use crossbeam_channel::Receiver;
use instant::Instant;
use serde::{Deserialize, Serialize};

/// Readiness of the embedded engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Initializing,
    Ready,
    /// Terminal for the session
    Fallback,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Initializing => f.write_str("INITIALIZING"),
            LifecycleState::Ready => f.write_str("READY"),
            LifecycleState::Fallback => f.write_str("FALLBACK"),
        }
    }
}

/// One of the racing outcomes of an engine start
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded,
    Failed(String),
    TimedOut,
}

impl From<EngineSignal> for LoadOutcome {
    fn from(signal: EngineSignal) -> Self {
        match signal {
            EngineSignal::Loaded => LoadOutcome::Loaded,
            EngineSignal::Error(reason) => LoadOutcome::Failed(reason),
        }
    }
}

/// Three-state machine where only the first outcome is acted upon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleMachine {
    state: LifecycleState,
}

impl Default for LifecycleMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleMachine {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Initializing,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Applies an outcome. Returns the new state if this outcome caused the
    /// transition out of `Initializing`, `None` if it arrived too late.
    pub fn resolve(&mut self, outcome: &LoadOutcome) -> Option<LifecycleState> {
        if self.state != LifecycleState::Initializing {
            log::debug!("Ignoring late lifecycle outcome {:?} in state {}", outcome, self.state);
            return None;
        }
        self.state = match outcome {
            LoadOutcome::Loaded => LifecycleState::Ready,
            LoadOutcome::Failed(_) | LoadOutcome::TimedOut => LifecycleState::Fallback,
        };
        Some(self.state)
    }
}

/// Owns the engine instance, its signal channel and the load timeout
pub struct LifecycleController<E: MapEngine> {
    machine: LifecycleMachine,
    engine: Option<E>,
    signals: Option<Receiver<StampedSignal>>,
    deadline: Option<Instant>,
    config: LifecycleConfig,
}

impl<E: MapEngine> LifecycleController<E> {
    pub fn mount<F: EngineFactory<E>>(
        options: &EngineOptions,
        config: &LifecycleConfig,
        controls: &[(MapControl, ControlCorner)],
        factory: F,
    ) -> Self {
        Self::mount_at(Instant::now(), options, config, controls, factory)
    }

    /// Starts the engine with the timeout measured from `now`
    pub fn mount_at<F: EngineFactory<E>>(
        now: Instant,
        options: &EngineOptions,
        config: &LifecycleConfig,
        controls: &[(MapControl, ControlCorner)],
        factory: F,
    ) -> Self {
        let (tx, rx) = SignalSender::channel();
        let mut controller = Self {
            machine: LifecycleMachine::new(),
            engine: None,
            signals: Some(rx),
            deadline: Some(now + config.load_timeout()),
            config: config.clone(),
        };

        match factory.create(options, tx) {
            Ok(mut engine) => {
                let installed = controls
                    .iter()
                    .try_for_each(|(control, corner)| engine.add_control(*control, *corner));
                match installed {
                    Ok(()) => controller.engine = Some(engine),
                    Err(e) => {
                        engine.remove();
                        let _ = controller.apply(LoadOutcome::Failed(e.to_string()));
                    }
                }
            }
            Err(e) => {
                let _ = controller.apply(LoadOutcome::Failed(e.to_string()));
            }
        }

        controller
    }

    pub fn state(&self) -> LifecycleState {
        self.machine.state()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LifecycleState::Ready
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Pending timeout, if the race is still open
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    /// Drains engine signals in send order, then checks the timeout. A
    /// signal stamped at or after the deadline loses to the timeout. Returns
    /// the state entered during this call, if any.
    pub fn poll(&mut self, now: Instant) -> Option<LifecycleState> {
        let mut entered = None;

        let pending: Vec<StampedSignal> = self
            .signals
            .as_ref()
            .map(|rx| rx.try_iter().collect())
            .unwrap_or_default();
        for (signal, sent_at) in pending {
            if self.deadline.map_or(false, |deadline| sent_at >= deadline) {
                if let Some(state) = self.apply(LoadOutcome::TimedOut) {
                    entered = Some(state);
                }
            }
            if let Some(state) = self.apply(signal.into()) {
                entered = Some(state);
            }
        }

        if let Some(deadline) = self.deadline {
            if now >= deadline {
                if let Some(state) = self.apply(LoadOutcome::TimedOut) {
                    entered = Some(state);
                }
            }
        }

        entered
    }

    fn apply(&mut self, outcome: LoadOutcome) -> Option<LifecycleState> {
        let entered = self.machine.resolve(&outcome)?;
        self.deadline = None;
        match (&outcome, entered) {
            (_, LifecycleState::Ready) => log::info!("Map engine loaded"),
            (LoadOutcome::TimedOut, _) => log::warn!(
                "Map engine did not load within {} ms, showing fallback",
                self.config.load_timeout_ms
            ),
            (LoadOutcome::Failed(reason), _) => {
                log::warn!("Map engine failed ({}), showing fallback", reason)
            }
            _ => {}
        }
        Some(entered)
    }

    /// Cancels the timeout and releases the engine. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        self.deadline = None;
        self.signals = None;
        if let Some(mut engine) = self.engine.take() {
            engine.remove();
            log::debug!("Map engine released");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.engine.is_some()
    }
}

impl<E: MapEngine> Drop for LifecycleController<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}
