use crate::{
    core::{config::FlyToConfig, lifecycle::LifecycleState},
    data::entity::SearchPoint,
    engine::{FlyTo, MapEngine},
};

/// Flies the camera to the newest search result.
///
/// Camera moves are cosmetic: engine failures are logged and swallowed.
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    config: FlyToConfig,
    last_flight: Option<FlyTo>,
}

impl CameraController {
    pub fn new(config: FlyToConfig) -> Self {
        Self {
            config,
            last_flight: None,
        }
    }

    pub fn last_flight(&self) -> Option<&FlyTo> {
        self.last_flight.as_ref()
    }

    /// Target for a result list: the last entry, if it has a usable position
    pub fn target_for(&self, results: &[SearchPoint]) -> Option<FlyTo> {
        let latest = results.last()?;
        let center = latest.position.filter(|p| p.is_finite())?;
        Some(FlyTo {
            center,
            zoom: self.config.zoom,
            speed: self.config.speed,
            essential: self.config.essential,
        })
    }

    /// Returns the move that was issued, if any.
    pub fn on_search_results<E: MapEngine>(
        &mut self,
        lifecycle: LifecycleState,
        engine: Option<&mut E>,
        results: &[SearchPoint],
    ) -> Option<FlyTo> {
        if lifecycle != LifecycleState::Ready {
            return None;
        }
        let engine = engine?;
        let target = self.target_for(results)?;

        match engine.fly_to(&target) {
            Ok(()) => {
                self.last_flight = Some(target);
                Some(target)
            }
            Err(e) => {
                log::debug!("Camera move to {:?} dropped: {}", target.center, e);
                None
            }
        }
    }
}
