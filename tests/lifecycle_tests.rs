mod common;

use common::{
    broken_factory, noop_handler, pending_factory, send, send_at, EngineLog, Faults, SharedLog,
    SignalSlot,
};
use std::sync::{Arc, Mutex};
use twinmap::prelude::*;

fn shared() -> (SharedLog, SignalSlot) {
    (Arc::new(Mutex::new(EngineLog::default())), Arc::new(Mutex::new(None)))
}

fn mount(now: Instant, log: &SharedLog, slot: &SignalSlot, faults: Faults) -> TwinCityMap<common::FakeEngine> {
    TwinCityMap::mount_at(
        now,
        MapConfig::default(),
        Catalog::chicago_loop().to_map_entities(),
        noop_handler(),
        Size::new(1024.0, 768.0),
        pending_factory(log.clone(), faults, slot.clone()),
    )
}

/// Load/error/timeout race of the engine lifecycle
#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_load_before_timeout_is_ready() {
        let (log, slot) = shared();
        let start = Instant::now();
        let mut map = mount(start, &log, &slot, Faults::default());
        assert_eq!(map.state(), LifecycleState::Initializing);
        assert_eq!(map.render_mode(), RenderMode::Loading);

        send(&slot, EngineSignal::Loaded);
        assert_eq!(map.poll(start + Duration::from_millis(100)), Some(LifecycleState::Ready));
        assert_eq!(map.render_mode(), RenderMode::Live);

        // the timeout is gone and a late error changes nothing
        send(&slot, EngineSignal::Error("tile 404".into()));
        assert_eq!(map.poll(start + Duration::from_secs(10)), None);
        assert_eq!(map.state(), LifecycleState::Ready);
        assert_eq!(log.lock().unwrap().live.len(), 6);
    }

    /// A success that lands after the timeout never revives the map
    #[test]
    fn test_timeout_then_late_success_stays_fallback() {
        let (log, slot) = shared();
        let start = Instant::now();
        let mut map = mount(start, &log, &slot, Faults::default());

        assert_eq!(map.poll(start + Duration::from_millis(4_999)), None);
        assert_eq!(map.poll(start + Duration::from_millis(5_000)), Some(LifecycleState::Fallback));

        send(&slot, EngineSignal::Loaded);
        assert_eq!(map.poll(start + Duration::from_millis(5_100)), None);
        assert_eq!(map.state(), LifecycleState::Fallback);
        assert!(matches!(map.render_mode(), RenderMode::Fallback(_)));
        assert!(log.lock().unwrap().created.is_empty());
    }

    /// A load raised after the deadline loses even when no poll ran in between
    #[test]
    fn test_load_sent_after_deadline_loses_to_timeout() {
        let (log, slot) = shared();
        let config = MapConfig::default().with_load_timeout(Duration::from_millis(20));
        let mut map = TwinCityMap::mount(
            config,
            Catalog::chicago_loop().to_map_entities(),
            noop_handler(),
            Size::new(1024.0, 768.0),
            pending_factory(log.clone(), Faults::default(), slot.clone()),
        );

        std::thread::sleep(std::time::Duration::from_millis(60));
        send(&slot, EngineSignal::Loaded);

        assert_eq!(map.poll(Instant::now()), Some(LifecycleState::Fallback));
        assert_eq!(map.state(), LifecycleState::Fallback);
        assert!(log.lock().unwrap().created.is_empty());
    }

    #[test]
    fn test_signal_stamped_at_deadline_counts_as_late() {
        let (log, slot) = shared();
        let start = Instant::now();
        let mut map = mount(start, &log, &slot, Faults::default());

        send_at(&slot, EngineSignal::Loaded, start + Duration::from_millis(5_000));
        assert_eq!(map.poll(start + Duration::from_millis(5_001)), Some(LifecycleState::Fallback));

        send_at(&slot, EngineSignal::Loaded, start + Duration::from_millis(4_000));
        assert_eq!(map.poll(start + Duration::from_millis(5_002)), None);
        assert_eq!(map.state(), LifecycleState::Fallback);
    }

    #[test]
    fn test_error_signal_falls_back() {
        let (log, slot) = shared();
        let start = Instant::now();
        let mut map = mount(start, &log, &slot, Faults::default());

        send(&slot, EngineSignal::Error("style failed".into()));
        assert_eq!(map.poll(start), Some(LifecycleState::Fallback));
        assert_eq!(map.set_highlighted_ids(vec!["listing-001".into()]), None);
        assert!(log.lock().unwrap().created.is_empty());
    }

    /// Signals already queued win over a deadline that passed meanwhile
    #[test]
    fn test_queued_signal_beats_expired_deadline() {
        let (log, slot) = shared();
        let start = Instant::now();
        let mut map = mount(start, &log, &slot, Faults::default());

        send(&slot, EngineSignal::Loaded);
        assert_eq!(map.poll(start + Duration::from_secs(30)), Some(LifecycleState::Ready));
    }

    #[test]
    fn test_construction_failure_goes_straight_to_fallback() {
        let mut map = TwinCityMap::mount(
            MapConfig::default(),
            Catalog::chicago_loop().to_map_entities(),
            noop_handler(),
            Size::new(1024.0, 768.0),
            broken_factory(),
        );

        assert_eq!(map.state(), LifecycleState::Fallback);
        assert!(map.engine().is_none());
        let events = map.process_events();
        assert_eq!(
            events,
            vec![MapEvent::LifecycleChanged {
                state: LifecycleState::Fallback
            }]
        );
        map.unmount();
        map.unmount();
    }

    #[test]
    fn test_control_failure_releases_engine() {
        let (log, slot) = shared();
        let faults = Faults {
            fail_controls: true,
            ..Faults::default()
        };
        let map = mount(Instant::now(), &log, &slot, faults);

        assert_eq!(map.state(), LifecycleState::Fallback);
        assert!(!map.is_mounted());
        assert_eq!(log.lock().unwrap().releases, 1);
    }

    /// Unmount detaches markers and releases the engine exactly once
    #[test]
    fn test_unmount_is_idempotent() {
        let (log, slot) = shared();
        let start = Instant::now();
        let mut map = mount(start, &log, &slot, Faults::default());
        send(&slot, EngineSignal::Loaded);
        map.poll(start);

        map.unmount();
        map.unmount();
        assert_eq!(map.reconcile(), None);
        drop(map);

        let log = log.lock().unwrap();
        assert!(log.live.is_empty());
        assert_eq!(log.removed, 6);
        assert_eq!(log.releases, 1);
    }

    #[test]
    fn test_drop_releases_engine() {
        let (log, slot) = shared();
        {
            let _map = mount(Instant::now(), &log, &slot, Faults::default());
        }
        assert_eq!(log.lock().unwrap().releases, 1);
    }

    /// The navigation control lands in the configured corner
    #[test]
    fn test_navigation_control_installed() {
        let (log, slot) = shared();
        let _map = mount(Instant::now(), &log, &slot, Faults::default());

        assert_eq!(
            log.lock().unwrap().controls,
            vec![(MapControl::Navigation { show_compass: true }, ControlCorner::TopRight)]
        );
    }

    #[cfg(feature = "tokio-runtime")]
    #[tokio::test]
    async fn test_settle_waits_for_load() {
        let (log, slot) = shared();
        let mut map = mount(Instant::now(), &log, &slot, Faults::default());

        let sender = slot.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(30));
            send(&sender, EngineSignal::Loaded);
        });

        assert_eq!(map.settle().await, LifecycleState::Ready);
        assert_eq!(log.lock().unwrap().live.len(), 6);
    }

    #[cfg(feature = "tokio-runtime")]
    #[tokio::test]
    async fn test_settle_times_out() {
        let (log, slot) = shared();
        let config = MapConfig::default().with_load_timeout(Duration::from_millis(80));
        let mut map = TwinCityMap::mount(
            config,
            Vec::new(),
            noop_handler(),
            Size::new(640.0, 480.0),
            pending_factory(log.clone(), Faults::default(), slot.clone()),
        );

        assert_eq!(map.settle().await, LifecycleState::Fallback);
    }
}
