#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use skytrail_core::clock::{Clock, ManualClock};
    use skytrail_core::engine::{FlightControl, FlightEngine, FlightPhase, TickOutcome};
    use skytrail_core::geodesy::Coordinate;
    use skytrail_core::observer::{FlightEvent, FlightObserver, RecordingObserver};
    use skytrail_core::plan::FlightPlan;
    use skytrail_core::scheduler::ManualScheduler;
    use skytrail_core::CameraMode;

    const LHR: Coordinate = Coordinate::new(51.4700, -0.4543);
    const JFK: Coordinate = Coordinate::new(40.6413, -73.7781);

    fn init_logging() {
        let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Debug, simplelog::Config::default());
    }

    fn clock_at(hour: u32) -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 1, hour, 0, 0).unwrap())
    }

    fn lhr_jfk() -> FlightPlan {
        FlightPlan::build_default(LHR, JFK)
            .unwrap()
            .with_labels("London", "New York")
    }

    /// Delivers queued frames until none are left, stepping the clock by
    /// `step_ms` before each one.
    fn run_to_end<O: FlightObserver>(
        engine: &mut FlightEngine<ManualClock, ManualScheduler, O>,
        clock: &ManualClock,
        step_ms: f64,
    ) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        while let Some(request) = engine.scheduler_mut().next() {
            outcomes.push(engine.on_frame(request));
            clock.advance_ms(step_ms);
        }
        outcomes
    }

    #[test]
    fn test_full_flight_lhr_jfk() {
        init_logging();
        let clock = clock_at(12);
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        engine.launch(lhr_jfk()).unwrap();

        // Ten-minute ticks: ~40 frames for a 6.5 hour flight
        let outcomes = run_to_end(&mut engine, &clock, 600_000.0);
        assert_eq!(outcomes.last(), Some(&TickOutcome::Arrived));
        assert!(outcomes[..outcomes.len() - 1]
            .iter()
            .all(|o| *o == TickOutcome::Continued));
        assert_eq!(engine.phase(), FlightPhase::Completed);

        let rec = engine.observer();
        let positions = rec.positions();
        assert!(positions.first().unwrap().approx_eq(&LHR, 1e-9));
        assert!(positions.last().unwrap().approx_eq(&JFK, 1e-9));

        // First countdown is the whole flight
        assert!(rec.timers()[0].starts_with("06:31:"));
        assert_eq!(*rec.timers().last().unwrap(), "00:00:00");

        // Arrival exactly once, and nothing after it
        assert_eq!(rec.arrivals(), vec!["New York"]);
        assert!(matches!(rec.events.last(), Some(FlightEvent::Arrival(_))));
        let last_position = rec
            .events
            .iter()
            .rposition(|e| matches!(e, FlightEvent::Position(_)))
            .unwrap();
        let arrival = rec
            .events
            .iter()
            .position(|e| matches!(e, FlightEvent::Arrival(_)))
            .unwrap();
        assert!(arrival > last_position);
    }

    #[test]
    fn test_progress_bounded_and_monotonic() {
        let clock = clock_at(12);
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        engine.launch(lhr_jfk()).unwrap();

        let mut last = 0.0;
        let steps = [0.0, 1_000.0, 5_000_000.0, -3_000_000.0, 2.0, 30_000_000.0];
        for step in steps {
            clock.advance_ms(step);
            let request = match engine.scheduler_mut().next() {
                Some(r) => r,
                None => break,
            };
            engine.on_frame(request);
            let progress = engine.animation().unwrap().progress;
            assert!((0.0..=1.0).contains(&progress));
            assert!(progress >= last, "progress went back: {} -> {}", last, progress);
            last = progress;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_position_is_linear_interpolation() {
        let clock = clock_at(12);
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        engine.launch(lhr_jfk()).unwrap();
        let half = engine.plan().unwrap().duration_ms() / 2.0;

        clock.advance_ms(half);
        let request = engine.scheduler_mut().next().unwrap();
        engine.on_frame(request);

        let pos = engine.animation().unwrap().current_position;
        assert!(pos.approx_eq(&Coordinate::new(46.05565, -37.1162), 1e-6));
    }

    #[test]
    fn test_reset_with_pending_frame() {
        let clock = clock_at(12);
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        engine.launch(lhr_jfk()).unwrap();
        let first = engine.scheduler_mut().next().unwrap();
        engine.on_frame(first);
        assert_eq!(engine.scheduler_mut().pending(), 1);

        engine.observer_mut().clear();
        engine.reset();
        assert_eq!(engine.phase(), FlightPhase::Idle);

        // The frame queued before the reset still gets delivered
        let outcomes = run_to_end(&mut engine, &clock, 1_000.0);
        assert_eq!(outcomes, vec![TickOutcome::Stale]);
        assert!(engine.observer().events.is_empty());
    }

    #[test]
    fn test_stale_frame_does_not_drive_new_flight() {
        let clock = clock_at(12);
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        engine.launch(lhr_jfk()).unwrap();
        engine.reset();
        engine.launch(lhr_jfk()).unwrap();

        // Old request first, then the new flight's request
        assert_eq!(engine.scheduler_mut().pending(), 2);
        let stale = engine.scheduler_mut().next().unwrap();
        assert_eq!(engine.on_frame(stale), TickOutcome::Stale);
        let live = engine.scheduler_mut().next().unwrap();
        assert_eq!(engine.on_frame(live), TickOutcome::Continued);
        assert_eq!(engine.observer().positions().len(), 1);
    }

    /// Aborts the flight from inside the position callback on the n-th tick.
    struct AbortingObserver {
        inner: RecordingObserver,
        control: Option<FlightControl>,
        abort_on_tick: usize,
        ticks: usize,
    }

    impl FlightObserver for AbortingObserver {
        fn on_position_update(&mut self, position: Coordinate) {
            self.inner.on_position_update(position);
            self.ticks += 1;
            if self.ticks == self.abort_on_tick {
                if let Some(control) = &self.control {
                    control.reset();
                }
            }
        }

        fn on_lighting_change(&mut self, is_day: bool) {
            self.inner.on_lighting_change(is_day);
        }

        fn on_camera_recenter(&mut self, center: Coordinate) {
            self.inner.on_camera_recenter(center);
        }

        fn on_timer_tick(&mut self, remaining: &str) {
            self.inner.on_timer_tick(remaining);
        }

        fn on_arrival(&mut self, label: &str) {
            self.inner.on_arrival(label);
        }
    }

    #[test]
    fn test_reset_from_inside_callback() {
        let clock = clock_at(12);
        let observer = AbortingObserver {
            inner: RecordingObserver::new(),
            control: None,
            abort_on_tick: 3,
            ticks: 0,
        };
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), observer);
        let control = engine.control();
        engine.observer_mut().control = Some(control);
        engine.launch(lhr_jfk()).unwrap();

        let outcomes = run_to_end(&mut engine, &clock, 60_000.0);
        assert_eq!(
            outcomes,
            vec![
                TickOutcome::Continued,
                TickOutcome::Continued,
                TickOutcome::Aborted
            ]
        );
        assert_eq!(engine.phase(), FlightPhase::Idle);

        let rec = &engine.observer().inner;
        assert_eq!(rec.positions().len(), 3);
        // The aborted tick reported its position but no timer
        assert_eq!(rec.timers().len(), 2);
        assert!(rec.arrivals().is_empty());
        assert!(matches!(rec.events.last(), Some(FlightEvent::Position(_))));
    }

    #[test]
    fn test_camera_free_mid_flight() {
        let clock = clock_at(12);
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        let control = engine.control();
        engine.launch(lhr_jfk()).unwrap();

        for _ in 0..3 {
            let request = engine.scheduler_mut().next().unwrap();
            engine.on_frame(request);
            clock.advance_ms(60_000.0);
        }
        assert_eq!(engine.observer().recenters(), 3);

        assert_eq!(control.toggle_camera(), CameraMode::Free);
        engine.observer_mut().clear();
        run_to_end(&mut engine, &clock, 600_000.0);
        assert_eq!(engine.observer().recenters(), 0);
        assert_eq!(engine.observer().arrivals().len(), 1);
    }

    #[test]
    fn test_engine_starting_free_never_recenters() {
        let clock = clock_at(12);
        let mut engine = FlightEngine::with_camera(
            clock.clone(),
            ManualScheduler::new(),
            RecordingObserver::new(),
            CameraMode::Free,
        );
        engine.launch(lhr_jfk()).unwrap();
        run_to_end(&mut engine, &clock, 600_000.0);
        assert_eq!(engine.observer().recenters(), 0);
    }

    #[test]
    fn test_lighting_flips_across_terminator() {
        // At 19:00 UTC London is local ~19 (night) and everything west of
        // 15W is local 18 or earlier (day).
        let clock = clock_at(19);
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        engine.launch(lhr_jfk()).unwrap();

        // Hold the wall clock so only the longitude moves the flag.
        let utc = clock.utc_now();
        while let Some(request) = engine.scheduler_mut().next() {
            engine.on_frame(request);
            clock.set_ms(clock.monotonic_ms() + 600_000.0);
            clock.set_utc(utc);
        }
        assert_eq!(engine.observer().lighting(), vec![false, true]);
    }

    #[test]
    fn test_completed_then_reset_then_relaunch() {
        let clock = clock_at(12);
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        engine.launch(lhr_jfk()).unwrap();
        run_to_end(&mut engine, &clock, 3_600_000.0);
        assert_eq!(engine.phase(), FlightPhase::Completed);
        assert!(engine.launch(lhr_jfk()).is_err());

        engine.reset();
        assert_eq!(engine.phase(), FlightPhase::Idle);
        engine.launch(lhr_jfk()).unwrap();
        assert_eq!(engine.phase(), FlightPhase::Running);
    }
}
