// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! The animation loop.
//!
//! `Idle -> Running -> Completed`, with reset returning to `Idle` from any
//! phase. One engine instance owns the plan, the animation state and the
//! shared [`FlightControl`]; nothing here is global.

use crate::camera::CameraMode;
use crate::clock::Clock;
use crate::error::SimError;
use crate::geodesy::Coordinate;
use crate::observer::FlightObserver;
use crate::plan::{format_countdown, FlightPlan};
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::solar;
use log::{debug, info};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

const NO_FLIGHT: u64 = 0;

#[derive(Debug)]
struct ControlState {
    live_flight: AtomicU64,
    camera_locked: AtomicBool,
}

/// Handle for the two user commands that may arrive at any time: camera
/// toggle and abort. Clones share state, and it is safe to use from inside
/// an observer callback or from another thread.
#[derive(Debug, Clone)]
pub struct FlightControl {
    inner: Arc<ControlState>,
}

impl FlightControl {
    fn new(camera: CameraMode) -> Self {
        Self {
            inner: Arc::new(ControlState {
                live_flight: AtomicU64::new(NO_FLIGHT),
                camera_locked: AtomicBool::new(camera.is_locked()),
            }),
        }
    }

    pub fn camera_mode(&self) -> CameraMode {
        CameraMode::from_locked(self.inner.camera_locked.load(Ordering::SeqCst))
    }

    pub fn set_camera_mode(&self, mode: CameraMode) {
        self.inner
            .camera_locked
            .store(mode.is_locked(), Ordering::SeqCst);
    }

    /// Flips the camera mode and returns the new one.
    pub fn toggle_camera(&self) -> CameraMode {
        let was_locked = self.inner.camera_locked.fetch_xor(true, Ordering::SeqCst);
        CameraMode::from_locked(!was_locked)
    }

    /// Kills the current flight. Once this returns, no further position or
    /// timer callbacks are made for it, including from frames that were
    /// already queued. The engine drops its state at the next call into it.
    pub fn reset(&self) {
        self.inner.live_flight.store(NO_FLIGHT, Ordering::SeqCst);
    }

    pub fn is_live(&self, flight_id: u64) -> bool {
        flight_id != NO_FLIGHT && self.inner.live_flight.load(Ordering::SeqCst) == flight_id
    }

    fn go_live(&self, flight_id: u64) {
        self.inner.live_flight.store(flight_id, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlightPhase {
    Idle,
    Running,
    Completed,
}

impl FlightPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            FlightPhase::Idle => "idle",
            FlightPhase::Running => "running",
            FlightPhase::Completed => "completed",
        }
    }
}

/// Mutable per-flight state, written only by the loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationState {
    pub start_ms: f64,
    pub progress: f64,
    pub current_position: Coordinate,
    /// Last lighting value handed to the observer. A cache for change
    /// detection; the flag itself is always recomputed from the position.
    last_daylight: Option<bool>,
}

#[derive(Debug)]
struct ActiveFlight {
    id: u64,
    plan: FlightPlan,
    animation: AnimationState,
}

#[derive(Debug)]
enum Session {
    Idle,
    Running(ActiveFlight),
    Completed(ActiveFlight),
}

/// What one delivered frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Callbacks ran and another frame was requested.
    Continued,
    /// The flight reached its destination on this tick.
    Arrived,
    /// A reset landed during this tick's callbacks.
    Aborted,
    /// The frame belonged to a flight that is no longer running.
    Stale,
}

/// Read-only view for hosts that poll instead of listening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSnapshot {
    pub phase: FlightPhase,
    pub progress: f64,
    pub position: Option<Coordinate>,
    pub remaining_ms: f64,
    pub camera: CameraMode,
}

pub struct FlightEngine<C: Clock, S: FrameScheduler, O: FlightObserver> {
    clock: C,
    scheduler: S,
    observer: O,
    control: FlightControl,
    session: Session,
    last_flight_id: u64,
}

impl<C: Clock, S: FrameScheduler, O: FlightObserver> FlightEngine<C, S, O> {
    pub fn new(clock: C, scheduler: S, observer: O) -> Self {
        Self::with_camera(clock, scheduler, observer, CameraMode::default())
    }

    pub fn with_camera(clock: C, scheduler: S, observer: O, camera: CameraMode) -> Self {
        Self {
            clock,
            scheduler,
            observer,
            control: FlightControl::new(camera),
            session: Session::Idle,
            last_flight_id: NO_FLIGHT,
        }
    }

    pub fn control(&self) -> FlightControl {
        self.control.clone()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Starts a flight and requests its first frame. Only allowed from
    /// `Idle`. Returns the id carried by this flight's frame requests.
    pub fn launch(&mut self, plan: FlightPlan) -> Result<u64, SimError> {
        self.sync_reset();
        let phase = self.phase();
        if phase != FlightPhase::Idle {
            return Err(SimError::NotIdle(phase.as_str()));
        }

        self.last_flight_id += 1;
        let id = self.last_flight_id;
        let start_ms = self.clock.monotonic_ms();

        info!(
            "Launching flight #{} — {} -> {} distance_km={:.1} heading={:.1} duration={}",
            id,
            plan.origin_label(),
            plan.destination_label(),
            plan.distance_km(),
            plan.heading_deg(),
            format_countdown(plan.duration_ms())
        );

        let animation = AnimationState {
            start_ms,
            progress: 0.0,
            current_position: plan.origin(),
            last_daylight: None,
        };
        self.session = Session::Running(ActiveFlight {
            id,
            plan,
            animation,
        });
        self.control.go_live(id);
        self.scheduler.request_frame(FrameRequest { flight_id: id });
        Ok(id)
    }

    /// Builds the plan and launches it. A degenerate route is rejected
    /// before any animation state exists.
    pub fn launch_route(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
        cruise_speed_kmh: f64,
    ) -> Result<u64, SimError> {
        let plan = FlightPlan::build(origin, destination, cruise_speed_kmh)?;
        self.launch(plan)
    }

    /// Runs one tick for a previously requested frame.
    pub fn on_frame(&mut self, request: FrameRequest) -> TickOutcome {
        // The live flag has to be checked before touching any state: the
        // request may have been queued before a reset.
        self.sync_reset();
        let flight = match &mut self.session {
            Session::Running(flight) if flight.id == request.flight_id => flight,
            _ => {
                debug!("Dropping stale frame for flight #{}", request.flight_id);
                return TickOutcome::Stale;
            }
        };

        let id = flight.id;
        let now = self.clock.monotonic_ms();
        let duration = flight.plan.duration_ms();
        let elapsed = (now - flight.animation.start_ms).max(0.0);
        let raw = if duration > 0.0 { elapsed / duration } else { 1.0 };
        let progress = raw.clamp(0.0, 1.0).max(flight.animation.progress);
        let arrived = progress >= 1.0;

        let position = if arrived {
            flight.plan.destination()
        } else {
            flight.plan.origin().lerp(&flight.plan.destination(), progress)
        };

        let is_day = solar::is_daylight(position.longitude, self.clock.utc_now());
        let lighting_changed = flight.animation.last_daylight != Some(is_day);

        flight.animation.progress = progress;
        flight.animation.current_position = position;
        flight.animation.last_daylight = Some(is_day);

        let remaining = format_countdown(duration - elapsed);
        let destination_label = flight.plan.destination_label().to_string();

        self.observer.on_position_update(position);
        if !self.control.is_live(id) {
            return self.abort_tick(id);
        }

        if lighting_changed {
            self.observer.on_lighting_change(is_day);
            if !self.control.is_live(id) {
                return self.abort_tick(id);
            }
        }

        if self.control.camera_mode().is_locked() {
            self.observer.on_camera_recenter(position);
            if !self.control.is_live(id) {
                return self.abort_tick(id);
            }
        }

        self.observer.on_timer_tick(&remaining);
        if !self.control.is_live(id) {
            return self.abort_tick(id);
        }

        if arrived {
            if let Session::Running(flight) = std::mem::replace(&mut self.session, Session::Idle) {
                self.session = Session::Completed(flight);
            }
            info!("Flight #{} arrived at {}", id, destination_label);
            self.observer.on_arrival(&destination_label);
            return TickOutcome::Arrived;
        }

        self.scheduler.request_frame(FrameRequest { flight_id: id });
        TickOutcome::Continued
    }

    /// Discards the plan and animation state. Safe in any phase and
    /// idempotent.
    pub fn reset(&mut self) {
        self.control.reset();
        self.sync_reset();
    }

    pub fn phase(&self) -> FlightPhase {
        match &self.session {
            Session::Idle => FlightPhase::Idle,
            Session::Running(f) if self.control.is_live(f.id) => FlightPhase::Running,
            Session::Completed(f) if self.control.is_live(f.id) => FlightPhase::Completed,
            _ => FlightPhase::Idle,
        }
    }

    pub fn plan(&self) -> Option<&FlightPlan> {
        self.active().map(|f| &f.plan)
    }

    pub fn animation(&self) -> Option<&AnimationState> {
        self.active().map(|f| &f.animation)
    }

    pub fn snapshot(&self) -> FlightSnapshot {
        let camera = self.control.camera_mode();
        let phase = self.phase();
        match self.active() {
            Some(flight) => {
                let remaining_ms = match phase {
                    FlightPhase::Running => {
                        let elapsed = (self.clock.monotonic_ms() - flight.animation.start_ms).max(0.0);
                        (flight.plan.duration_ms() - elapsed).max(0.0)
                    }
                    _ => 0.0,
                };
                FlightSnapshot {
                    phase,
                    progress: flight.animation.progress,
                    position: Some(flight.animation.current_position),
                    remaining_ms,
                    camera,
                }
            }
            None => FlightSnapshot {
                phase,
                progress: 0.0,
                position: None,
                remaining_ms: 0.0,
                camera,
            },
        }
    }

    fn active(&self) -> Option<&ActiveFlight> {
        match &self.session {
            Session::Running(f) | Session::Completed(f) if self.control.is_live(f.id) => Some(f),
            _ => None,
        }
    }

    /// Drops the session if the control handle no longer points at it.
    fn sync_reset(&mut self) {
        let stale = match &self.session {
            Session::Idle => false,
            Session::Running(f) | Session::Completed(f) => !self.control.is_live(f.id),
        };
        if stale {
            let id = match &self.session {
                Session::Running(f) | Session::Completed(f) => f.id,
                Session::Idle => NO_FLIGHT,
            };
            info!("Flight #{} reset", id);
            self.session = Session::Idle;
        }
    }

    fn abort_tick(&mut self, id: u64) -> TickOutcome {
        debug!("Flight #{} was reset mid-tick; skipping remaining callbacks", id);
        self.sync_reset();
        TickOutcome::Aborted
    }
}
