// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod camera;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod geodesy;
pub mod observer;
pub mod plan;
pub mod scheduler;
pub mod seating;
pub mod selection;
pub mod solar;

pub use camera::CameraMode;
pub use engine::{FlightControl, FlightEngine, FlightPhase, TickOutcome};
pub use error::{InvalidRouteError, SimError};
pub use geodesy::Coordinate;
pub use observer::FlightObserver;
pub use plan::FlightPlan;
