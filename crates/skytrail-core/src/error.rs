use crate::geodesy::Coordinate;
use thiserror::Error;

/// Which end of a route a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEnd {
    Origin,
    Destination,
}

impl std::fmt::Display for RouteEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteEnd::Origin => write!(f, "origin"),
            RouteEnd::Destination => write!(f, "destination"),
        }
    }
}

/// Raised synchronously while building a flight plan. The animation loop
/// never produces one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidRouteError {
    #[error("origin and destination are the same point ({0})")]
    SameEndpoints(Coordinate),
    #[error("{end} coordinate is out of range: {coordinate}")]
    OutOfRange {
        end: RouteEnd,
        coordinate: Coordinate,
    },
    #[error("cruise speed must be a positive number of km/h, got {0}")]
    InvalidCruiseSpeed(f64),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid route: {0}")]
    InvalidRoute(#[from] InvalidRouteError),
    #[error("A flight is already {0}; reset before launching another")]
    NotIdle(&'static str),
    #[error("Airport not found: {0}")]
    AirportNotFound(String),
    #[error("Both origin and destination must be selected")]
    IncompleteSelection,
    #[error("Seat {0} is not available")]
    SeatUnavailable(String),
    #[error("No seat selected")]
    NoSeatSelected,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
