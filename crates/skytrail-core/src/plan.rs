use crate::error::{InvalidRouteError, RouteEnd};
use crate::geodesy::{self, BoundingBox, Coordinate};
use serde::Serialize;

pub const DEFAULT_CRUISE_SPEED_KMH: f64 = 850.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// The plane glyph is drawn pointing north-east, so the marker is rotated
/// by this much less than the heading.
const MARKER_GLYPH_OFFSET_DEG: f64 = 45.0;

/// An immutable description of one flight. Changing either endpoint means
/// building a new plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPlan {
    origin: Coordinate,
    destination: Coordinate,
    distance_km: f64,
    heading_deg: f64,
    duration_ms: f64,
    cruise_speed_kmh: f64,
    origin_label: String,
    destination_label: String,
}

impl FlightPlan {
    pub fn build(
        origin: Coordinate,
        destination: Coordinate,
        cruise_speed_kmh: f64,
    ) -> Result<Self, InvalidRouteError> {
        if !origin.is_valid() {
            return Err(InvalidRouteError::OutOfRange {
                end: RouteEnd::Origin,
                coordinate: origin,
            });
        }
        if !destination.is_valid() {
            return Err(InvalidRouteError::OutOfRange {
                end: RouteEnd::Destination,
                coordinate: destination,
            });
        }
        if origin == destination {
            return Err(InvalidRouteError::SameEndpoints(origin));
        }
        if !cruise_speed_kmh.is_finite() || cruise_speed_kmh <= 0.0 {
            return Err(InvalidRouteError::InvalidCruiseSpeed(cruise_speed_kmh));
        }

        let distance_km = geodesy::distance_km(origin, destination);
        let heading_deg = geodesy::bearing_deg(origin, destination);
        let duration_ms = distance_km / cruise_speed_kmh * MS_PER_HOUR;

        Ok(Self {
            origin,
            destination,
            distance_km,
            heading_deg,
            duration_ms,
            cruise_speed_kmh,
            origin_label: origin.to_string(),
            destination_label: destination.to_string(),
        })
    }

    /// Same as [`FlightPlan::build`] at [`DEFAULT_CRUISE_SPEED_KMH`].
    pub fn build_default(
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Self, InvalidRouteError> {
        Self::build(origin, destination, DEFAULT_CRUISE_SPEED_KMH)
    }

    /// Attaches human-readable endpoint names. The destination label is what
    /// the arrival notification carries.
    pub fn with_labels(mut self, origin: impl Into<String>, destination: impl Into<String>) -> Self {
        self.origin_label = origin.into();
        self.destination_label = destination.into();
        self
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn cruise_speed_kmh(&self) -> f64 {
        self.cruise_speed_kmh
    }

    pub fn origin_label(&self) -> &str {
        &self.origin_label
    }

    pub fn destination_label(&self) -> &str {
        &self.destination_label
    }

    pub fn marker_rotation_deg(&self) -> f64 {
        geodesy::normalize_deg(self.heading_deg - MARKER_GLYPH_OFFSET_DEG)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::around(self.origin, self.destination)
    }

    pub fn preview(&self) -> RoutePreview {
        RoutePreview::from_plan(self)
    }

    #[cfg(test)]
    pub(crate) fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// What the route panel shows before boarding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePreview {
    pub distance_km: f64,
    pub heading_deg: f64,
    pub total_seconds: u64,
    pub duration: String,
}

impl RoutePreview {
    fn from_plan(plan: &FlightPlan) -> Self {
        let total_seconds = (plan.duration_ms / 1000.0).floor() as u64;
        Self {
            distance_km: plan.distance_km,
            heading_deg: plan.heading_deg,
            total_seconds,
            duration: format_hms(total_seconds),
        }
    }
}

/// Formats a millisecond count as `HH:MM:SS`, truncating to the whole second.
/// Negative and NaN inputs read as zero.
pub fn format_countdown(remaining_ms: f64) -> String {
    let secs = if remaining_ms.is_finite() && remaining_ms > 0.0 {
        (remaining_ms / 1000.0).floor() as u64
    } else {
        0
    };
    format_hms(secs)
}

pub fn format_hms(total_seconds: u64) -> String {
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}
