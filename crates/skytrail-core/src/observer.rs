use crate::geodesy::Coordinate;

/// Side effects of the animation loop. Per tick they are called in the
/// order position, lighting, camera, timer; arrival comes once at the end.
/// Every method defaults to doing nothing so hosts implement only what they
/// render.
pub trait FlightObserver {
    /// Move the plane marker.
    fn on_position_update(&mut self, _position: Coordinate) {}

    /// Only called when day/night flips, plus once on the first tick.
    fn on_lighting_change(&mut self, _is_day: bool) {}

    /// Jump the viewport to `center` without changing zoom or animating.
    /// Never called while the camera is free.
    fn on_camera_recenter(&mut self, _center: Coordinate) {}

    /// Remaining flight time as `HH:MM:SS`.
    fn on_timer_tick(&mut self, _remaining: &str) {}

    fn on_arrival(&mut self, _destination_label: &str) {}
}

impl<T: FlightObserver + ?Sized> FlightObserver for Box<T> {
    fn on_position_update(&mut self, position: Coordinate) {
        (**self).on_position_update(position)
    }

    fn on_lighting_change(&mut self, is_day: bool) {
        (**self).on_lighting_change(is_day)
    }

    fn on_camera_recenter(&mut self, center: Coordinate) {
        (**self).on_camera_recenter(center)
    }

    fn on_timer_tick(&mut self, remaining: &str) {
        (**self).on_timer_tick(remaining)
    }

    fn on_arrival(&mut self, destination_label: &str) {
        (**self).on_arrival(destination_label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlightEvent {
    Position(Coordinate),
    Lighting(bool),
    CameraRecenter(Coordinate),
    Timer(String),
    Arrival(String),
}

/// Keeps every callback in order, for tests and for hosts that render after
/// the fact.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub events: Vec<FlightEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> Vec<Coordinate> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FlightEvent::Position(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn timers(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FlightEvent::Timer(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn lighting(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FlightEvent::Lighting(day) => Some(*day),
                _ => None,
            })
            .collect()
    }

    pub fn recenters(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, FlightEvent::CameraRecenter(_)))
            .count()
    }

    pub fn arrivals(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FlightEvent::Arrival(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FlightObserver for RecordingObserver {
    fn on_position_update(&mut self, position: Coordinate) {
        self.events.push(FlightEvent::Position(position));
    }

    fn on_lighting_change(&mut self, is_day: bool) {
        self.events.push(FlightEvent::Lighting(is_day));
    }

    fn on_camera_recenter(&mut self, center: Coordinate) {
        self.events.push(FlightEvent::CameraRecenter(center));
    }

    fn on_timer_tick(&mut self, remaining: &str) {
        self.events.push(FlightEvent::Timer(remaining.to_string()));
    }

    fn on_arrival(&mut self, destination_label: &str) {
        self.events.push(FlightEvent::Arrival(destination_label.to_string()));
    }
}
