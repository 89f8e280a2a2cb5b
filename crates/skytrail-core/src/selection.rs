use crate::catalog::Airport;
use crate::error::SimError;
use crate::plan::{FlightPlan, RoutePreview};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    From,
    To,
}

/// Origin/destination picker fed by the search box and by map clicks.
#[derive(Debug, Clone, Default)]
pub struct RouteSelection {
    from: Option<Airport>,
    to: Option<Airport>,
}

impl RouteSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Option<&Airport> {
        self.from.as_ref()
    }

    pub fn destination(&self) -> Option<&Airport> {
        self.to.as_ref()
    }

    /// A pick from the suggestion list always overwrites its slot.
    pub fn pick(&mut self, slot: Slot, airport: Airport) {
        match slot {
            Slot::From => self.from = Some(airport),
            Slot::To => self.to = Some(airport),
        }
    }

    /// First click sets the origin, the second sets the destination unless
    /// it is the origin again. Clicks after that are ignored. Returns the
    /// slot that was filled, if any.
    pub fn click(&mut self, airport: &Airport) -> Option<Slot> {
        if self.from.is_none() {
            self.from = Some(airport.clone());
            return Some(Slot::From);
        }
        let is_origin = self.from.as_ref().is_some_and(|f| f.iata == airport.iata);
        if self.to.is_none() && !is_origin {
            self.to = Some(airport.clone());
            return Some(Slot::To);
        }
        None
    }

    pub fn is_ready(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    pub fn clear(&mut self) {
        self.from = None;
        self.to = None;
    }

    /// `"LHR → JFK"`.
    pub fn route_label(&self) -> Option<String> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Some(format!("{} → {}", from.iata, to.iata)),
            _ => None,
        }
    }

    /// Builds a plan labelled with the endpoint cities.
    pub fn build_plan(&self, cruise_speed_kmh: f64) -> Result<FlightPlan, SimError> {
        let (from, to) = match (&self.from, &self.to) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(SimError::IncompleteSelection),
        };
        let plan = FlightPlan::build(from.coordinate(), to.coordinate(), cruise_speed_kmh)?;
        Ok(plan.with_labels(from.city.clone(), to.city.clone()))
    }

    pub fn preview(&self, cruise_speed_kmh: f64) -> Result<RoutePreview, SimError> {
        Ok(self.build_plan(cruise_speed_kmh)?.preview())
    }
}
