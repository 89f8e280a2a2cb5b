#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use skytrail_core::catalog::AirportCatalog;
    use skytrail_core::clock::ManualClock;
    use skytrail_core::config::{ConfigManager, SimConfig};
    use skytrail_core::engine::{FlightEngine, FlightPhase};
    use skytrail_core::observer::RecordingObserver;
    use skytrail_core::scheduler::ManualScheduler;
    use skytrail_core::seating::SeatMap;
    use skytrail_core::selection::{RouteSelection, Slot};
    use std::fs;

    const DATASET: &str = r#"{
        "EGLL": {"icao":"EGLL","iata":"LHR","name":"London Heathrow Airport","city":"London","state":"England","country":"GB","elevation":83,"lat":51.4700,"lon":-0.4543,"tz":"Europe/London"},
        "KJFK": {"icao":"KJFK","iata":"JFK","name":"John F Kennedy International Airport","city":"New York","state":"New-York","country":"US","elevation":13,"lat":40.6413,"lon":-73.7781,"tz":"America/New_York"},
        "VIDP": {"icao":"VIDP","iata":"DEL","name":"Indira Gandhi International Airport","city":"New Delhi","state":"Delhi","country":"IN","elevation":777,"lat":28.5665,"lon":77.1031,"tz":"Asia/Kolkata"},
        "XXXX": {"icao":"XXXX","iata":"0","name":"Private Strip","city":"Nowhere","state":"","country":"US","elevation":0,"lat":10.0,"lon":10.0,"tz":""}
    }"#;

    #[test]
    fn test_search_select_seat_and_fly() {
        let dir = tempfile::tempdir().unwrap();
        let airports_path = dir.path().join("airports.json");
        fs::write(&airports_path, DATASET).unwrap();

        // Config points at the local dataset, so no download is attempted
        let manager = ConfigManager::at(dir.path().join("config.json"));
        let config = SimConfig {
            airports_path: Some(airports_path),
            ..SimConfig::default()
        };
        manager.save(&config).unwrap();
        let config = manager.load().unwrap();
        let catalog = config.load_catalog(&manager.dir()).unwrap();
        assert_eq!(catalog.len(), 3);

        let mut selection = RouteSelection::new();
        let from = catalog.search("lon")[0].clone();
        selection.pick(Slot::From, from);
        let new_matches = catalog.search("new");
        assert_eq!(new_matches.len(), 2);
        let to = catalog.require_iata("jfk").unwrap().clone();
        selection.pick(Slot::To, to);
        assert_eq!(selection.route_label().unwrap(), "LHR → JFK");

        let preview = selection.preview(config.cruise_speed_kmh).unwrap();
        assert_eq!(preview.duration, "06:31:03");

        let mut seats = SeatMap::generate(&mut StdRng::seed_from_u64(3));
        let seat = seats.first_available().unwrap();
        seats.select(seat).unwrap();
        assert!(seats.confirm().is_ok());

        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap());
        let mut engine = FlightEngine::new(clock.clone(), ManualScheduler::new(), RecordingObserver::new());
        engine
            .launch(selection.build_plan(config.cruise_speed_kmh).unwrap())
            .unwrap();
        while let Some(request) = engine.scheduler_mut().next() {
            engine.on_frame(request);
            clock.advance_ms(900_000.0);
        }
        assert_eq!(engine.phase(), FlightPhase::Completed);
        assert_eq!(engine.observer().arrivals(), vec!["New York"]);
    }

    #[test]
    fn test_map_clicks_build_route() {
        let catalog = AirportCatalog::from_json_str(DATASET).unwrap();
        let mut selection = RouteSelection::new();
        let del = catalog.find_iata("DEL").unwrap();
        let lhr = catalog.find_iata("LHR").unwrap();

        selection.click(del);
        selection.click(del);
        assert!(!selection.is_ready());
        selection.click(lhr);
        assert!(selection.is_ready());

        let plan = selection.build_plan(850.0).unwrap();
        assert_eq!(plan.origin_label(), "New Delhi");
        assert_eq!(plan.destination_label(), "London");
        // Delhi to London heads north-west
        assert!(plan.heading_deg() > 270.0 && plan.heading_deg() < 360.0);
    }
}
