// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use skytrail_core::catalog::{Airport, AirportCatalog};
use skytrail_core::clock::SystemClock;
use skytrail_core::config::{ConfigManager, SimConfig};
use skytrail_core::engine::{FlightControl, FlightEngine, TickOutcome};
use skytrail_core::observer::FlightObserver;
use skytrail_core::scheduler::ManualScheduler;
use skytrail_core::seating::{SeatCell, SeatId, SeatMap, ROWS};
use skytrail_core::selection::{RouteSelection, Slot};
use skytrail_core::{CameraMode, Coordinate, SimError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Local airports dataset (JSON keyed by ICAO)
    #[arg(short, long, global = true, env = "SKYTRAIL_AIRPORTS")]
    airports: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search airports by city or IATA code
    Search { query: String },
    /// Show distance, heading and flight time between two airports
    Preview {
        from: String,
        to: String,
        #[arg(long, env = "SKYTRAIL_SPEED")]
        speed: Option<f64>,
    },
    /// Print a seat map
    Seats {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Board and watch a flight. Type `c` + Enter to toggle the camera,
    /// `q` + Enter to abort.
    Fly {
        from: String,
        to: String,
        /// Seat such as 12B; defaults to the first free seat
        #[arg(long)]
        seat: Option<String>,
        #[arg(long, env = "SKYTRAIL_SPEED")]
        speed: Option<f64>,
        /// Fast-forward factor, e.g. 600 turns ten minutes into one second
        #[arg(long, env = "SKYTRAIL_TIME_SCALE")]
        time_scale: Option<f64>,
        /// Start with the camera unlocked
        #[arg(long)]
        free_camera: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    Path,
    /// Write the current (or default) settings to disk
    Init,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let manager = ConfigManager::new();
    let mut config = manager.load()?;
    if cli.airports.is_some() {
        config.airports_path = cli.airports.clone();
    }

    match cli.command {
        Commands::Search { query } => {
            let catalog = load_catalog(&config, &manager)?;
            let matches = catalog.search(&query);
            if matches.is_empty() {
                println!("No airports matching '{}'", query);
            }
            for airport in matches {
                println!("{:<28} {}", airport.display_label(), airport.name);
            }
        }
        Commands::Preview { from, to, speed } => {
            let catalog = load_catalog(&config, &manager)?;
            let selection = select_route(&catalog, &from, &to)?;
            let speed = speed.unwrap_or(config.cruise_speed_kmh);
            let plan = selection.build_plan(speed)?;
            let preview = plan.preview();
            println!(
                "{}  {:.0} km  heading {:.0}°  {} at {:.0} km/h",
                selection.route_label().unwrap_or_default(),
                preview.distance_km,
                preview.heading_deg,
                preview.duration,
                speed
            );
        }
        Commands::Seats { seed } => {
            let seats = generate_seats(seed);
            print_seat_map(&seats);
        }
        Commands::Fly {
            from,
            to,
            seat,
            speed,
            time_scale,
            free_camera,
            seed,
        } => {
            if let Some(speed) = speed {
                config.cruise_speed_kmh = speed;
            }
            if let Some(scale) = time_scale {
                config.time_scale = scale;
            }
            if free_camera {
                config.camera_locked = false;
            }
            config.validate()?;

            let catalog = load_catalog(&config, &manager)?;
            let selection = select_route(&catalog, &from, &to)?;
            let preview = selection.preview(config.cruise_speed_kmh)?;
            println!(
                "{}  {:.0} km  flight time {}",
                selection.route_label().unwrap_or_default(),
                preview.distance_km,
                preview.duration
            );

            let mut seats = generate_seats(seed);
            let seat_id = match seat {
                Some(label) => label.parse::<SeatId>()?,
                None => seats.first_available().ok_or(SimError::NoSeatSelected)?,
            };
            seats.select(seat_id)?;
            seats.confirm()?;
            if let Some(label) = seats.selected_label() {
                println!("{}", label);
            }

            fly(&config, &selection)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", config.to_pretty_json()?);
            }
            ConfigAction::Path => {
                println!("{}", manager.path().display());
            }
            ConfigAction::Init => {
                manager.save(&config)?;
                println!("Wrote {}", manager.path().display());
            }
        },
    }

    Ok(())
}

fn load_catalog(config: &SimConfig, manager: &ConfigManager) -> Result<AirportCatalog> {
    let catalog = config.load_catalog(&manager.dir())?;
    if catalog.is_empty() {
        anyhow::bail!("Airports dataset is empty");
    }
    Ok(catalog)
}

/// Exact IATA code first, then the first search hit.
fn resolve_airport<'a>(catalog: &'a AirportCatalog, query: &str) -> Result<&'a Airport, SimError> {
    if let Some(airport) = catalog.find_iata(query) {
        return Ok(airport);
    }
    catalog
        .search(query)
        .into_iter()
        .next()
        .ok_or_else(|| SimError::AirportNotFound(query.to_string()))
}

fn select_route(catalog: &AirportCatalog, from: &str, to: &str) -> Result<RouteSelection> {
    let mut selection = RouteSelection::new();
    selection.pick(Slot::From, resolve_airport(catalog, from)?.clone());
    selection.pick(Slot::To, resolve_airport(catalog, to)?.clone());
    Ok(selection)
}

fn generate_seats(seed: Option<u64>) -> SeatMap {
    match seed {
        Some(seed) => SeatMap::generate(&mut StdRng::seed_from_u64(seed)),
        None => SeatMap::generate(&mut rand::thread_rng()),
    }
}

fn print_seat_map(seats: &SeatMap) {
    for row in 1..=ROWS {
        let cells: String = seats
            .row_layout(row)
            .into_iter()
            .map(|cell| match cell {
                SeatCell::Aisle => "  ",
                SeatCell::Seat { selected: true, .. } => "[*]",
                SeatCell::Seat { taken: true, .. } => "[x]",
                SeatCell::Seat { .. } => "[ ]",
            })
            .collect();
        println!("{:>2} {}", row, cells);
    }
    println!("{} seats free", seats.available());
}

/// Renders engine callbacks as a single refreshing status line.
struct TerminalObserver {
    route: String,
    position: Coordinate,
    is_day: bool,
    camera: Option<Coordinate>,
    last_timer: String,
}

impl TerminalObserver {
    fn new(route: String, origin: Coordinate) -> Self {
        Self {
            route,
            position: origin,
            is_day: true,
            camera: None,
            last_timer: String::new(),
        }
    }

    fn redraw(&self) {
        let camera = match self.camera {
            Some(c) => format!("camera {:.2},{:.2}", c.latitude, c.longitude),
            None => "camera free".to_string(),
        };
        print!(
            "\r{}  {:>7.2},{:>8.2}  {:<5}  {}  {}   ",
            self.route,
            self.position.latitude,
            self.position.longitude,
            if self.is_day { "day" } else { "night" },
            self.last_timer,
            camera
        );
        let _ = io::stdout().flush();
    }
}

impl FlightObserver for TerminalObserver {
    fn on_position_update(&mut self, position: Coordinate) {
        self.position = position;
        self.camera = None;
    }

    fn on_lighting_change(&mut self, is_day: bool) {
        self.is_day = is_day;
        debug!("Lighting changed — day={}", is_day);
    }

    fn on_camera_recenter(&mut self, center: Coordinate) {
        self.camera = Some(center);
    }

    fn on_timer_tick(&mut self, remaining: &str) {
        if remaining != self.last_timer {
            self.last_timer = remaining.to_string();
            self.redraw();
        }
    }

    fn on_arrival(&mut self, destination_label: &str) {
        self.redraw();
        println!();
        println!("Touchdown in {}!", destination_label);
    }
}

/// Reads `c` / `q` lines from stdin for the lifetime of the process.
fn spawn_input_thread(control: FlightControl) -> Result<()> {
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match line.trim() {
                    "c" | "C" => {
                        let mode = control.toggle_camera();
                        info!("{}", mode);
                    }
                    "q" | "Q" => {
                        control.reset();
                        break;
                    }
                    _ => {}
                }
            }
        })
        .context("Failed to start input thread")?;
    Ok(())
}

fn fly(config: &SimConfig, selection: &RouteSelection) -> Result<()> {
    let plan = selection.build_plan(config.cruise_speed_kmh)?;
    let observer = TerminalObserver::new(selection.route_label().unwrap_or_default(), plan.origin());
    let clock = SystemClock::scaled(config.time_scale);
    let camera = CameraMode::from_locked(config.camera_locked);
    let mut engine = FlightEngine::with_camera(clock, ManualScheduler::new(), observer, camera);

    spawn_input_thread(engine.control())?;
    println!("{}  (c: toggle camera, q: abort)", camera);
    engine.launch(plan)?;

    let interval = config.frame_interval();
    while let Some(request) = engine.scheduler_mut().next() {
        match engine.on_frame(request) {
            TickOutcome::Continued => thread::sleep(interval),
            TickOutcome::Arrived => break,
            TickOutcome::Aborted | TickOutcome::Stale => {
                println!();
                println!("Flight aborted.");
                break;
            }
        }
    }
    debug!("Flight loop finished in phase {}", engine.phase().as_str());
    Ok(())
}
