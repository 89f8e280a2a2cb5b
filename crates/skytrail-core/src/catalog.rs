use crate::error::SimError;
use crate::geodesy::{BoundingBox, Coordinate};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_AIRPORTS_URL: &str =
    "https://raw.githubusercontent.com/mwgg/Airports/master/airports.json";

const MIN_QUERY_LEN: usize = 2;
const MAX_SEARCH_RESULTS: usize = 10;

/// Zoom level from which every airport gets a marker.
const DETAIL_ZOOM: u8 = 6;

/// Airports that stay visible when zoomed out.
const HUB_IATA: [&str; 7] = ["LHR", "JFK", "DEL", "MAA", "BOM", "SIN", "DXB"];

/// One entry of the airports dataset. The file is a JSON object keyed by
/// ICAO code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    #[serde(default)]
    pub icao: String,
    #[serde(default)]
    pub iata: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub elevation: Option<f64>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tz: String,
}

impl Airport {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// `"City (IATA)"`, as shown in the suggestion list.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.city, self.iata)
    }

    fn has_iata(&self) -> bool {
        self.iata.chars().count() == 3
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub iata: String,
    pub position: Coordinate,
    pub radius: u8,
}

/// Airports with a three-letter IATA code, in ICAO key order.
#[derive(Debug, Clone, Default)]
pub struct AirportCatalog {
    airports: Vec<Airport>,
}

impl AirportCatalog {
    pub fn from_airports(airports: impl IntoIterator<Item = Airport>) -> Self {
        Self {
            airports: airports.into_iter().filter(Airport::has_iata).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Airport> =
            serde_json::from_str(json).context("Failed to parse airports dataset")?;
        let total = raw.len();
        let catalog = Self::from_airports(raw.into_values());
        debug!(
            "Parsed airports dataset — entries={} with_iata={}",
            total,
            catalog.len()
        );
        Ok(catalog)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read airports file {}", path.display()))?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "Loaded {} airports from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.iter()
    }

    /// Case-insensitive substring match on city or IATA code. Queries under
    /// two characters match nothing; at most ten results.
    pub fn search(&self, query: &str) -> Vec<&Airport> {
        let q = query.trim().to_lowercase();
        if q.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        self.airports
            .iter()
            .filter(|a| a.city.to_lowercase().contains(&q) || a.iata.to_lowercase().contains(&q))
            .take(MAX_SEARCH_RESULTS)
            .collect()
    }

    pub fn find_iata(&self, code: &str) -> Option<&Airport> {
        let code = code.trim();
        self.airports
            .iter()
            .find(|a| a.iata.eq_ignore_ascii_case(code))
    }

    pub fn require_iata(&self, code: &str) -> Result<&Airport, SimError> {
        self.find_iata(code)
            .ok_or_else(|| SimError::AirportNotFound(code.to_string()))
    }

    /// Markers to draw for the current viewport. Below detail zoom only the
    /// hub airports are drawn, and smaller.
    pub fn markers_in_view(&self, view: &BoundingBox, zoom: u8) -> Vec<MapMarker> {
        let detailed = zoom >= DETAIL_ZOOM;
        let radius = if detailed { 4 } else { 2 };
        self.airports
            .iter()
            .filter(|a| detailed || HUB_IATA.contains(&a.iata.as_str()))
            .filter(|a| view.contains(a.coordinate()))
            .map(|a| MapMarker {
                iata: a.iata.clone(),
                position: a.coordinate(),
                radius,
            })
            .collect()
    }
}

/// Downloads the airports dataset and keeps a local copy, refetching once
/// the copy is older than the TTL.
pub struct AirportSource {
    url: String,
    cache_path: PathBuf,
    ttl: Duration,
}

impl AirportSource {
    pub fn new(url: impl Into<String>, cache_path: PathBuf, ttl: Duration) -> Self {
        Self {
            url: url.into(),
            cache_path,
            ttl,
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn is_cache_fresh(&self) -> bool {
        fs::metadata(&self.cache_path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .map(|age| age < self.ttl)
            .unwrap_or(false)
    }

    /// Fetches the dataset if the cache is expired or missing.
    pub fn refresh(&self) -> Result<()> {
        if self.is_cache_fresh() {
            debug!(
                "Using cached airports dataset — cache_path={}",
                self.cache_path.display()
            );
            return Ok(());
        }

        info!(
            "Airports cache expired or missing; fetching — cache_path={} url={}",
            self.cache_path.display(),
            self.url
        );
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let body = client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .text()
            .context("Failed to read airports response body")?;

        // Refuse to overwrite a good cache with something unparseable.
        AirportCatalog::from_json_str(&body)?;

        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent).context("Failed to create cache directory")?;
        }
        fs::write(&self.cache_path, &body).context("Failed to write airports cache")?;
        info!(
            "Airports cache updated — cache_path={} bytes={}",
            self.cache_path.display(),
            body.len()
        );
        Ok(())
    }

    /// Refreshes if needed and loads the cached copy. A failed download
    /// falls back to a stale cache when one exists.
    pub fn load(&self) -> Result<AirportCatalog> {
        if let Err(e) = self.refresh() {
            if self.cache_path.exists() {
                warn!("Airports refresh failed, using stale cache: {:#}", e);
            } else {
                return Err(e.context("No airports dataset available"));
            }
        }
        AirportCatalog::load_file(&self.cache_path)
    }
}
