// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Coarse day/night heuristic.
//!
//! Every 15 degrees of longitude is treated as one hour of solar time and
//! daylight is the fixed window 06:00-18:00 local. Season, latitude and
//! refraction are ignored, so polar summers and winters come out wrong.

use chrono::{DateTime, Timelike, Utc};

const DEGREES_PER_HOUR: f64 = 15.0;
const DAYLIGHT_START_HOUR: f64 = 6.0;
const DAYLIGHT_END_HOUR: f64 = 18.0;

/// Local solar hour in [0, 24) for a longitude. Only the whole UTC hour is
/// used; minutes and seconds are dropped.
pub fn local_solar_hour(longitude: f64, utc_now: DateTime<Utc>) -> f64 {
    let utc_hours = utc_now.hour() as f64;
    (utc_hours + longitude / DEGREES_PER_HOUR + 24.0).rem_euclid(24.0)
}

/// True when the local solar hour lies in the inclusive range [6, 18].
pub fn is_daylight(longitude: f64, utc_now: DateTime<Utc>) -> bool {
    let local = local_solar_hour(longitude, utc_now);
    (DAYLIGHT_START_HOUR..=DAYLIGHT_END_HOUR).contains(&local)
}
