//! Edge cost model: driving speed and travel time per road segment.
//!
//! Speeds come from the `maxspeed` tag when it can be read, otherwise from a
//! per-class default. Road tags are noisy, so unreadable values never fail a
//! query; they only fall back to the default.

use crate::{Meters, Seconds, model::RoadEdge, model::RoadNetwork, model::TagValue};

/// Speed assumed for unknown or untagged road classes, km/h
pub const FALLBACK_SPEED_KMH: f64 = 40.0;

const KMH_PER_MPH: f64 = 1.60934;

/// Default speeds per `highway` class, km/h
pub const DEFAULT_SPEEDS_KMH: [(&str, f64); 9] = [
    ("motorway", 100.0),
    ("trunk", 80.0),
    ("primary", 60.0),
    ("secondary", 50.0),
    ("tertiary", 40.0),
    ("unclassified", 35.0),
    ("residential", 30.0),
    ("living_street", 15.0),
    ("service", 20.0),
];

/// Default speed for a road class, [`FALLBACK_SPEED_KMH`] if unknown
pub fn default_speed_kmh(class: Option<&str>) -> f64 {
    class
        .and_then(|class| {
            DEFAULT_SPEEDS_KMH
                .iter()
                .find(|(name, _)| *name == class)
                .map(|&(_, speed)| speed)
        })
        .unwrap_or(FALLBACK_SPEED_KMH)
}

/// Reads a `maxspeed` value as km/h.
///
/// Handles `"50"`, `"30 mph"` and values with stray units (`"50 km/h"`).
/// Returns `None` when nothing numeric can be recovered.
pub fn parse_maxspeed_kmh(raw: &str) -> Option<f64> {
    let value = raw.trim().to_lowercase();

    if let Some((number, _)) = value.split_once("mph") {
        return number
            .trim()
            .parse::<f64>()
            .ok()
            .map(|mph| mph * KMH_PER_MPH);
    }

    let digits: String = value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    digits.parse::<f64>().ok()
}

/// Driving speed of an edge in km/h, always positive
pub fn edge_speed_kmh(edge: &RoadEdge) -> f64 {
    edge.maxspeed
        .as_ref()
        .and_then(TagValue::first)
        .and_then(parse_maxspeed_kmh)
        .filter(|speed| speed.is_finite() && *speed > 0.0)
        .unwrap_or_else(|| default_speed_kmh(edge.highway_class()))
}

/// Time to drive a segment of `length` meters at `speed_kmh`, zero for a non-positive speed
pub fn travel_time(length: Meters, speed_kmh: f64) -> Seconds {
    let speed_mps = speed_kmh * 1000.0 / 3600.0;
    if speed_mps > 0.0 {
        length.max(0.0) / speed_mps
    } else {
        0.0
    }
}

/// Travel time of an edge in seconds
pub fn travel_time_seconds(edge: &RoadEdge) -> Seconds {
    travel_time(edge.length, edge_speed_kmh(edge))
}

/// Annotates every edge of `network` with its travel time
pub fn apply_travel_times(network: &mut RoadNetwork) {
    for edge in network.graph.edge_weights_mut() {
        edge.travel_time = Some(travel_time_seconds(edge));
    }
    log::debug!("Derived travel times for {} edges", network.edge_count());
}

/// Highest edge speed in the network, km/h.
///
/// Keeps the time-mode A* heuristic admissible.
pub fn max_speed_kmh(network: &RoadNetwork) -> f64 {
    network
        .edges()
        .map(edge_speed_kmh)
        .fold(FALLBACK_SPEED_KMH, f64::max)
}
