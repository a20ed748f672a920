//! Distance and bearing computations.
//!
//! All coordinates use WGS84 (lat/lon in degrees).

use serde::{Deserialize, Serialize};

use crate::instructions::Language;

/// A geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push h slightly above 1 for antipodal points
    2.0 * EARTH_RADIUS_M * h.min(1.0).sqrt().asin()
}

/// Initial great-circle bearing from `from` to `to` in degrees [0, 360).
/// 0 is north, increasing clockwise.
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Total length of a polyline in meters.
pub fn polyline_length(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|w| distance(w[0], w[1]))
        .sum()
}

fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if d >= 360.0 { 0.0 } else { d }
}

/// One of the eight compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompassPoint {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassPoint {
    const ALL: [CompassPoint; 8] = [
        CompassPoint::North,
        CompassPoint::NorthEast,
        CompassPoint::East,
        CompassPoint::SouthEast,
        CompassPoint::South,
        CompassPoint::SouthWest,
        CompassPoint::West,
        CompassPoint::NorthWest,
    ];

    /// Bucket a bearing into the nearest 45 degree sector.
    /// Any finite bearing is accepted, including negative and > 360.
    pub fn from_bearing(bearing: f64) -> Self {
        let sector = (normalize_degrees(bearing) / 45.0).round() as usize % 8;
        Self::ALL[sector]
    }

    pub fn label(self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                CompassPoint::North => "north",
                CompassPoint::NorthEast => "northeast",
                CompassPoint::East => "east",
                CompassPoint::SouthEast => "southeast",
                CompassPoint::South => "south",
                CompassPoint::SouthWest => "southwest",
                CompassPoint::West => "west",
                CompassPoint::NorthWest => "northwest",
            },
            Language::De => match self {
                CompassPoint::North => "Norden",
                CompassPoint::NorthEast => "Nordosten",
                CompassPoint::East => "Osten",
                CompassPoint::SouthEast => "Südosten",
                CompassPoint::South => "Süden",
                CompassPoint::SouthWest => "Südwesten",
                CompassPoint::West => "Westen",
                CompassPoint::NorthWest => "Nordwesten",
            },
        }
    }
}
