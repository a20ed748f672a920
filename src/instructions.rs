//! Turn-by-turn instruction text.
//!
//! Three kinds of routes need instructions: provider routes carry maneuver
//! metadata per step, graph routes and imported tours only have a list of
//! waypoints, and straight-line routes have nothing but the two endpoints.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::geo::{bearing, CompassPoint, Coordinate};
use crate::route::RouteStep;

/// Instruction language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

/// Turn direction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    Straight,
    SlightLeft,
    Left,
    SharpLeft,
    SlightRight,
    Right,
    SharpRight,
    UTurn,
}

impl Turn {
    /// Parse an OSRM maneuver modifier ("slight left", "uturn", ...).
    pub fn from_modifier(modifier: &str) -> Option<Turn> {
        match modifier {
            "straight" => Some(Turn::Straight),
            "slight left" => Some(Turn::SlightLeft),
            "left" => Some(Turn::Left),
            "sharp left" => Some(Turn::SharpLeft),
            "slight right" => Some(Turn::SlightRight),
            "right" => Some(Turn::Right),
            "sharp right" => Some(Turn::SharpRight),
            "uturn" => Some(Turn::UTurn),
            _ => None,
        }
    }
}

/// The parts of a provider step that drive its sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Maneuver<'a> {
    /// OSRM maneuver type: "depart", "turn", "roundabout", ...
    pub kind: &'a str,
    pub modifier: Option<&'a str>,
    pub bearing_after: Option<f64>,
    pub exit: Option<u32>,
    /// Street or path name, if the provider has one.
    pub street: Option<&'a str>,
}

/// Sentence for one provider maneuver.
pub fn maneuver_instruction(m: &Maneuver<'_>, language: Language) -> String {
    let street = m.street.map(str::trim).filter(|s| !s.is_empty());

    match m.kind {
        "depart" => {
            let head = match m.bearing_after {
                Some(b) => {
                    let dir = CompassPoint::from_bearing(b).label(language);
                    match language {
                        Language::En => format!("Head {dir}"),
                        Language::De => format!("Richtung {dir} gehen"),
                    }
                }
                None => match language {
                    Language::En => "Start walking".to_string(),
                    Language::De => "Losgehen".to_string(),
                },
            };
            with_street(head, street, "on", "auf", language)
        }
        "arrive" => arrival_text(language).to_string(),
        "turn" | "fork" | "end of road" => {
            let turn = m.modifier.and_then(Turn::from_modifier).unwrap_or(Turn::Straight);
            with_street(turn_text(turn, language).to_string(), street, "onto", "auf", language)
        }
        "continue" | "new name" => {
            with_street(turn_text(Turn::Straight, language).to_string(), street, "on", "auf", language)
        }
        "roundabout" | "rotary" => match (m.exit, language) {
            (Some(n), Language::En) => format!("At the roundabout, take exit {n}"),
            (Some(n), Language::De) => format!("Im Kreisverkehr die {n}. Ausfahrt nehmen"),
            (None, Language::En) => "Go through the roundabout".to_string(),
            (None, Language::De) => "Den Kreisverkehr durchqueren".to_string(),
        },
        _ => {
            let follow = match language {
                Language::En => "Follow the path",
                Language::De => "Dem Weg folgen",
            };
            with_street(follow.to_string(), street, "along", "entlang", language)
        }
    }
}

fn with_street(head: String, street: Option<&str>, en: &str, de: &str, language: Language) -> String {
    match street {
        Some(name) => match language {
            Language::En => format!("{head} {en} {name}"),
            Language::De => format!("{head} {de} {name}"),
        },
        None => head,
    }
}

fn turn_text(turn: Turn, language: Language) -> &'static str {
    match language {
        Language::En => match turn {
            Turn::Straight => "Continue straight",
            Turn::SlightLeft => "Keep slightly left",
            Turn::Left => "Turn left",
            Turn::SharpLeft => "Turn sharp left",
            Turn::SlightRight => "Keep slightly right",
            Turn::Right => "Turn right",
            Turn::SharpRight => "Turn sharp right",
            Turn::UTurn => "Make a U-turn",
        },
        Language::De => match turn {
            Turn::Straight => "Geradeaus weitergehen",
            Turn::SlightLeft => "Leicht links halten",
            Turn::Left => "Links abbiegen",
            Turn::SharpLeft => "Scharf links abbiegen",
            Turn::SlightRight => "Leicht rechts halten",
            Turn::Right => "Rechts abbiegen",
            Turn::SharpRight => "Scharf rechts abbiegen",
            Turn::UTurn => "Wenden",
        },
    }
}

fn arrival_text(language: Language) -> &'static str {
    match language {
        Language::En => "Arrive at your destination",
        Language::De => "Sie haben Ihr Ziel erreicht",
    }
}

/// One step per waypoint, for graph routes and imported tours.
///
/// `legs_m[i]` is the distance walked to reach waypoint `i`. Unnamed
/// waypoints are called "point N" (1-based). The last waypoint gets the
/// arrival wording.
pub fn waypoint_steps(names: &[Option<&str>], legs_m: &[f64], config: &EngineConfig) -> Vec<RouteStep> {
    let language = config.language;
    let last = names.len().saturating_sub(1);

    names
        .iter()
        .zip(legs_m)
        .enumerate()
        .map(|(i, (name, &leg))| {
            let label = match name.map(str::trim).filter(|s| !s.is_empty()) {
                Some(n) => n.to_string(),
                None => match language {
                    Language::En => format!("point {}", i + 1),
                    Language::De => format!("Punkt {}", i + 1),
                },
            };
            let instruction = match (i == last, language) {
                (false, Language::En) => format!("Head to {label}"),
                (false, Language::De) => format!("Weiter zu {label}"),
                (true, Language::En) => format!("Arrive at {label}"),
                (true, Language::De) => format!("Ankunft: {label}"),
            };
            RouteStep {
                instruction,
                distance_m: leg,
                duration_s: config.walking_duration_s(leg),
            }
        })
        .collect()
}

/// Two-step script for a straight-line route: a compass heading, then
/// arrival.
pub fn straight_line_steps(start: Coordinate, end: Coordinate, distance_m: f64, config: &EngineConfig) -> Vec<RouteStep> {
    let language = config.language;
    let dir = CompassPoint::from_bearing(bearing(start, end)).label(language);
    let dist = format_distance(distance_m);

    let heading = match language {
        Language::En => format!("Walk {dist} {dir} toward your destination"),
        Language::De => format!("{dist} Richtung {dir} zum Ziel gehen"),
    };

    vec![
        RouteStep {
            instruction: heading,
            distance_m,
            duration_s: config.walking_duration_s(distance_m),
        },
        RouteStep {
            instruction: arrival_text(language).to_string(),
            distance_m: 0.0,
            duration_s: 0.0,
        },
    ]
}

/// Human-readable distance, rounded to 10 m below 1 km.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", (meters / 10.0).round() as i64 * 10)
    }
}
