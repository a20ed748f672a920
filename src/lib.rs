//! Pedestrian routing and live navigation for park-like facilities.
//!
//! Routes come from an external walking-directions service when it is
//! reachable, otherwise from the facility's own path network, otherwise a
//! straight line. While walking, each GPS sample is turned into a
//! [`ProgressSnapshot`](progress::ProgressSnapshot).

pub mod android_jni;
pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod graph;
pub mod instructions;
pub mod internal;
pub mod osrm;
pub mod progress;
pub mod resolve;
pub mod route;
pub mod tour;

pub use config::{EngineConfig, Profile};
pub use error::{RoutingError, RoutingResult};
pub use geo::Coordinate;
pub use graph::{RoadEdge, RoadNode};
pub use progress::{track_progress, ProgressSnapshot};
pub use resolve::{resolve_route, RouteEngine, RouteRequests};
pub use route::{NormalizedRoute, RouteSource, RouteStep};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
