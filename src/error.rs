//! Routing error type.
//!
//! None of these escape the route orchestrator or the progress tracker;
//! they exist so the individual components can report why they gave up
//! and the caller can log it before falling back.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("no road nodes available")]
    NoNodes,

    #[error("node {0} not found in graph")]
    UnknownNode(String),

    #[error("no path from {from} to {to}")]
    NoPath { from: String, to: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("route provider returned status {0}")]
    ProviderStatus(String),

    #[error("route provider returned no routes")]
    EmptyRoute,

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("tour import error: {0}")]
    Tour(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
