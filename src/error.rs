use thiserror::Error;

/// Request-time failures of the routing engine.
///
/// An unreachable destination is not an error; it comes back as an empty route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("unknown location: {0}")]
    UnknownLocation(String),
}

/// Problems found while loading or validating a network configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("location {0} is defined more than once")]
    DuplicateLocation(String),

    #[error("location {0} has a non-finite coordinate")]
    InvalidCoordinate(String),

    #[error("{context} references unknown location {name}")]
    UnknownLocation { context: &'static str, name: String },

    #[error("road geometry {from} -> {to} needs at least 2 points, got {points}")]
    DegenerateGeometry {
        from: String,
        to: String,
        points: usize,
    },

    #[error("road geometry {from} -> {to} does not end at {location} ({offset_km:.3} km off)")]
    GeometryEndpointMismatch {
        from: String,
        to: String,
        location: String,
        offset_km: f64,
    },

    #[error("congestion spot {name} has severity {severity}, expected 0..=1")]
    InvalidSeverity { name: String, severity: f64 },

    #[error("invalid congestion parameter {0}")]
    InvalidParam(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
