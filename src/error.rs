use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode routes as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidVar {
        key: String,
        value: String,
        reason: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read node table: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: missing value for column `{column}`")]
    MissingField { row: usize, column: &'static str },
    #[error("row {row}: invalid value {value:?} for column `{column}`")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: {column} {value} is outside [{min}, {max}]")]
    OutOfRange {
        row: usize,
        column: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("row {row}: time window start {start} is after end {end}")]
    InvertedTimeWindow { row: usize, start: i64, end: i64 },
    #[error("row {row}: duplicate location name {name:?}")]
    DuplicateName { row: usize, name: String },
    #[error("node table is empty")]
    Empty,
}

#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("node {index} has an invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { index: usize, lat: f64, lon: f64 },
    #[error("travel speed must be a positive number of km/h, got {0}")]
    InvalidSpeed(f64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("at least one vehicle is required")]
    NoVehicles,
    #[error("depot index {depot} is out of range for {nodes} nodes")]
    DepotOutOfRange { depot: usize, nodes: usize },
    #[error("expected {expected} time windows, got {actual}")]
    WindowCountMismatch { expected: usize, actual: usize },
    #[error("node {node} has an inverted time window [{start}, {end}]")]
    InvertedTimeWindow { node: usize, start: i64, end: i64 },
    #[error("{name} must not be negative, got {value}")]
    NegativeLimit { name: &'static str, value: i64 },
    #[error("solver returned a broken route for vehicle {vehicle} at index {index}")]
    BrokenAssignment { vehicle: usize, index: usize },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("vehicle {vehicle}: stop {name:?} is not in the node table")]
    UnknownStop { vehicle: usize, name: String },
    #[error("nothing to draw: the node table is empty")]
    NoNodes,
    #[error("failed to read routes file {path}: {source}")]
    RoutesIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse routes file {path}: {source}")]
    RoutesJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to draw map: {0}")]
    Draw(String),
    #[error("failed to fetch basemap tile {url}: {source}")]
    Tile {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write image {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
