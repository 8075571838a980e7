use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::domain::types::{Coordinate, Node, TimeWindow};
use crate::error::InputError;

const LOCATION: &str = "location";
const LAT: &str = "lat";
const LON: &str = "lon";
const TW_START: &str = "tw_start";
const TW_END: &str = "tw_end";

/// Column positions resolved from the header row.
struct Columns {
    location: Option<usize>,
    lat: Option<usize>,
    lon: Option<usize>,
    tw_start: Option<usize>,
    tw_end: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        Columns {
            location: find(LOCATION),
            lat: find(LAT),
            lon: find(LON),
            tw_start: find(TW_START),
            tw_end: find(TW_END),
        }
    }
}

/// Reads the node table (`location, lat, lon, tw_start, tw_end`) from a CSV file.
pub fn load_nodes(path: &Path) -> Result<Vec<Node>, InputError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let nodes = read_nodes(file)?;
    info!("Loaded {} nodes from {}", nodes.len(), path.display());
    Ok(nodes)
}

/// Reads the node table from any reader. Rows are validated eagerly so that no
/// malformed value reaches the distance computation.
pub fn read_nodes<R: Read>(reader: R) -> Result<Vec<Node>, InputError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?);
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let node = parse_row(&record, &columns, row)?;
        if !seen.insert(node.name.clone()) {
            return Err(InputError::DuplicateName {
                row,
                name: node.name,
            });
        }
        debug!("Row {}: {:?}", row, node);
        nodes.push(node);
    }

    if nodes.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(nodes)
}

fn parse_row(record: &StringRecord, columns: &Columns, row: usize) -> Result<Node, InputError> {
    let name = field(record, columns.location, LOCATION, row)?.to_string();
    let lat = parse_degrees(record, columns.lat, LAT, row, 90.0)?;
    let lon = parse_degrees(record, columns.lon, LON, row, 180.0)?;
    let start = parse_minutes(record, columns.tw_start, TW_START, row)?;
    let end = parse_minutes(record, columns.tw_end, TW_END, row)?;

    let time_window = TimeWindow::new(start, end);
    if !time_window.is_well_formed() {
        return Err(InputError::InvertedTimeWindow { row, start, end });
    }

    Ok(Node {
        name,
        coordinate: Coordinate::new(lat, lon),
        time_window,
    })
}

fn field<'r>(
    record: &'r StringRecord,
    column: Option<usize>,
    name: &'static str,
    row: usize,
) -> Result<&'r str, InputError> {
    column
        .and_then(|c| record.get(c))
        .filter(|v| !v.is_empty())
        .ok_or(InputError::MissingField { row, column: name })
}

fn parse_degrees(
    record: &StringRecord,
    column: Option<usize>,
    name: &'static str,
    row: usize,
    limit: f64,
) -> Result<f64, InputError> {
    let raw = field(record, column, name, row)?;
    let value: f64 = raw.parse().map_err(|_| InputError::InvalidField {
        row,
        column: name,
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(InputError::InvalidField {
            row,
            column: name,
            value: raw.to_string(),
        });
    }
    if !(-limit..=limit).contains(&value) {
        return Err(InputError::OutOfRange {
            row,
            column: name,
            value,
            min: -limit,
            max: limit,
        });
    }
    Ok(value)
}

/// Whole minutes; spreadsheets often export them as `30.0`, which is accepted
/// as long as there is no fractional part.
fn parse_minutes(
    record: &StringRecord,
    column: Option<usize>,
    name: &'static str,
    row: usize,
) -> Result<i64, InputError> {
    let raw = field(record, column, name, row)?;
    let invalid = || InputError::InvalidField {
        row,
        column: name,
        value: raw.to_string(),
    };

    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    let v: f64 = raw.parse().map_err(|_| invalid())?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Ok(v as i64)
    } else {
        Err(invalid())
    }
}
