use csv::Writer;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::domain::types::{Coordinate, Node, TimeWindow};

/// Centre of the generated service area (central Singapore).
const CENTRE: Coordinate = Coordinate {
    lat: 1.3000,
    lon: 103.8000,
};
/// Half-width of the square customers are scattered in, in degrees.
const SPREAD_DEG: f64 = 0.05;

/// Generates a depot plus `customers` random customers around the centre, with
/// windows of 20 to 60 minutes inside `[0, horizon]`. The same seed always
/// gives the same table.
pub fn generate_random_nodes(customers: usize, horizon: i64, seed: u64) -> Vec<Node> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut nodes = Vec::with_capacity(customers + 1);
    nodes.push(Node {
        name: "Depot".to_string(),
        coordinate: CENTRE,
        time_window: TimeWindow::new(0, horizon),
    });

    for i in 1..=customers {
        let coordinate = Coordinate::new(
            CENTRE.lat + rng.gen_range(-SPREAD_DEG..=SPREAD_DEG),
            CENTRE.lon + rng.gen_range(-SPREAD_DEG..=SPREAD_DEG),
        );
        let width = rng.gen_range(20..=60).min(horizon);
        let start = rng.gen_range(0..=horizon - width);
        nodes.push(Node {
            name: format!("C{i}"),
            coordinate,
            time_window: TimeWindow::new(start, start + width),
        });
    }

    info!("Generated {} random nodes (seed {})", nodes.len(), seed);
    nodes
}

/// Writes nodes back out in the CSV layout the loader reads.
pub fn to_csv(nodes: &[Node]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(["location", "lat", "lon", "tw_start", "tw_end"])?;
    for n in nodes {
        wtr.write_record([
            n.name.clone(),
            n.coordinate.lat.to_string(),
            n.coordinate.lon.to_string(),
            n.time_window.start.to_string(),
            n.time_window.end.to_string(),
        ])?;
    }
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}
