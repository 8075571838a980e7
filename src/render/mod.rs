//! Draws vehicle routes over a map as an SVG image.

pub mod basemap;
pub mod drawing;
pub mod projection;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use plotters::prelude::{IntoDrawingArea, SVGBackend};
use tracing::{info, span, Level};

use crate::config::constant::PLOT_TITLE;
use crate::domain::solution::{parse_routes_document, RouteMap};
use crate::domain::types::Node;
use crate::error::RenderError;
pub use basemap::BasemapMode;
use drawing::MapLayers;
use projection::{to_web_mercator, Viewport};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub padding: f64,
    pub basemap: BasemapMode,
    pub title: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 1000,
            height: 1000,
            padding: 60.0,
            basemap: BasemapMode::default(),
            title: PLOT_TITLE.to_string(),
        }
    }
}

/// Resolves every stop name of every route to its node. Fails on the first
/// name missing from the node table.
fn resolve_routes<'a>(
    nodes: &'a [Node],
    routes: &RouteMap,
) -> Result<Vec<(usize, Vec<&'a Node>)>, RenderError> {
    let by_name: HashMap<&str, &Node> = nodes.iter().map(|n| (n.name.as_str(), n)).collect();
    routes
        .iter()
        .map(|(&vehicle, names)| {
            let stops = names
                .iter()
                .map(|name| {
                    by_name
                        .get(name.as_str())
                        .copied()
                        .ok_or_else(|| RenderError::UnknownStop {
                            vehicle,
                            name: name.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((vehicle, stops))
        })
        .collect()
}

/// Builds the SVG for `routes` drawn over `nodes`.
pub fn render_routes(
    nodes: &[Node],
    routes: &RouteMap,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    if nodes.is_empty() {
        return Err(RenderError::NoNodes);
    }
    let resolved = resolve_routes(nodes, routes)?;

    let render_span = span!(Level::INFO, "render");
    let _guard = render_span.enter();

    let points: Vec<_> = nodes.iter().map(|n| to_web_mercator(n.coordinate)).collect();
    let viewport = Viewport::fit(
        &points,
        options.width as f64,
        options.height as f64,
        options.padding,
    );

    let layers = MapLayers {
        viewport: &viewport,
        title: &options.title,
        routes: resolved
            .iter()
            .map(|(vehicle, stops)| {
                let line = stops.iter().map(|n| to_web_mercator(n.coordinate)).collect();
                (*vehicle, line)
            })
            .collect(),
        nodes: nodes.iter().map(|n| n.name.as_str()).zip(points).collect(),
        attribution: options.basemap != BasemapMode::None,
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        drawing::draw_map(&root, &layers).map_err(|e| RenderError::Draw(e.to_string()))?;
    }
    basemap::underlay(&mut svg, &basemap::tile_sources(&viewport, options.basemap));

    info!(
        "Rendered {} routes over {} nodes",
        resolved.len(),
        nodes.len()
    );
    Ok(svg)
}

/// Renders and writes the image to `path`.
pub fn render_to_file(
    nodes: &[Node],
    routes: &RouteMap,
    options: &RenderOptions,
    path: &Path,
) -> Result<(), RenderError> {
    let svg = render_routes(nodes, routes, options)?;
    fs::write(path, svg).map_err(|source| RenderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("Map written to {}", path.display());
    Ok(())
}

/// Reads a routes file: either a saved solver result or a plain
/// `{"vehicle": ["stop", ...]}` object.
pub fn load_route_map(path: &Path) -> Result<RouteMap, RenderError> {
    let content = fs::read_to_string(path).map_err(|source| RenderError::RoutesIo {
        path: path.display().to_string(),
        source,
    })?;
    parse_routes_document(&content).map_err(|source| RenderError::RoutesJson {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::types::{Coordinate, TimeWindow};

    fn nodes() -> Vec<Node> {
        [
            ("Depot", 1.300, 103.800),
            ("C1", 1.320, 103.850),
            ("C2", 1.280, 103.860),
            ("C3 & Sons", 1.350, 103.780),
        ]
        .into_iter()
        .map(|(name, lat, lon)| Node {
            name: name.to_string(),
            coordinate: Coordinate::new(lat, lon),
            time_window: TimeWindow::new(0, 120),
        })
        .collect()
    }

    fn options() -> RenderOptions {
        RenderOptions {
            basemap: BasemapMode::None,
            ..RenderOptions::default()
        }
    }

    fn routes(entries: &[(usize, &[&str])]) -> RouteMap {
        RouteMap(
            entries
                .iter()
                .map(|(v, names)| (*v, names.iter().map(|s| s.to_string()).collect()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn draws_every_route_and_node() {
        let map = routes(&[
            (0, &["Depot", "C1", "C2", "Depot"][..]),
            (1, &["Depot", "C3 & Sons", "Depot"][..]),
        ]);
        let svg = render_routes(&nodes(), &map, &options()).unwrap();
        assert!(svg.contains("<svg") && svg.trim_end().ends_with("</svg>"));
        // One line per route, one arrowhead per leg and one legend swatch per vehicle.
        assert_eq!(svg.matches("<polyline").count(), 2 + 5 + 2);
        assert_eq!(svg.matches("<circle").count(), 4);
        assert!(svg.contains("Vehicle 0") && svg.contains("Vehicle 1"));
        assert!(svg.contains("C3 &amp; Sons"));
        assert!(svg.contains(PLOT_TITLE));
        assert!(!svg.contains("<image"));
        assert!(!svg.contains("OpenStreetMap"));
    }

    #[test]
    fn nodes_without_routes_still_draw() {
        let svg = render_routes(&nodes(), &RouteMap::default(), &options()).unwrap();
        assert_eq!(svg.matches("<circle").count(), 4);
        assert_eq!(svg.matches("<polyline").count(), 0);
        assert!(!svg.contains("Vehicle 0"));
    }

    #[test]
    fn unknown_stop_is_an_error() {
        let map = routes(&[(3, &["Depot", "Nowhere", "Depot"][..])]);
        match render_routes(&nodes(), &map, &options()) {
            Err(RenderError::UnknownStop { vehicle, name }) => {
                assert_eq!(vehicle, 3);
                assert_eq!(name, "Nowhere");
            }
            other => panic!("expected UnknownStop, got {other:?}"),
        }
    }

    #[test]
    fn empty_node_table_is_an_error() {
        let map = RouteMap::default();
        assert!(matches!(
            render_routes(&[], &map, &options()),
            Err(RenderError::NoNodes)
        ));
    }

    #[test]
    fn linked_basemap_references_tiles() {
        let opts = RenderOptions {
            basemap: BasemapMode::Linked,
            ..RenderOptions::default()
        };
        let svg = render_routes(&nodes(), &RouteMap::default(), &opts).unwrap();
        assert!(svg.contains("basemaps.cartocdn.com"));
        assert!(svg.contains("OpenStreetMap"));
        // Tiles sit under the node markers.
        assert!(svg.find("<image").unwrap() < svg.find("<circle").unwrap());
    }
}
