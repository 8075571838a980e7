use std::str::FromStr;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use super::projection::{Viewport, WORLD_SIZE_M};
use crate::error::RenderError;

const TILE_URL: &str = "https://a.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png";
pub const ATTRIBUTION: &str = "\u{a9} OpenStreetMap contributors \u{a9} CARTO";
const TILE_PIXELS: f64 = 256.0;
const MAX_ZOOM: u32 = 19;
const MAX_TILES: usize = 64;

/// How the map background is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasemapMode {
    None,
    /// Tiles referenced by URL; the viewer fetches them.
    #[default]
    Linked,
    /// Tiles downloaded now and inlined, so the file is self-contained.
    Embedded,
}

impl FromStr for BasemapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(BasemapMode::None),
            "linked" => Ok(BasemapMode::Linked),
            "embedded" => Ok(BasemapMode::Embedded),
            other => Err(format!("unknown basemap mode `{other}`")),
        }
    }
}

/// One raster tile placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    pub z: u32,
    pub x: u32,
    pub y: u32,
    pub px: f64,
    pub py: f64,
    pub size: f64,
}

impl PlacedTile {
    pub fn url(&self) -> String {
        TILE_URL
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// Zoom level whose tiles come closest to their native 256 px at this scale.
pub fn zoom_for(viewport: &Viewport) -> u32 {
    let z = (WORLD_SIZE_M * viewport.scale / TILE_PIXELS).log2().round();
    z.clamp(0.0, MAX_ZOOM as f64) as u32
}

/// Tiles covering the canvas, lowering the zoom until at most `MAX_TILES` remain.
pub fn tiles_for(viewport: &Viewport) -> Vec<PlacedTile> {
    let mut z = zoom_for(viewport);
    loop {
        let tiles = tiles_at_zoom(viewport, z);
        if tiles.len() <= MAX_TILES || z == 0 {
            debug!("Basemap zoom {} with {} tiles", z, tiles.len());
            return tiles;
        }
        z -= 1;
    }
}

fn tiles_at_zoom(viewport: &Viewport, z: u32) -> Vec<PlacedTile> {
    let n = 1u32 << z;
    let tile_m = WORLD_SIZE_M / n as f64;
    let half = WORLD_SIZE_M / 2.0;
    let (min_x, min_y, max_x, max_y) = viewport.bounds();

    let index = |v: f64| (v / tile_m).floor().clamp(0.0, (n - 1) as f64) as u32;
    let (x0, x1) = (index(min_x + half), index(max_x + half));
    let (y0, y1) = (index(half - max_y), index(half - min_y));

    let mut tiles = Vec::new();
    for y in y0..=y1 {
        for x in x0..=x1 {
            let corner_x = -half + x as f64 * tile_m;
            let corner_y = half - y as f64 * tile_m;
            tiles.push(PlacedTile {
                z,
                x,
                y,
                px: (corner_x - viewport.origin_x) * viewport.scale,
                py: (viewport.origin_y - corner_y) * viewport.scale,
                size: tile_m * viewport.scale,
            });
        }
    }
    tiles
}

/// Downloads a tile and returns it as a `data:` URI.
pub fn fetch_tile(client: &Client, tile: &PlacedTile) -> Result<String, RenderError> {
    let url = tile.url();
    let bytes = client
        .get(&url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|source| RenderError::Tile {
            url: url.clone(),
            source,
        })?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&bytes)))
}

/// Image sources for each tile according to `mode`. Tiles that fail to
/// download are left out.
pub fn tile_sources(viewport: &Viewport, mode: BasemapMode) -> Vec<(PlacedTile, String)> {
    match mode {
        BasemapMode::None => Vec::new(),
        BasemapMode::Linked => tiles_for(viewport)
            .into_iter()
            .map(|t| {
                let url = t.url();
                (t, url)
            })
            .collect(),
        BasemapMode::Embedded => {
            let client = match Client::builder()
                .user_agent(concat!("vrptw/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(30))
                .build()
            {
                Ok(client) => client,
                Err(e) => {
                    warn!("Could not create HTTP client for basemap: {}", e);
                    return Vec::new();
                }
            };

            let tiles = tiles_for(viewport);
            info!("Downloading {} basemap tiles", tiles.len());
            tiles
                .into_iter()
                .filter_map(|t| match fetch_tile(&client, &t) {
                    Ok(src) => Some((t, src)),
                    Err(e) => {
                        warn!("{}", e);
                        None
                    }
                })
                .collect()
        }
    }
}

/// Splices the tiles in as `<image>` elements right after the background
/// fill, below every drawn layer. The SVG backend only embeds decoded
/// bitmaps, which cannot express `linked` tiles.
pub fn underlay(svg: &mut String, tiles: &[(PlacedTile, String)]) {
    if tiles.is_empty() {
        return;
    }
    let Some(at) = svg.find("/>") else {
        warn!("No background found, basemap skipped");
        return;
    };

    let images: String = tiles
        .iter()
        .map(|(tile, href)| {
            // Half a pixel of overlap hides seams between neighbouring tiles.
            format!(
                "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" href=\"{}\" preserveAspectRatio=\"none\"/>\n",
                tile.px,
                tile.py,
                tile.size + 0.5,
                tile.size + 0.5,
                href
            )
        })
        .collect();
    svg.insert_str(at + 2, &format!("\n<g id=\"basemap\">\n{images}</g>"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinate;
    use crate::render::projection::to_web_mercator;

    fn viewport() -> Viewport {
        let points: Vec<_> = [(1.28, 103.78), (1.36, 103.92)]
            .into_iter()
            .map(|(lat, lon)| to_web_mercator(Coordinate::new(lat, lon)))
            .collect();
        Viewport::fit(&points, 1000.0, 1000.0, 50.0)
    }

    #[test]
    fn tiles_cover_the_canvas() {
        let vp = viewport();
        let tiles = tiles_for(&vp);
        assert!(!tiles.is_empty() && tiles.len() <= MAX_TILES);
        let left = tiles.iter().map(|t| t.px).fold(f64::INFINITY, f64::min);
        let top = tiles.iter().map(|t| t.py).fold(f64::INFINITY, f64::min);
        let right = tiles.iter().map(|t| t.px + t.size).fold(f64::NEG_INFINITY, f64::max);
        let bottom = tiles.iter().map(|t| t.py + t.size).fold(f64::NEG_INFINITY, f64::max);
        assert!(left <= 0.0 && top <= 0.0);
        assert!(right >= 1000.0 && bottom >= 1000.0);
    }

    #[test]
    fn tile_size_is_near_native() {
        let vp = viewport();
        let z = zoom_for(&vp);
        let tiles = tiles_at_zoom(&vp, z);
        let size = tiles[0].size;
        assert!(size > TILE_PIXELS / 1.5 && size < TILE_PIXELS * 1.5, "size {size}");
    }

    #[test]
    fn url_is_filled_in() {
        let tile = PlacedTile {
            z: 12,
            x: 3229,
            y: 2019,
            px: 0.0,
            py: 0.0,
            size: 256.0,
        };
        assert_eq!(
            tile.url(),
            "https://a.basemaps.cartocdn.com/light_all/12/3229/2019.png"
        );
    }

    #[test]
    fn no_basemap_means_no_tiles() {
        assert!(tile_sources(&viewport(), BasemapMode::None).is_empty());
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Embedded".parse::<BasemapMode>(), Ok(BasemapMode::Embedded));
        assert!("satellite".parse::<BasemapMode>().is_err());
    }

    #[test]
    fn underlay_goes_after_the_background() {
        let mut svg = String::from(
            "<svg width=\"10\" height=\"10\">\n<rect fill=\"#F2EFE9\"/>\n<circle r=\"5\"/>\n</svg>\n",
        );
        let tile = PlacedTile {
            z: 1,
            x: 0,
            y: 1,
            px: -3.0,
            py: 4.0,
            size: 256.0,
        };
        let url = tile.url();
        underlay(&mut svg, &[(tile, url)]);

        let image = svg.find("<image").unwrap();
        assert!(svg.find("<rect").unwrap() < image);
        assert!(image < svg.find("<circle").unwrap());
        assert!(svg.contains("href=\"https://a.basemaps.cartocdn.com/light_all/1/0/1.png\""));
        assert!(svg.contains("x=\"-3.00\" y=\"4.00\" width=\"256.50\""));
    }

    #[test]
    fn no_tiles_leaves_the_image_alone() {
        let mut svg = String::from("<svg><rect/></svg>");
        underlay(&mut svg, &[]);
        assert_eq!(svg, "<svg><rect/></svg>");
    }
}
