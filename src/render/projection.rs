use std::f64::consts::PI;

use crate::domain::types::Coordinate;

/// Sphere radius used by Web Mercator (EPSG:3857).
pub const MERCATOR_RADIUS_M: f64 = 6_378_137.0;
/// Latitude where the Web Mercator square ends.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;
/// Width of the whole Web Mercator plane in metres.
pub const WORLD_SIZE_M: f64 = 2.0 * PI * MERCATOR_RADIUS_M;

/// Smallest extent shown, so a single stop still gets some surroundings.
const MIN_SPAN_M: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    pub x: f64,
    pub y: f64,
}

pub fn to_web_mercator(c: Coordinate) -> Mercator {
    let lat = c.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    Mercator {
        x: MERCATOR_RADIUS_M * c.lon.to_radians(),
        y: MERCATOR_RADIUS_M * (PI / 4.0 + lat / 2.0).tan().ln(),
    }
}

/// Maps Web Mercator metres to SVG pixels (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    /// Pixels per metre.
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Fits the points into a `width` x `height` canvas with `padding` pixels on
    /// every side, keeping the aspect ratio and centring the data.
    pub fn fit(points: &[Mercator], width: f64, height: f64, padding: f64) -> Viewport {
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        if points.is_empty() {
            (min_x, max_x, min_y, max_y) = (0.0, 0.0, 0.0, 0.0);
        }

        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;
        let span_x = (max_x - min_x).max(MIN_SPAN_M);
        let span_y = (max_y - min_y).max(MIN_SPAN_M);

        let inner_w = (width - 2.0 * padding).max(1.0);
        let inner_h = (height - 2.0 * padding).max(1.0);
        let scale = (inner_w / span_x).min(inner_h / span_y);

        Viewport {
            origin_x: center_x - width / 2.0 / scale,
            origin_y: center_y + height / 2.0 / scale,
            scale,
            width,
            height,
        }
    }

    pub fn to_pixel(&self, m: Mercator) -> (f64, f64) {
        (
            (m.x - self.origin_x) * self.scale,
            (self.origin_y - m.y) * self.scale,
        )
    }

    /// Mercator extent covered by the canvas: (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.origin_x,
            self.origin_y - self.height / self.scale,
            self.origin_x + self.width / self.scale,
            self.origin_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_zero() {
        let m = to_web_mercator(Coordinate::new(0.0, 0.0));
        assert!(m.x.abs() < 1e-9 && m.y.abs() < 1e-9);
    }

    #[test]
    fn antimeridian_is_half_the_world() {
        let m = to_web_mercator(Coordinate::new(0.0, 180.0));
        assert!((m.x - WORLD_SIZE_M / 2.0).abs() < 1e-6);
    }

    #[test]
    fn poles_are_clamped() {
        let m = to_web_mercator(Coordinate::new(90.0, 0.0));
        assert!(m.y.is_finite());
        assert!((m.y - WORLD_SIZE_M / 2.0).abs() < 1.0);
    }

    #[test]
    fn fitted_points_stay_inside_padding() {
        let points: Vec<Mercator> = [(1.29, 103.80), (1.35, 103.95), (1.31, 103.70)]
            .into_iter()
            .map(|(lat, lon)| to_web_mercator(Coordinate::new(lat, lon)))
            .collect();
        let vp = Viewport::fit(&points, 800.0, 600.0, 40.0);
        for p in &points {
            let (x, y) = vp.to_pixel(*p);
            assert!((40.0 - 1e-6..=760.0 + 1e-6).contains(&x), "x = {x}");
            assert!((40.0 - 1e-6..=560.0 + 1e-6).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn north_is_up() {
        let south = to_web_mercator(Coordinate::new(1.0, 103.0));
        let north = to_web_mercator(Coordinate::new(2.0, 103.0));
        let vp = Viewport::fit(&[south, north], 500.0, 500.0, 10.0);
        assert!(vp.to_pixel(north).1 < vp.to_pixel(south).1);
    }

    #[test]
    fn single_point_is_centred() {
        let p = to_web_mercator(Coordinate::new(1.3, 103.8));
        let vp = Viewport::fit(&[p], 400.0, 200.0, 20.0);
        let (x, y) = vp.to_pixel(p);
        assert!((x - 200.0).abs() < 1e-6 && (y - 100.0).abs() < 1e-6);
    }
}
