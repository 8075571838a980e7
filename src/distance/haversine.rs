use crate::config::constant::EARTH_RADIUS_KM;
use crate::domain::types::Coordinate;

/// Great-circle distance in kilometres on a sphere of radius 6371 km.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Minutes needed to cover `distance_km` at a constant `speed_kmh`, rounded to
/// the nearest minute with ties going to the even minute.
pub fn travel_minutes(distance_km: f64, speed_kmh: f64) -> i64 {
    (distance_km / speed_kmh * 60.0).round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = Coordinate::new(1.3521, 103.8198);
        assert_eq!(haversine_km(p, p), 0.0);
        assert_eq!(travel_minutes(haversine_km(p, p), 30.0), 0);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
        assert_eq!(travel_minutes(d, 30.0), 222);
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let d = haversine_km(Coordinate::new(90.0, 0.0), Coordinate::new(-90.0, 0.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6, "got {d}");
        assert!((d - 20015.0).abs() < 1.0);
    }

    #[test]
    fn half_minutes_round_to_even() {
        // 0.25 km and 0.75 km at 30 km/h are exactly 0.5 and 1.5 minutes.
        assert_eq!(travel_minutes(0.25, 30.0), 0);
        assert_eq!(travel_minutes(0.75, 30.0), 2);
        assert_eq!(travel_minutes(1.25, 30.0), 2);
        assert_eq!(travel_minutes(0.26, 30.0), 1);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(1.2966, 103.7764);
        let b = Coordinate::new(1.3644, 103.9915);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }
}
