use crate::constants::EARTH_RADIUS_KM;

/// Great-circle distance in kilometres between two `(latitude, longitude)`
/// points given in degrees, using the haversine formula.
pub fn calculate_distance(point1: (f64, f64), point2: (f64, f64)) -> f64 {
    let lat1 = point1.0.to_radians();
    let lat2 = point2.0.to_radians();
    let d_lat = (point2.0 - point1.0).to_radians();
    let d_lon = (point2.1 - point1.1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Rounds to one decimal place, the precision ratings and distances are shown with.
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Human readable distance: metres below one kilometre, otherwise kilometres
/// with one decimal.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km * 1000.0).round() as u64)
    } else {
        format!("{:.1} km", distance_km)
    }
}
