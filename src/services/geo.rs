/// Stored coordinates are fixed-point: decimal degrees times 10^7.
pub const FIXED_POINT_SCALE: f64 = 10_000_000.0;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub fn to_fixed(degrees: f64) -> i64 {
    (degrees * FIXED_POINT_SCALE).round() as i64
}

pub fn to_decimal(fixed: i64) -> f64 {
    fixed as f64 / FIXED_POINT_SCALE
}

/// Great-circle distance in meters, spherical law of cosines. The clamp
/// keeps `acos` defined when rounding pushes the cosine just past ±1.
pub fn great_circle_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let cos_angle = phi1.cos() * phi2.cos() * delta_lambda.cos() + phi1.sin() * phi2.sin();
    EARTH_RADIUS_METERS * cos_angle.clamp(-1.0, 1.0).acos()
}

/// Degree-space box around a center point, sized so that every point within
/// `radius_m` of the center falls inside it. Used as a coarse SQL prefilter
/// before the exact distance test; 110 km per degree of latitude keeps the
/// box circumscribing the circle.
pub fn radius_bounding_box(lat: f64, lon: f64, radius_m: f64) -> (f64, f64, f64, f64) {
    const METERS_PER_DEGREE: f64 = 110_000.0;

    let lat_delta = radius_m / METERS_PER_DEGREE;
    let cos_lat = lat.to_radians().cos().abs().max(1e-6);
    let lon_delta = (radius_m / (METERS_PER_DEGREE * cos_lat)).min(180.0);

    (
        (lat - lat_delta).max(-90.0),
        (lat + lat_delta).min(90.0),
        (lon - lon_delta).max(-180.0),
        (lon + lon_delta).min(180.0),
    )
}
