pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const NEARBY_RADIUS_KM: f64 = 5.0;

pub const DEFAULT_FALLBACK_LANGUAGE: &str = "es_ES";
/// Probe order used once neither the requested nor the fallback language has content.
pub const LANGUAGE_PRIORITY: [&str; 4] = ["es_ES", "en_US", "ca_ES", "fr_FR"];

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const MAX_PAGE_LIMIT: usize = 50;

pub const MINUTES_PER_HOUR: u16 = 60;
pub const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;
