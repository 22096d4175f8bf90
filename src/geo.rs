//! Clinic proximity helpers.
//!
//! Straight-line distance via the Haversine great-circle formula, plus the
//! locator-view helpers: pairing clinics with their distance from an origin
//! and filtering by search text.

use crate::core::Clinic;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A clinic paired with its distance from a query origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicDistance {
    /// The clinic.
    pub clinic: Clinic,
    /// Distance from the origin in kilometers, rounded to one decimal.
    pub distance_km: f64,
}

/// Computes the great-circle distance between two coordinates in km.
///
/// The result is rounded to one decimal place.
///
/// # Examples
///
/// ```
/// let d = clinic_store::geo::haversine_km(37.7749, -122.4194, 37.7831, -122.4075);
/// assert!((d - 1.4).abs() < 0.5);
/// ```
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    let distance = EARTH_RADIUS_KM * c;
    (distance * 10.0).round() / 10.0
}

/// Pairs clinics with their distance from an origin, sorted nearest-first.
///
/// Clinics without coordinates are omitted.
#[must_use]
pub fn sort_by_distance(clinics: &[Clinic], lat: f64, lon: f64) -> Vec<ClinicDistance> {
    let mut out: Vec<ClinicDistance> = clinics
        .iter()
        .filter_map(|clinic| {
            clinic.coordinates().map(|(c_lat, c_lon)| ClinicDistance {
                clinic: clinic.clone(),
                distance_km: haversine_km(lat, lon, c_lat, c_lon),
            })
        })
        .collect();
    out.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    out
}

/// Filters clinics by a case-insensitive substring scan over name,
/// address, and city.
#[must_use]
pub fn filter_clinics<'a>(clinics: &'a [Clinic], query: &str) -> Vec<&'a Clinic> {
    let needle = query.to_lowercase();
    clinics
        .iter()
        .filter(|clinic| {
            clinic.name.to_lowercase().contains(&needle)
                || clinic
                    .address
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
                || clinic
                    .city
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clinic_at(name: &str, lat: f64, lon: f64) -> Clinic {
        let mut clinic = Clinic::new(name.to_string());
        clinic.latitude = Some(lat);
        clinic.longitude = Some(lon);
        clinic
    }

    #[test]
    fn test_haversine_known_pair() {
        // Downtown San Francisco pair; independently computed great-circle
        // distance is ~1.39 km, rounded here to one decimal
        let d = haversine_km(37.7749, -122.4194, 37.7831, -122.4075);
        assert!((d - 1.4).abs() <= 0.1, "got {d}");
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_km(37.7749, -122.4194, 37.7749, -122.4194), 0.0);
    }

    #[test]
    fn test_haversine_rounded_to_one_decimal() {
        let d = haversine_km(37.7749, -122.4194, 37.7929, -122.3971);
        assert_eq!(d, (d * 10.0).round() / 10.0);
    }

    #[test]
    fn test_sort_by_distance_nearest_first() {
        let clinics = vec![
            clinic_at("Golden Gate Urgent Care", 37.7929, -122.3971),
            clinic_at("City General Hospital", 37.7749, -122.4194),
            clinic_at("Downtown Medical Center", 37.7831, -122.4075),
        ];

        let sorted = sort_by_distance(&clinics, 37.7749, -122.4194);
        assert_eq!(sorted.len(), 3);
        assert_eq!(sorted[0].clinic.name, "City General Hospital");
        assert_eq!(sorted[0].distance_km, 0.0);
        assert!(sorted[1].distance_km <= sorted[2].distance_km);
    }

    #[test]
    fn test_sort_skips_clinics_without_coordinates() {
        let clinics = vec![
            Clinic::new("No Location Clinic".to_string()),
            clinic_at("City General Hospital", 37.7749, -122.4194),
        ];
        let sorted = sort_by_distance(&clinics, 37.7749, -122.4194);
        assert_eq!(sorted.len(), 1);
    }

    #[test]
    fn test_filter_matches_name_and_city() {
        let mut bay = clinic_at("Bay Area Pediatrics", 37.7759, -122.4245);
        bay.city = Some("San Francisco".to_string());
        let clinics = vec![bay, clinic_at("City General Hospital", 37.7749, -122.4194)];

        assert_eq!(filter_clinics(&clinics, "pediatrics").len(), 1);
        assert_eq!(filter_clinics(&clinics, "francisco").len(), 1);
        assert_eq!(filter_clinics(&clinics, "CITY").len(), 1);
        assert!(filter_clinics(&clinics, "oakland").is_empty());
    }
}
