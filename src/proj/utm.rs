//! UTM zone lookup for a geographic point.
//!
//! The zone picked here is the "locally appropriate" metric CRS used for all
//! area and distance arithmetic in the crate.

/// EPSG code of a UTM zone (326zz north, 327zz south).
pub type ZoneCode = u32;

/// Base UTM zone number (1..=60) from longitude alone.
pub fn base_zone_number(lon: f64) -> u32 {
    (((lon + 180.0) / 6.0).floor() as i64).rem_euclid(60) as u32 + 1
}

/// Resolve the UTM EPSG code for a (lon, lat) point in degrees.
///
/// Applies the Norway (zone 32) and Svalbard (zones 31/33/35/37) exceptions.
/// Latitude 0 counts as southern hemisphere.
pub fn resolve_zone(lon: f64, lat: f64) -> ZoneCode {
    let mut zone = base_zone_number(lon);

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        zone = 32;
    } else if (72.0..84.0).contains(&lat) {
        zone = match lon {
            l if (0.0..9.0).contains(&l) => 31,
            l if (9.0..21.0).contains(&l) => 33,
            l if (21.0..33.0).contains(&l) => 35,
            l if (33.0..42.0).contains(&l) => 37,
            _ => zone,
        };
    }

    if lat > 0.0 {
        32600 + zone
    } else {
        32700 + zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_points() {
        // Panama
        assert_eq!(resolve_zone(-79.52826976776123, 8.847423357771518), 32617);
        // Wuerzburg
        assert_eq!(resolve_zone(9.95121, 49.79391), 32632);
        // Norway special zone
        assert_eq!(resolve_zone(9.767417, 62.765571), 32632);
        // Svalbard special zone
        assert_eq!(resolve_zone(12.809028, 79.026583), 32633);
    }

    #[test]
    fn test_norway_overrides_base_zone() {
        // Base zone at 4.5E is 31
        assert_eq!(base_zone_number(4.5), 31);
        assert_eq!(resolve_zone(4.5, 60.0), 32632);
        // Just outside the latitude band
        assert_eq!(resolve_zone(4.5, 64.0), 32631);
    }

    #[test]
    fn test_svalbard_bands() {
        assert_eq!(resolve_zone(5.0, 78.0), 32631);
        assert_eq!(resolve_zone(20.9, 78.0), 32633);
        assert_eq!(resolve_zone(25.0, 78.0), 32635);
        assert_eq!(resolve_zone(41.0, 78.0), 32637);
        // Outside the sub-bands the base zone stands
        assert_eq!(resolve_zone(45.0, 78.0), 32638);
        assert_eq!(resolve_zone(-3.0, 78.0), 32630);
    }

    #[test]
    fn test_equator_is_south() {
        assert_eq!(resolve_zone(0.5, 0.0), 32731);
        assert_eq!(resolve_zone(0.5, 1e-9), 32631);
    }

    #[test]
    fn test_antimeridian_wraps() {
        assert_eq!(base_zone_number(-180.0), 1);
        assert_eq!(base_zone_number(179.999), 60);
        assert_eq!(base_zone_number(180.0), 1);
    }

    #[test]
    fn test_total_over_grid() {
        let mut lon = -180.0;
        while lon < 180.0 {
            let mut lat = -89.5;
            while lat < 90.0 {
                let code = resolve_zone(lon, lat);
                assert!(
                    (32601..=32660).contains(&code) || (32701..=32760).contains(&code),
                    "({lon}, {lat}) -> {code}"
                );
                lat += 7.25;
            }
            lon += 2.5;
        }
    }
}
