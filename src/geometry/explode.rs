use geo::MultiPolygon;

use crate::footprint::{Footprint, FootprintCollection};

/// Split a footprint into one row per polygon part, attributes copied.
pub fn explode_footprint(footprint: &Footprint) -> Vec<Footprint> {
    footprint
        .geometry
        .0
        .iter()
        .map(|part| footprint.with_geometry(MultiPolygon::new(vec![part.clone()])))
        .collect()
}

/// Decompose every multi-part row into single-part rows.
///
/// Output order: the single-part rows in their original order, then the
/// parts of each multi-part row, grouped by source row in part order.
pub fn explode(collection: &FootprintCollection) -> FootprintCollection {
    let (multi, single): (Vec<&Footprint>, Vec<&Footprint>) =
        collection.iter().partition(|fp| fp.is_multi_part());

    let footprints = single
        .into_iter()
        .cloned()
        .chain(multi.into_iter().flat_map(explode_footprint))
        .collect();

    FootprintCollection::new(collection.crs(), footprints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::Properties;
    use approx::assert_relative_eq;
    use geo::{polygon, Area, Polygon};
    use serde_json::json;

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]
    }

    fn row(id: &str, geometry: MultiPolygon<f64>) -> Footprint {
        let props: Properties = json!({"id": id, "cc": 1}).as_object().cloned().unwrap();
        Footprint::new(geometry, props)
    }

    #[test]
    fn test_explode_order_and_count() {
        let fc = FootprintCollection::new(
            32632,
            vec![
                row("m1", MultiPolygon::new(vec![square(0.0, 0.0, 1.0), square(5.0, 0.0, 2.0)])),
                row("s1", square(10.0, 0.0, 1.0).into()),
                row(
                    "m2",
                    MultiPolygon::new(vec![
                        square(20.0, 0.0, 1.0),
                        square(22.0, 0.0, 1.0),
                        square(24.0, 0.0, 1.0),
                    ]),
                ),
                row("s2", square(30.0, 0.0, 1.0).into()),
            ],
        );

        let out = explode(&fc);
        assert_eq!(out.len(), 4 + 1 + 2);
        assert_eq!(out.crs(), 32632);
        let ids: Vec<String> = out.iter().map(|fp| fp.scene_id("id")).collect();
        assert_eq!(ids, ["s1", "s2", "m1", "m1", "m2", "m2", "m2"]);
        assert!(out.iter().all(|fp| !fp.is_multi_part()));
        // parts keep part order
        assert_relative_eq!(out.footprints()[3].geometry.unsigned_area(), 4.0);
        assert_eq!(out.footprints()[6].number("cc"), Some(1.0));
    }

    #[test]
    fn test_explode_preserves_area() {
        let mp = MultiPolygon::new(vec![square(0.0, 0.0, 1.0), square(5.0, 0.0, 2.0)]);
        let total = mp.unsigned_area();
        let parts = explode_footprint(&row("m", mp));
        assert_eq!(parts.len(), 2);
        let sum: f64 = parts.iter().map(|p| p.geometry.unsigned_area()).sum();
        assert_relative_eq!(sum, total);
    }

    #[test]
    fn test_single_part_passthrough() {
        let fc = FootprintCollection::new(4326, vec![row("s", square(0.0, 0.0, 1.0).into())]);
        assert_eq!(explode(&fc), fc);
    }
}
