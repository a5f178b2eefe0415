use shorewatch_common::{MileFeatureCollection, ShorewatchError};

/// Fewer features than this means the table markup changed or the source
/// served an error page.
pub const MIN_FEATURE_COUNT: usize = 10;

/// Gate the assembled collection before it may overwrite the cache.
///
/// All three checks run against the full feature set; any failure keeps the
/// previously persisted collection authoritative. Zero image or report
/// coverage is the tell that the detail-page markup drifted.
pub fn validate(collection: &MileFeatureCollection) -> Result<(), ShorewatchError> {
    if !collection
        .features
        .iter()
        .any(|f| f.properties.image_url.is_some())
    {
        return Err(ShorewatchError::Validation(
            "no feature carries an image URL; detail page markup may have changed".to_string(),
        ));
    }

    if !collection
        .features
        .iter()
        .any(|f| f.properties.num_reports.is_some())
    {
        return Err(ShorewatchError::Validation(
            "no feature carries a report count; detail page markup may have changed".to_string(),
        ));
    }

    if collection.features.len() < MIN_FEATURE_COUNT {
        return Err(ShorewatchError::Validation(format!(
            "only {} features assembled (floor is {MIN_FEATURE_COUNT}); table markup may have changed",
            collection.features.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shorewatch_common::{MileFeature, MileProperties, PointGeometry};

    fn feature(number: u32, image: Option<&str>, reports: Option<u32>) -> MileFeature {
        MileFeature {
            feature_type: "Feature".to_string(),
            id: number,
            properties: MileProperties {
                name: format!("Segment {number}"),
                url: format!("https://coast.example/miles/{number}-segment-{number}"),
                image_url: image.map(|s| s.to_string()),
                num_reports: reports,
                mile_number: number,
            },
            geometry: PointGeometry {
                geometry_type: "Point".to_string(),
                coordinates: [-124.0, 44.0],
            },
        }
    }

    fn collection(features: Vec<MileFeature>) -> MileFeatureCollection {
        MileFeatureCollection {
            collection_type: "FeatureCollection".to_string(),
            updated_at: Utc::now(),
            features,
        }
    }

    fn healthy(count: u32) -> Vec<MileFeature> {
        (1..=count)
            .map(|n| feature(n, Some("https://img.example/m.jpg"), Some(n)))
            .collect()
    }

    #[test]
    fn accepts_a_collection_passing_all_gates() {
        assert!(validate(&collection(healthy(10))).is_ok());
        assert!(validate(&collection(healthy(300))).is_ok());
    }

    #[test]
    fn rejects_zero_image_coverage() {
        let features = (1..=12).map(|n| feature(n, None, Some(n))).collect();
        let err = validate(&collection(features)).unwrap_err();
        assert!(err.to_string().contains("image URL"));
    }

    #[test]
    fn rejects_zero_report_coverage() {
        let features = (1..=12)
            .map(|n| feature(n, Some("https://img.example/m.jpg"), None))
            .collect();
        let err = validate(&collection(features)).unwrap_err();
        assert!(err.to_string().contains("report count"));
    }

    #[test]
    fn rejects_fewer_features_than_the_floor() {
        let err = validate(&collection(healthy(9))).unwrap_err();
        assert!(err.to_string().contains("floor is 10"));
    }

    #[test]
    fn one_covered_feature_satisfies_a_coverage_gate() {
        let mut features = vec![feature(1, Some("https://img.example/m.jpg"), Some(4))];
        features.extend((2..=10).map(|n| feature(n, None, None)));
        assert!(validate(&collection(features)).is_ok());
    }
}
