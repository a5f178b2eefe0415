use chrono::{DateTime, Utc};

use shorewatch_common::{
    EnrichedMile, MileFeature, MileFeatureCollection, MileProperties, PointGeometry,
};

/// Wrap the enriched miles in the GeoJSON envelope, in input order, stamped
/// with a single wall-clock timestamp captured by the caller.
pub fn assemble(miles: Vec<EnrichedMile>, now: DateTime<Utc>) -> MileFeatureCollection {
    MileFeatureCollection {
        collection_type: "FeatureCollection".to_string(),
        updated_at: now,
        features: miles.into_iter().map(to_feature).collect(),
    }
}

fn to_feature(mile: EnrichedMile) -> MileFeature {
    let EnrichedMile {
        record,
        image_url,
        report_count,
    } = mile;

    MileFeature {
        feature_type: "Feature".to_string(),
        id: record.number,
        properties: MileProperties {
            name: record.name,
            url: record.url,
            image_url,
            num_reports: report_count,
            mile_number: record.number,
        },
        geometry: PointGeometry {
            geometry_type: "Point".to_string(),
            coordinates: record.point,
        },
    }
}
