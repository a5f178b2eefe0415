use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Pipeline records ---

/// One mile segment parsed from the published table.
#[derive(Debug, Clone, PartialEq)]
pub struct MileRecord {
    pub number: u32,
    pub name: String,
    /// Detail page URL, derived from the mile number and slugified name.
    pub url: String,
    /// South boundary point in [lon, lat] order.
    pub point: [f64; 2],
}

/// A mile record plus the optional fields pulled from its detail page.
/// Enrichment fields stay `None` when no source yields a value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedMile {
    pub record: MileRecord,
    pub image_url: Option<String>,
    pub report_count: Option<u32>,
}

impl EnrichedMile {
    /// A record that passed through enrichment untouched (past the fetch cap).
    pub fn unenriched(record: MileRecord) -> Self {
        Self {
            record,
            image_url: None,
            report_count: None,
        }
    }
}

// --- Persisted GeoJSON artifact ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MileFeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub features: Vec<MileFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MileFeature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub id: u32,
    pub properties: MileProperties,
    pub geometry: PointGeometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileProperties {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_reports: Option<u32>,
    pub mile_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    /// [lon, lat]
    pub coordinates: [f64; 2],
}

/// Lowercase a mile name and collapse runs of non-alphanumerics into single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_hyphen = true; // suppress a leading hyphen
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
