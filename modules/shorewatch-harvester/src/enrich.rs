use anyhow::Result;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use shorewatch_common::{EnrichedMile, MileRecord};

use crate::fetch::PageFetcher;

/// Hard cap on detail-page fetches per run. Records past the cap still appear
/// in the output, just without enrichment fields.
pub const DETAIL_FETCH_CAP: usize = 500;

/// Optional fields extracted from one detail page.
#[derive(Debug, Default, PartialEq)]
pub struct DetailFields {
    pub image_url: Option<String>,
    pub report_count: Option<u32>,
}

/// Visit at most the first `DETAIL_FETCH_CAP` records, strictly one fetch at a
/// time, each awaited before the next. A failed fetch aborts the whole run;
/// an extraction miss just leaves the field absent.
pub async fn enrich(
    records: Vec<MileRecord>,
    fetcher: &dyn PageFetcher,
) -> Result<Vec<EnrichedMile>> {
    let mut miles = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        if index >= DETAIL_FETCH_CAP {
            miles.push(EnrichedMile::unenriched(record));
            continue;
        }

        let html = fetcher.fetch(&record.url).await?;
        let fields = extract_detail(&html);
        debug!(
            mile = record.number,
            has_image = fields.image_url.is_some(),
            has_reports = fields.report_count.is_some(),
            "Detail page extracted"
        );
        miles.push(EnrichedMile {
            record,
            image_url: fields.image_url,
            report_count: fields.report_count,
        });
    }

    Ok(miles)
}

/// Pull the optional image and report-count fields out of one detail page.
pub fn extract_detail(html: &str) -> DetailFields {
    let document = Html::parse_document(html);
    DetailFields {
        image_url: extract_image(&document),
        report_count: extract_report_count(&document),
    }
}

/// First success wins: the primary mile image, then the first report image
/// whose alt text does not mark it decorative.
fn extract_image(document: &Html) -> Option<String> {
    let primary = Selector::parse("img.mile-image").unwrap();
    if let Some(src) = document
        .select(&primary)
        .next()
        .and_then(|img| img.value().attr("src"))
    {
        return Some(src.to_string());
    }

    let fallback = Selector::parse("img.report-image").unwrap();
    document
        .select(&fallback)
        .find(|img| !is_decorative(img.value().attr("alt")))
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.to_string())
}

/// Missing, empty, or explicitly "decorative" alt text.
fn is_decorative(alt: Option<&str>) -> bool {
    match alt {
        Some(alt) => {
            let alt = alt.trim();
            alt.is_empty() || alt.to_ascii_lowercase().contains("decorative")
        }
        None => true,
    }
}

/// The pagination summary reads "Showing X of N reports"; N is the total.
fn extract_report_count(document: &Html) -> Option<u32> {
    let meta = Selector::parse(".results-meta").unwrap();
    let pattern = Regex::new(r"Showing\s+\d+\s+of\s+(\d+)\s+reports").expect("valid regex");

    let text: String = document
        .select(&meta)
        .next()?
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    pattern
        .captures(&text)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingFetcher, MockFetcher};

    fn record(number: u32) -> MileRecord {
        MileRecord {
            number,
            name: format!("Segment {number}"),
            url: format!("https://coast.example/miles/{number}-segment-{number}"),
            point: [-124.0, 44.0],
        }
    }

    #[test]
    fn primary_image_wins_over_report_images() {
        let html = r#"
            <html><body>
                <img class="mile-image" src="https://img.example/mile.jpg" alt="Looking north">
                <img class="report-image" src="https://img.example/report.jpg" alt="Storm debris">
            </body></html>
        "#;
        let fields = extract_detail(html);
        assert_eq!(fields.image_url.as_deref(), Some("https://img.example/mile.jpg"));
    }

    #[test]
    fn falls_back_to_first_non_decorative_report_image() {
        let html = r#"
            <html><body>
                <img class="report-image" src="https://img.example/border.png" alt="decorative border">
                <img class="report-image" src="https://img.example/spacer.png" alt="">
                <img class="report-image" src="https://img.example/debris.jpg" alt="Storm debris on the beach">
            </body></html>
        "#;
        let fields = extract_detail(html);
        assert_eq!(
            fields.image_url.as_deref(),
            Some("https://img.example/debris.jpg")
        );
    }

    #[test]
    fn no_usable_image_leaves_field_absent() {
        let html = r#"
            <html><body>
                <img class="report-image" src="https://img.example/border.png" alt="decorative border">
                <p>No photos this quarter.</p>
            </body></html>
        "#;
        assert_eq!(extract_detail(html).image_url, None);
    }

    #[test]
    fn report_count_comes_from_results_meta() {
        let html = r#"
            <html><body>
                <div class="results-meta">Showing 3 of 47 reports</div>
            </body></html>
        "#;
        assert_eq!(extract_detail(html).report_count, Some(47));
    }

    #[test]
    fn absent_or_malformed_summary_yields_none() {
        assert_eq!(extract_detail("<html><body></body></html>").report_count, None);

        let html = r#"<html><body><div class="results-meta">All reports shown</div></body></html>"#;
        assert_eq!(extract_detail(html).report_count, None);
    }

    #[tokio::test]
    async fn caps_detail_fetches_while_keeping_every_record() {
        let records: Vec<MileRecord> = (1..=520).map(record).collect();
        let fetcher = CountingFetcher::new("<html><body></body></html>");

        let miles = enrich(records, &fetcher).await.unwrap();

        assert_eq!(fetcher.calls().len(), DETAIL_FETCH_CAP);
        assert_eq!(miles.len(), 520);
        assert_eq!(miles[519].record.number, 520);
        assert_eq!(miles[519].image_url, None);
    }

    #[tokio::test]
    async fn fetches_strictly_in_row_order() {
        let records: Vec<MileRecord> = [4, 1, 9].into_iter().map(record).collect();
        let fetcher = CountingFetcher::new("<html><body></body></html>");

        enrich(records, &fetcher).await.unwrap();

        assert_eq!(
            fetcher.calls(),
            vec![
                "https://coast.example/miles/4-segment-4",
                "https://coast.example/miles/1-segment-1",
                "https://coast.example/miles/9-segment-9",
            ]
        );
    }

    #[tokio::test]
    async fn failed_fetch_propagates() {
        let fetcher = MockFetcher::new(); // nothing registered
        let result = enrich(vec![record(1)], &fetcher).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn extraction_misses_are_soft() {
        let fetcher = MockFetcher::new().on_page(
            "https://coast.example/miles/1-segment-1",
            "<html><body><p>Sparse page</p></body></html>",
        );
        let miles = enrich(vec![record(1)], &fetcher).await.unwrap();
        assert_eq!(miles[0].image_url, None);
        assert_eq!(miles[0].report_count, None);
    }
}
