use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use shorewatch_common::{slugify, MileRecord};

/// Name the source table gives to miles nobody has surveyed yet.
const PLACEHOLDER_NAME: &str = "not yet captured";

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Parse the published table markup and collect the mile records in row order.
pub fn parse_table(html: &str, detail_base_url: &str) -> Vec<MileRecord> {
    let document = Html::parse_document(html);
    mile_rows(&document, detail_base_url).collect()
}

/// Lazy row-order iterator over the data rows of the published table.
///
/// Rows are skipped rather than errored when they are not data:
/// - the mile-number cell does not parse as an integer (header rows), or
/// - the name cell carries the "not yet captured" placeholder.
pub fn mile_rows<'a>(
    document: &'a Html,
    detail_base_url: &'a str,
) -> impl Iterator<Item = MileRecord> + 'a {
    document.select(&ROW_SELECTOR).filter_map(move |row| {
        let cells: Vec<String> = row.select(&CELL_SELECTOR).map(cell_text).collect();
        parse_row(&cells, detail_base_url)
    })
}

/// Columns: [unused, mile number, name, north boundary, south boundary, ..].
/// The south boundary becomes the record's point geometry.
fn parse_row(cells: &[String], detail_base_url: &str) -> Option<MileRecord> {
    let number: u32 = cells.get(1)?.parse().ok()?;
    let name = cells.get(2)?.clone();
    if name.eq_ignore_ascii_case(PLACEHOLDER_NAME) {
        return None;
    }

    let south = cells.get(4).map(String::as_str).unwrap_or("");
    let url = format!("{detail_base_url}/{number}-{}", slugify(&name));

    Some(MileRecord {
        number,
        name,
        url,
        point: parse_boundary(south),
    })
}

/// Boundary cells read "<lat>,<lon>"; point geometry wants [lon, lat].
/// Each half is parsed independently; a malformed half becomes NaN, which
/// serializes as JSON null.
fn parse_boundary(text: &str) -> [f64; 2] {
    let (lat, lon) = text.split_once(',').unwrap_or(("", ""));
    [
        lon.trim().parse().unwrap_or(f64::NAN),
        lat.trim().parse().unwrap_or(f64::NAN),
    ]
}

fn cell_text(cell: ElementRef) -> String {
    let text: String = cell.text().collect::<Vec<_>>().join(" ");
    text.trim().to_string()
}
