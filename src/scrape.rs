use crate::error::{CorrectorError, Result};
use scraper::{Html, Selector};
use tracing::info;

/// Fetches a brand directory page and extracts brand names from anchors
/// inside list items. Any failure here is reported to the caller; the
/// registry builder decides whether it is fatal (it never is).
pub async fn fetch_directory_brands(url: &str) -> Result<Vec<String>> {
    let client = reqwest::Client::new();
    info!("HTTP GET request to: {}", url);
    let resp = client
        .get(url)
        .header("User-Agent", "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36")
        .send()
        .await
        .map_err(|e| CorrectorError::Scrape(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(CorrectorError::Scrape(format!(
            "{} returned status {}",
            url, status
        )));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| CorrectorError::Scrape(e.to_string()))?;

    let brands = extract_brands(&body);
    if brands.is_empty() {
        return Err(CorrectorError::Scrape(format!(
            "no list-item anchors found at {}",
            url
        )));
    }
    Ok(brands)
}

fn extract_brands(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("li a").unwrap();

    document
        .select(&anchor_selector)
        .map(|a| a.text().collect::<String>())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
