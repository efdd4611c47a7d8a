use std::collections::HashSet;
use tracing::{info, warn};

use crate::scrape;

/// The canonical brand list embedded into every correction prompt.
///
/// Built once per run from the configured list plus an optional scraped
/// directory; insertion order is preserved and duplicates are dropped on
/// first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandRegistry {
    brands: Vec<String>,
}

impl BrandRegistry {
    pub fn build(manual: &[String], scraped: &[String]) -> Self {
        let mut seen = HashSet::new();
        let mut brands = Vec::new();
        for brand in manual.iter().chain(scraped.iter()) {
            let brand = brand.trim();
            if brand.is_empty() {
                continue;
            }
            if seen.insert(brand.to_string()) {
                brands.push(brand.to_string());
            }
        }
        Self { brands }
    }

    /// Builds the registry, pulling extra names from the directory page when
    /// one is configured. Scrape failures are logged and ignored; the manual
    /// list alone is always enough to run.
    pub async fn build_with_directory(manual: &[String], directory_url: Option<&str>) -> Self {
        let scraped = match directory_url {
            Some(url) => match scrape::fetch_directory_brands(url).await {
                Ok(brands) => {
                    info!("Scraped {} brand names from {}", brands.len(), url);
                    brands
                }
                Err(e) => {
                    warn!("Brand directory scrape failed, using manual list only: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Self::build(manual, &scraped)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.brands
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    /// Comma-separated form used by the prompt template.
    pub fn joined(&self) -> String {
        self.brands.join(", ")
    }
}
