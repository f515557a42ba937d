use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::assets::Asset;
use crate::catalog::Catalog;
use crate::constants::{CATALOG_REQUEST_TIMEOUT_SECS, EMBEDDED_CATALOG};
use crate::error::LoadError;

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Embedded,
    File(PathBuf),
    Url(Url),
}

impl CatalogSource {
    /// `"embedded"` or empty selects the bundled file, http(s) URLs are fetched,
    /// anything else is a filesystem path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("embedded") {
            return CatalogSource::Embedded;
        }
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => CatalogSource::Url(url),
            _ => CatalogSource::File(PathBuf::from(raw)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Embedded => write!(f, "embedded {}", EMBEDDED_CATALOG),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Fetches and decodes the catalog once; no retries.
pub async fn load_catalog(source: &CatalogSource) -> Result<Catalog, LoadError> {
    debug!("Loading catalog from {}", source);

    let document = match source {
        CatalogSource::Embedded => {
            let file = Asset::get(EMBEDDED_CATALOG)
                .ok_or_else(|| LoadError::NotFound(EMBEDDED_CATALOG.to_string()))?;
            String::from_utf8_lossy(&file.data).into_owned()
        }
        CatalogSource::File(path) => match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        },
        CatalogSource::Url(url) => fetch(url).await?,
    };

    let catalog = Catalog::from_json(&document)?;

    for title in catalog.duplicate_titles() {
        warn!("Duplicate movie title '{}': only the first is reachable by title", title);
    }
    for name in catalog.duplicate_location_names() {
        warn!("Duplicate location name '{}': focusing it always picks the first", name);
    }
    info!("📽️  Loaded {} movies from {}", catalog.len(), source);

    Ok(catalog)
}

async fn fetch(url: &Url) -> Result<String, LoadError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(CATALOG_REQUEST_TIMEOUT_SECS))
        .build()?;

    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(LoadError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }

    Ok(response.text().await?)
}
