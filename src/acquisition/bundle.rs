//! Company bundle acquisition.
//!
//! Fetches the registrar's front-end bundle and runs the company-list
//! extraction engine over it. Degrades gracefully: a missing, oversized,
//! or unrecognized bundle yields an empty company list, while transport
//! failures propagate so the caller can tell "no companies" apart from
//! "fetch failed".

use crate::acquisition::http_client::HttpClient;
use crate::config::Config;
use crate::extract::companies::{self, CompanyEntry};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Maximum bundle size in bytes (5 MB). Larger responses are not scanned.
const MAX_BUNDLE_SIZE: usize = 5 * 1024 * 1024;

/// Fetch the configured bundle and extract the company list from it.
pub async fn fetch_companies(config: &Config, client: &HttpClient) -> Result<Vec<CompanyEntry>> {
    debug!("fetching company bundle from {}", config.bundle_url);

    let headers = script_fetch_headers(&config.base_url);
    let resp = client
        .get_with_headers(&config.bundle_url, &headers, config.timeout_ms)
        .await?;

    if resp.status != 200 {
        warn!(
            "bundle fetch returned HTTP {} for {}",
            resp.status, config.bundle_url
        );
        return Ok(Vec::new());
    }

    if resp.body.len() > MAX_BUNDLE_SIZE {
        warn!(
            "bundle at {} exceeds size cap ({} bytes), skipping scan",
            config.bundle_url,
            resp.body.len()
        );
        return Ok(Vec::new());
    }

    let entries = companies::extract(&resp.body);
    info!(
        "extracted {} companies from {} byte bundle",
        entries.len(),
        resp.body.len()
    );

    Ok(entries)
}

/// Browser-shaped request headers for a script asset fetch, mirroring what
/// the status site's own pages send for this asset.
fn script_fetch_headers(base_url: &str) -> Vec<(String, String)> {
    vec![
        ("Accept".to_string(), "*/*".to_string()),
        ("Accept-Language".to_string(), "en-IN,en;q=0.9".to_string()),
        ("Referer".to_string(), format!("{}/", base_url.trim_end_matches('/'))),
        ("sec-fetch-dest".to_string(), "script".to_string()),
        ("sec-fetch-mode".to_string(), "no-cors".to_string()),
        ("sec-fetch-site".to_string(), "same-origin".to_string()),
    ]
}
