//! Status document: a flat JSON object of strings.

use std::collections::BTreeMap;

use crate::error::Result;

pub type StatusMap = BTreeMap<String, String>;

/// Fetches and decodes the status document at `url`.
pub async fn fetch_status(client: &reqwest::Client, url: &str) -> Result<StatusMap> {
    let status = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<StatusMap>()
        .await?;
    Ok(status)
}
