use anyhow::Context;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Forces the xlsx export (all sheets) and appends a cache-busting `t=`.
pub fn workbook_url(url: &str, now_millis: i64) -> String {
    let xlsx = url.replace("format=csv", "format=xlsx");
    let sep = if xlsx.contains('?') { '&' } else { '?' };
    format!("{xlsx}{sep}t={now_millis}")
}

/// Per-student report page under a test's report base url.
pub fn report_url(base: &str, student_id: &str) -> String {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    format!("{base}{student_id}/")
}

fn client(timeout: Duration) -> anyhow::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")
}

pub fn fetch_workbook(url: &str, timeout: Duration) -> anyhow::Result<Vec<u8>> {
    let url = workbook_url(url, chrono::Utc::now().timestamp_millis());
    info!(%url, "fetching workbook");
    let response = client(timeout)?
        .get(&url)
        .send()
        .with_context(|| format!("request to {url} failed"))?;
    if !response.status().is_success() {
        anyhow::bail!("failed to fetch sheet: HTTP {}", response.status());
    }
    let bytes = response.bytes().context("failed to read workbook body")?;
    info!(bytes = bytes.len(), "workbook downloaded");
    Ok(bytes.to_vec())
}

/// Asks the scrape service to turn a report page into JSON.
pub fn scrape_report(
    endpoint: &str,
    report_url: &str,
    timeout: Duration,
) -> anyhow::Result<serde_json::Value> {
    info!(%endpoint, %report_url, "requesting report scrape");
    let response = client(timeout)?
        .post(endpoint)
        .json(&json!({ "url": report_url }))
        .send()
        .with_context(|| format!("request to {endpoint} failed"))?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!(
            "API Error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
    }
    response
        .json::<serde_json::Value>()
        .context("scrape response was not json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_export_becomes_xlsx_with_cache_buster() {
        assert_eq!(
            workbook_url("https://docs.google.com/spreadsheets/d/X/export?format=csv", 42),
            "https://docs.google.com/spreadsheets/d/X/export?format=xlsx&t=42"
        );
        assert_eq!(
            workbook_url("https://example.org/book.xlsx", 7),
            "https://example.org/book.xlsx?t=7"
        );
    }

    #[test]
    fn report_url_joins_with_single_slash() {
        assert_eq!(report_url("https://r.example/quiz", "S1"), "https://r.example/quiz/S1/");
        assert_eq!(report_url("https://r.example/quiz/", "S1"), "https://r.example/quiz/S1/");
    }
}
