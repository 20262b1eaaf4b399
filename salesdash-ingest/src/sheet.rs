//! Download a spreadsheet's CSV export over HTTP.

use tracing::info;

use crate::csv_source::read_rows;
use crate::error::Result;
use crate::raw::RawRow;

/// CSV export URL for a Google Sheets document id.
pub fn export_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{}/export?format=csv", sheet_id.trim())
}

/// Fetch `url` and parse the body as a ledger CSV.
pub async fn fetch_rows(client: &reqwest::Client, url: &str) -> Result<Vec<RawRow>> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    info!(url, bytes = body.len(), "downloaded sheet export");
    read_rows(body.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_url() {
        assert_eq!(
            export_url(" abc123 "),
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv"
        );
    }
}
