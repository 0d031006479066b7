use chrono::{DateTime, NaiveDate, Utc};
use festival::voting::LinkOpener;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

/// Hands voting links to the terminal; the user follows them from there.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TerminalLinkOpener;

impl LinkOpener for TerminalLinkOpener {
    fn open(&self, url: &str) {
        println!("Abrir formulário de votação: {url}");
    }
}
