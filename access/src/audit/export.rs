//! Audit log export encodings.
//!
//! Both encodings render exactly the slice they are given, in its order.
//!
//! CSV fields are comma-joined without quoting or escaping. A field holding a
//! comma shifts the columns after it. Downstream consumers already parse this
//! layout, so it is kept as is.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use fd_common::ActivityLogEntry;
use serde::{Deserialize, Serialize};

use super::error::AuditError;

/// CSV header columns.
pub const CSV_HEADER: [&str; 8] = [
    "Timestamp",
    "User",
    "Email",
    "Action",
    "Resource",
    "Details",
    "Severity",
    "IP Address",
];

/// Placeholder for a missing IP address.
pub const MISSING_IP: &str = "N/A";

/// Render entries as CSV: a header row, then one row per entry, `\n`-separated.
#[must_use]
pub fn export_csv(entries: &[ActivityLogEntry]) -> Vec<u8> {
    let mut rows = Vec::with_capacity(entries.len() + 1);
    rows.push(CSV_HEADER.join(","));

    for entry in entries {
        let timestamp = format_timestamp(entry.timestamp);
        let row = [
            timestamp.as_str(),
            entry.user_name.as_str(),
            entry.user_email.as_str(),
            entry.action.as_str(),
            entry.resource.as_str(),
            entry.details.as_str(),
            entry.severity.as_str(),
            entry.ip_address.as_deref().unwrap_or(MISSING_IP),
        ];
        rows.push(row.join(","));
    }

    rows.join("\n").into_bytes()
}

/// Render entries as a pretty-printed JSON array with every field.
pub fn export_json(entries: &[ActivityLogEntry]) -> Result<Vec<u8>, AuditError> {
    Ok(serde_json::to_vec_pretty(entries)?)
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Export encoding picked on the audit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    /// Download name, e.g. `audit-logs-2024-01-25.csv`.
    #[must_use]
    pub fn file_name(self, date: NaiveDate) -> String {
        format!("audit-logs-{}.{}", date.format("%Y-%m-%d"), self.extension())
    }

    pub fn render(self, entries: &[ActivityLogEntry]) -> Result<Vec<u8>, AuditError> {
        match self {
            Self::Csv => Ok(export_csv(entries)),
            Self::Json => export_json(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fd_common::Severity;
    use uuid::Uuid;

    fn entry(ip: Option<&str>) -> ActivityLogEntry {
        ActivityLogEntry {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            user_name: "John Doe".into(),
            user_email: "john.doe@acme.com".into(),
            action: "Updated billing plan".into(),
            resource: "billing".into(),
            resource_id: Some("billing-001".into()),
            details: "Upgraded from Starter to Professional plan".into(),
            metadata: Some(serde_json::json!({"from": "starter", "to": "professional"})),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 22, 11, 20, 0).unwrap(),
            severity: Severity::High,
            ip_address: ip.map(str::to_string),
            user_agent: None,
        }
    }

    #[test]
    fn test_csv_empty_is_header_only() {
        let csv = String::from_utf8(export_csv(&[])).unwrap();
        assert_eq!(
            csv,
            "Timestamp,User,Email,Action,Resource,Details,Severity,IP Address"
        );
    }

    #[test]
    fn test_csv_row_layout() {
        let csv = String::from_utf8(export_csv(&[entry(Some("10.0.0.7")), entry(None)])).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "2024-01-22T11:20:00.000Z,John Doe,john.doe@acme.com,Updated billing plan,billing,Upgraded from Starter to Professional plan,high,10.0.0.7"
        );
        assert!(lines[2].ends_with(",high,N/A"));
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_csv_does_not_escape_commas() {
        let mut e = entry(None);
        e.details = "Moved a, b and c".into();
        let csv = String::from_utf8(export_csv(&[e])).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row.split(',').count(), CSV_HEADER.len() + 1);
        assert!(!row.contains('"'));
    }

    #[test]
    fn test_json_empty_array() {
        assert_eq!(export_json(&[]).unwrap(), b"[]");
    }

    #[test]
    fn test_json_is_pretty_and_complete() {
        let json = String::from_utf8(export_json(&[entry(None)]).unwrap()).unwrap();
        assert!(json.starts_with("[\n  {\n    \"id\""));

        let parsed: Vec<ActivityLogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].metadata.as_ref().unwrap()["to"], "professional");
        assert!(!json.contains("ipAddress"));
    }

    #[test]
    fn test_file_name_and_content_type() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();
        assert_eq!(ExportFormat::Csv.file_name(date), "audit-logs-2024-01-25.csv");
        assert_eq!(ExportFormat::Json.file_name(date), "audit-logs-2024-01-25.json");
        assert_eq!(ExportFormat::Json.content_type(), "application/json");
    }
}
