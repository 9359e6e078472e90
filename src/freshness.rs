use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::keys::ParsedBackupRecord;

/// Staleness tier for a backup's age. Serialized lowercase so templates can
/// use it directly as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

impl Severity {
    /// Under a day old is fine, under a week is worth a look, anything older
    /// means backups have stopped.
    pub fn for_age_days(age_days: i64) -> Self {
        if age_days < 1 {
            Severity::Success
        } else if age_days < 7 {
            Severity::Warning
        } else {
            Severity::Danger
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestBackup {
    pub app_name: String,
    pub timestamp: NaiveDateTime,
    pub relative_age: String,
    pub severity: Severity,
}

/// Reduce parsed records to the newest valid backup per allow-listed
/// application, sorted by application name.
///
/// Replacement happens only on a strictly greater timestamp, so when two
/// records tie the first one seen wins. Callers feed records in lexicographic
/// key order, which makes that tie-break deterministic.
pub fn aggregate(
    records: impl IntoIterator<Item = ParsedBackupRecord>,
    allowed: &HashSet<String>,
    now: NaiveDateTime,
) -> Vec<LatestBackup> {
    let mut latest: BTreeMap<String, NaiveDateTime> = BTreeMap::new();

    for record in records {
        if !allowed.contains(&record.app_name) {
            continue;
        }
        let Some(timestamp) = record.timestamp else {
            continue;
        };
        match latest.get_mut(&record.app_name) {
            Some(existing) => {
                if timestamp > *existing {
                    *existing = timestamp;
                }
            }
            None => {
                latest.insert(record.app_name, timestamp);
            }
        }
    }

    // BTreeMap iteration gives the name-sorted order the dashboard renders in.
    latest
        .into_iter()
        .map(|(app_name, timestamp)| {
            let age_days = (now - timestamp).num_days();
            LatestBackup {
                relative_age: relative_age(now, timestamp),
                severity: Severity::for_age_days(age_days),
                app_name,
                timestamp,
            }
        })
        .collect()
}

const AGE_UNITS: &[(i64, &str)] = &[
    (365 * 86_400, "year"),
    (30 * 86_400, "month"),
    (7 * 86_400, "week"),
    (86_400, "day"),
    (3_600, "hour"),
    (60, "minute"),
];

/// Human "time since" phrase for the largest unit that fits. Anything under a
/// minute (including a clock-skewed future timestamp) reads as "just now".
pub fn relative_age(now: NaiveDateTime, then: NaiveDateTime) -> String {
    let elapsed = (now - then).num_seconds();
    for &(unit_seconds, unit_name) in AGE_UNITS {
        if elapsed >= unit_seconds {
            let count = elapsed / unit_seconds;
            let plural = if count == 1 { "" } else { "s" };
            return format!("{} {}{} ago", count, unit_name, plural);
        }
    }
    "just now".to_string()
}
