use chrono::NaiveDateTime;

/// One bucket key reduced to the fields the aggregator needs.
/// A missing timestamp marks the record invalid; the application name is kept
/// either way so diagnostics can point at the offending archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBackupRecord {
    pub app_name: String,
    pub timestamp: Option<NaiveDateTime>,
}

impl ParsedBackupRecord {
    pub fn is_valid(&self) -> bool {
        self.timestamp.is_some()
    }

    fn invalid(app_name: String) -> Self {
        Self {
            app_name,
            timestamp: None,
        }
    }
}

struct FormatRule {
    /// Filename suffix this rule applies to; `None` matches anything.
    suffix: Option<&'static str>,
    pattern: &'static str,
}

/// Two generations of backup tooling named their archives differently; both
/// must be recognized without configuration. Rules are tried in order and the
/// first match decides the pattern.
const FORMAT_RULES: &[FormatRule] = &[
    FormatRule {
        suffix: Some(".tgz"),
        pattern: "%Y-%m-%d-%H-%M-%S",
    },
    FormatRule {
        suffix: None,
        pattern: "%Y.%m.%d.%H.%M.%S",
    },
];

const TIMESTAMP_LEN: usize = 19;

/// Pick the candidate timestamp substring and the pattern to parse it with.
/// Suffixed archives carry the timestamp as the last 19 characters of the
/// stem; bare segments are the timestamp in full.
fn timestamp_candidate(segment: &str) -> Option<(&str, &'static str)> {
    for rule in FORMAT_RULES {
        match rule.suffix {
            Some(suffix) => {
                if let Some(stem) = segment.strip_suffix(suffix) {
                    let start = stem.len().saturating_sub(TIMESTAMP_LEN);
                    return stem.get(start..).map(|candidate| (candidate, rule.pattern));
                }
            }
            None => return Some((segment, rule.pattern)),
        }
    }
    None
}

/// Parse one raw bucket key of the form `<prefix>/<app_name>/<filename>`.
/// Malformed keys and unparseable timestamps yield an invalid record rather
/// than an error; the caller skips those.
pub fn parse_key(raw_key: &str) -> ParsedBackupRecord {
    let segments: Vec<&str> = raw_key.split('/').collect();
    let app_name = segments.get(1).copied().unwrap_or_default().to_string();

    if segments.len() < 3 {
        return ParsedBackupRecord::invalid(app_name);
    }

    let date_segment = segments[2];
    if date_segment.is_empty() {
        return ParsedBackupRecord::invalid(app_name);
    }

    let Some((candidate, pattern)) = timestamp_candidate(date_segment) else {
        tracing::warn!("Date '{}' didn't parse on {}", date_segment, app_name);
        return ParsedBackupRecord::invalid(app_name);
    };

    match NaiveDateTime::parse_from_str(candidate, pattern) {
        Ok(timestamp) => ParsedBackupRecord {
            app_name,
            timestamp: Some(timestamp),
        },
        Err(_) => {
            tracing::warn!("Date '{}' didn't parse on {}", candidate, app_name);
            ParsedBackupRecord::invalid(app_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_tgz_key() {
        let record = parse_key("backups/web/web-2024-01-01-12-30-45.tgz");
        assert_eq!(record.app_name, "web");
        assert_eq!(record.timestamp, Some(ts(2024, 1, 1, 12, 30, 45)));
        assert!(record.is_valid());
    }

    #[test]
    fn test_parse_tgz_key_bare_timestamp_filename() {
        let record = parse_key("backups/web/2024-01-01-00-00-00.tgz");
        assert_eq!(record.timestamp, Some(ts(2024, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_parse_dotted_key() {
        let record = parse_key("backups/db/2023.12.31.23.59.59");
        assert_eq!(record.app_name, "db");
        assert_eq!(record.timestamp, Some(ts(2023, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn test_unparseable_timestamp_keeps_app_name() {
        let record = parse_key("backups/db/not-a-date.tgz");
        assert_eq!(record.app_name, "db");
        assert!(!record.is_valid());
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_unparseable_dotted_segment() {
        let record = parse_key("backups/db/garbage");
        assert!(!record.is_valid());
    }

    #[test]
    fn test_empty_date_segment() {
        let record = parse_key("backups/web/");
        assert_eq!(record.app_name, "web");
        assert!(!record.is_valid());
    }

    #[test]
    fn test_too_few_segments() {
        assert!(!parse_key("backups").is_valid());
        assert!(!parse_key("backups/web").is_valid());
        assert!(!parse_key("").is_valid());
    }

    #[test]
    fn test_out_of_range_date_field() {
        let record = parse_key("backups/web/2024-13-01-00-00-00.tgz");
        assert!(!record.is_valid());
    }

    #[test]
    fn test_short_tgz_stem() {
        let record = parse_key("backups/web/x.tgz");
        assert!(!record.is_valid());
    }
}
