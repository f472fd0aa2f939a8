//! Log line formats.

use crate::error::ConfigError;
use crate::labels::LabelPool;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A synthetic log line format, selected per stream by the `format` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Apache common log format
    ApacheCommon,
    /// Apache combined log format (common + referrer and user agent)
    ApacheCombined,
    /// Apache error log format
    ApacheError,
    /// BSD syslog
    Rfc3164,
    /// Syslog with version, message id and structured data
    Rfc5424,
    /// NCSA common log format
    CommonLog,
    /// Flat JSON object with access log fields
    Json,
    /// key=value pairs with access log fields
    Logfmt,
}

impl LogFormat {
    /// Every supported format.
    pub const ALL: [LogFormat; 8] = [
        LogFormat::ApacheCommon,
        LogFormat::ApacheCombined,
        LogFormat::ApacheError,
        LogFormat::Rfc3164,
        LogFormat::Rfc5424,
        LogFormat::CommonLog,
        LogFormat::Json,
        LogFormat::Logfmt,
    ];

    /// Identifier used in the `format` label.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::ApacheCommon => "apache_common",
            LogFormat::ApacheCombined => "apache_combined",
            LogFormat::ApacheError => "apache_error",
            LogFormat::Rfc3164 => "rfc3164",
            LogFormat::Rfc5424 => "rfc5424",
            LogFormat::CommonLog => "common_log",
            LogFormat::Json => "json",
            LogFormat::Logfmt => "logfmt",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
    }
}

/// The immutable set of formats a generator accepts.
///
/// Owned by each generator instance rather than shared globally, so
/// instances can restrict their formats independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownFormats {
    formats: Vec<LogFormat>,
}

impl Default for KnownFormats {
    fn default() -> Self {
        Self::new(LogFormat::ALL)
    }
}

impl KnownFormats {
    pub fn new(formats: impl IntoIterator<Item = LogFormat>) -> Self {
        let mut formats: Vec<_> = formats.into_iter().collect();
        formats.sort();
        formats.dedup();
        Self { formats }
    }

    /// Look up a format identifier.
    pub fn lookup(&self, name: &str) -> Option<LogFormat> {
        self.formats.iter().copied().find(|f| f.as_str() == name)
    }

    pub fn contains(&self, format: LogFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Resolve a format identifier, failing on anything outside the set.
    pub fn validate(&self, name: &str) -> Result<LogFormat, ConfigError> {
        self.lookup(name)
            .ok_or_else(|| ConfigError::UnknownFormat(name.to_string()))
    }

    /// Check that every `format` candidate of a pool is known.
    pub fn validate_pool(&self, pool: &LabelPool) -> Result<(), ConfigError> {
        for value in pool.format_values() {
            self.validate(value)?;
        }
        Ok(())
    }

    /// Format identifiers in this set.
    pub fn names(&self) -> Vec<&'static str> {
        self.formats.iter().map(LogFormat::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = LogFormat> + '_ {
        self.formats.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_formats() {
        for format in LogFormat::ALL {
            assert_eq!(format.as_str().parse::<LogFormat>().unwrap(), format);
        }
        assert!(matches!(
            "syslog".parse::<LogFormat>(),
            Err(ConfigError::UnknownFormat(name)) if name == "syslog"
        ));
    }

    #[test]
    fn test_serde_names_match_labels() {
        for format in LogFormat::ALL {
            let yaml = serde_yaml::to_string(&format).unwrap();
            assert_eq!(yaml.trim(), format.as_str());
        }
    }

    #[test]
    fn test_restricted_set() {
        let formats = KnownFormats::new([LogFormat::Json, LogFormat::Logfmt, LogFormat::Json]);
        assert_eq!(formats.names(), vec!["json", "logfmt"]);
        assert_eq!(formats.lookup("json"), Some(LogFormat::Json));
        assert_eq!(formats.lookup("rfc3164"), None);
        assert!(formats.validate("rfc3164").is_err());
    }

    #[test]
    fn test_validate_pool() {
        let formats = KnownFormats::default();
        let good = LabelPool::from_slices(&[("format", &["json", "rfc5424"])]).unwrap();
        assert!(formats.validate_pool(&good).is_ok());

        let bad = LabelPool::from_slices(&[("format", &["json", "nginx"])]).unwrap();
        assert!(matches!(
            formats.validate_pool(&bad),
            Err(ConfigError::UnknownFormat(name)) if name == "nginx"
        ));
    }
}
