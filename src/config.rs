use std::env;
use std::fmt;
use std::path::PathBuf;

/// Public survey export used when `SALARY_DASH_SOURCE` is unset.
pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

/// Role whose per-country mean salary is mapped by default.
pub const DEFAULT_TARGET_ROLE: &str = "Data Scientist";

/// Number of role groups kept by the top-roles view.
pub const TOP_ROLES: usize = 10;

/// Fixed bin count of the salary distribution view.
pub const HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where the survey is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// Classify a location string: `http://` / `https://` is a URL, anything
    /// else is a filesystem path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Lower-cased extension of the path, or of the URL path with any query
    /// string and fragment stripped.
    pub fn extension(&self) -> Option<String> {
        let name = match self {
            DataSource::Path(p) => p.file_name()?.to_str()?.to_string(),
            DataSource::Url(u) => {
                let no_query = u.split(['?', '#']).next().unwrap_or(u);
                let after_scheme = no_query.split_once("://").map_or(no_query, |(_, rest)| rest);
                // The host is never a file name.
                let (_, path) = after_scheme.split_once('/')?;
                path.rsplit('/').next()?.to_string()
            }
        };
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(u) => write!(f, "{u}"),
            DataSource::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Snapshot of the configuration read once at startup.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
}

impl DashboardConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        fn env_or(key: &str, default: &str) -> String {
            env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            source: DataSource::parse(&env_or("SALARY_DASH_SOURCE", DEFAULT_SOURCE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_and_path() {
        assert_eq!(
            DataSource::parse("https://example.com/data.csv"),
            DataSource::Url("https://example.com/data.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("HTTP://example.com/x"),
            DataSource::Url("HTTP://example.com/x".to_string())
        );
        assert_eq!(
            DataSource::parse(" data/survey.csv "),
            DataSource::Path(PathBuf::from("data/survey.csv"))
        );
    }

    #[test]
    fn test_extension_of_path() {
        let src = DataSource::parse("data/Survey.PARQUET");
        assert_eq!(src.extension().as_deref(), Some("parquet"));
        assert_eq!(DataSource::parse("data/noext").extension(), None);
    }

    #[test]
    fn test_extension_of_url_ignores_query() {
        let src = DataSource::parse("https://host/path/file.tsv?token=abc#frag");
        assert_eq!(src.extension().as_deref(), Some("tsv"));
        assert_eq!(DataSource::parse("https://host/download").extension(), None);
        assert_eq!(DataSource::parse("https://example.com").extension(), None);
    }

    #[test]
    fn test_default_source_is_csv_url() {
        let src = DataSource::parse(DEFAULT_SOURCE);
        assert!(matches!(src, DataSource::Url(_)));
        assert_eq!(src.extension().as_deref(), Some("csv"));
    }
}
