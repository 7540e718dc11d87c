//! INI file configuration adapter.

use crate::domain::error::StockproError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

/// Sections the wizard reads. Anything else in the file is ignored.
pub const KNOWN_SECTIONS: [&str; 4] = ["sizing", "wizard", "journal", "validation"];

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
    source: String,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StockproError> {
        let source = path.as_ref().display().to_string();
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|reason| StockproError::ConfigParse {
                file: source.clone(),
                reason,
            })?;
        Ok(Self::loaded(config, source))
    }

    pub fn from_string(content: &str) -> Result<Self, StockproError> {
        let source = "<string>".to_string();
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| StockproError::ConfigParse {
                file: source.clone(),
                reason,
            })?;
        Ok(Self::loaded(config, source))
    }

    fn loaded(config: Ini, source: String) -> Self {
        let adapter = Self { config, source };
        for section in adapter.unknown_sections() {
            tracing::warn!(source = %adapter.source, %section, "ignoring unknown config section");
        }
        tracing::debug!(source = %adapter.source, "config loaded");
        adapter
    }

    /// Where the settings were read from: a file path, or `<string>`.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Sections present in the file that the wizard never reads, sorted.
    pub fn unknown_sections(&self) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .config
            .sections()
            .into_iter()
            .filter(|s| !s.is_empty() && !KNOWN_SECTIONS.contains(&s.as_str()))
            .collect();
        unknown.sort();
        unknown
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[sizing]
risk_fraction = 0.01
reward_risk = 2

[wizard]
default_capital = 250000
default_stock = HDFCBANK
analyzing_ms = 0

[journal]
output = /var/tmp/trades.csv

[validation]
strict = on
"#;

    #[test]
    fn reads_all_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_double("sizing", "risk_fraction", 0.0), 0.01);
        assert_eq!(adapter.get_double("sizing", "reward_risk", 0.0), 2.0);
        assert_eq!(adapter.get_int("wizard", "analyzing_ms", 99), 0);
        assert_eq!(
            adapter.get_string("wizard", "default_stock"),
            Some("HDFCBANK".to_string())
        );
        assert_eq!(
            adapter.get_string("journal", "output"),
            Some("/var/tmp/trades.csv".to_string())
        );
        assert!(adapter.get_bool("validation", "strict", false));
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("wizard", "missing"), None);
        assert_eq!(adapter.get_string("nope", "key"), None);
        assert_eq!(adapter.get_int("wizard", "missing", 7), 7);
        assert_eq!(adapter.get_double("sizing", "missing", 1.5), 1.5);
        assert!(!adapter.get_bool("validation", "missing", false));
    }

    #[test]
    fn unparsable_values_fall_back() {
        let adapter = FileConfigAdapter::from_string(
            "[sizing]\nrisk_fraction = lots\n[wizard]\nanalyzing_ms = soon\n[validation]\nstrict = maybe\n",
        )
        .unwrap();
        assert_eq!(adapter.get_double("sizing", "risk_fraction", 0.01), 0.01);
        assert_eq!(adapter.get_int("wizard", "analyzing_ms", 1000), 1000);
        assert!(adapter.get_bool("validation", "strict", true));
    }

    #[test]
    fn bool_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[v]\na = yes\nb = 1\nc = TRUE\nd = no\ne = 0\nf = off\n",
        )
        .unwrap();
        for key in ["a", "b", "c"] {
            assert!(adapter.get_bool("v", key, false), "{key}");
        }
        for key in ["d", "e", "f"] {
            assert!(!adapter.get_bool("v", key, true), "{key}");
        }
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_double("wizard", "default_capital", 0.0), 250_000.0);
        assert_eq!(adapter.source(), file.path().display().to_string());
        assert_eq!(
            adapter.get_millis("wizard", "analyzing_ms", Duration::from_secs(1)),
            Duration::ZERO
        );
        assert_eq!(adapter.get_ticker("wizard", "default_stock"), Some("HDFCBANK".into()));
    }

    #[test]
    fn misspelled_sections_are_reported() {
        let adapter =
            FileConfigAdapter::from_string("[sizng]\nrisk_fraction = 0.5\n[Journal]\noutput = a.csv\n[extra]\n")
                .unwrap();
        assert_eq!(adapter.source(), "<string>");
        assert_eq!(adapter.unknown_sections(), vec!["extra", "sizng"]);
        // section names are case-insensitive
        assert_eq!(adapter.get_path("journal", "output"), Some("a.csv".into()));
        assert_eq!(adapter.get_double("sizing", "risk_fraction", 0.01), 0.01);
    }

    #[test]
    fn known_sections_only_is_clean() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert!(adapter.unknown_sections().is_empty());
    }

    #[test]
    fn from_file_missing_is_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/stockpro.ini").unwrap_err();
        assert!(matches!(err, StockproError::ConfigParse { file, .. } if file.contains("stockpro.ini")));
    }
}
