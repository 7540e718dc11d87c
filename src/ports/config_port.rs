//! Configuration access port trait.

use std::path::PathBuf;
use std::time::Duration;

/// Typed lookups into the sectioned settings file.
///
/// Numeric and boolean getters fall back to `default` when the key is absent
/// or does not parse. The provided methods build the wizard's own value types
/// on top of the four primitive getters.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// A whole number of milliseconds. Negative values clamp to zero.
    fn get_millis(&self, section: &str, key: &str, default: Duration) -> Duration {
        let default_ms = i64::try_from(default.as_millis()).unwrap_or(i64::MAX);
        let ms = self.get_int(section, key, default_ms);
        Duration::from_millis(ms.max(0) as u64)
    }

    /// A ticker symbol, trimmed and upper-cased. Blank counts as absent.
    fn get_ticker(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
    }

    /// A file path. Blank counts as absent.
    fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}
