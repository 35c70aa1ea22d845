use std::path::{Path, PathBuf};

pub const LOG_ENV: &str = "GRADECALCD_LOG";
pub const EXPORT_DIR_ENV: &str = "GRADECALCD_EXPORT_DIR";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_filter: String,
    pub export_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            log_filter: non_empty(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            export_dir: non_empty(EXPORT_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Relative export paths land under the configured export directory, or
    /// the working directory when none is set. The result is absolute.
    pub fn resolve_export_path(&self, out_path: &str) -> PathBuf {
        let p = Path::new(out_path);
        let joined = match &self.export_dir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p.to_path_buf(),
        };
        std::path::absolute(&joined).unwrap_or(joined)
    }
}
