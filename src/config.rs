use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CwConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Short sha length used in labels and titles
    #[serde(default = "default_short_sha")]
    pub short_sha: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Page size for branch history fetches
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_short_sha() -> usize {
    7
}

fn default_page_size() -> usize {
    32
}

impl Default for CwConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            short_sha: default_short_sha(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Load config by merging global defaults with per-repo overrides.
/// Priority: per-repo `.cw.toml` > global `~/.config/cw/config.toml` >
/// built-in defaults. Merging is deep: fields within sections override
/// independently.
pub fn load_config(repo_root: &Path) -> CwConfig {
    let local_path = repo_root.join(".cw.toml");
    let global_path = dirs::config_dir().map(|d| d.join("cw/config.toml"));

    let global_table = global_path
        .and_then(|p| std::fs::read_to_string(p).ok())
        .and_then(|c| c.parse::<toml::Value>().ok())
        .and_then(|v| match v {
            toml::Value::Table(t) => Some(t),
            _ => None,
        });

    let local_table = std::fs::read_to_string(&local_path)
        .ok()
        .and_then(|c| c.parse::<toml::Value>().ok())
        .and_then(|v| match v {
            toml::Value::Table(t) => Some(t),
            _ => None,
        });

    let merged = match (global_table, local_table) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return CwConfig::default(),
    };

    merged.try_into().unwrap_or_default()
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables
/// are merged recursively.
fn deep_merge(
    base: &mut toml::map::Map<String, toml::Value>,
    overlay: toml::map::Map<String, toml::Value>,
) {
    for (key, value) in overlay {
        match (base.get_mut(&key), &value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table.clone());
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(s: &str) -> toml::map::Map<String, toml::Value> {
        match s.parse::<toml::Value>().unwrap() {
            toml::Value::Table(t) => t,
            _ => panic!("not a table"),
        }
    }

    #[test]
    fn defaults_are_sane() {
        let cfg = CwConfig::default();
        assert_eq!(cfg.display.short_sha, 7);
        assert_eq!(cfg.log.page_size, 32);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: CwConfig = toml::from_str("[display]\nshort_sha = 10\n").unwrap();
        assert_eq!(cfg.display.short_sha, 10);
        assert_eq!(cfg.log.page_size, 32);
    }

    #[test]
    fn deep_merge_overrides_fields_independently() {
        let mut base = table("[display]\nshort_sha = 7\n[log]\npage_size = 32\n");
        let overlay = table("[log]\npage_size = 64\n");
        deep_merge(&mut base, overlay);

        let cfg: CwConfig = toml::Value::Table(base).try_into().unwrap();
        assert_eq!(cfg.display.short_sha, 7);
        assert_eq!(cfg.log.page_size, 64);
    }

    #[test]
    fn load_config_reads_local_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".cw.toml"), "[display]\nshort_sha = 12\n").unwrap();
        let cfg = load_config(dir.path());
        assert_eq!(cfg.display.short_sha, 12);
    }
}
