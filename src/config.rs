//! Viewer configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--sort`, `--descending`, `--variant`)
//! 2. `$STV_CONFIG` environment variable (path to config file)
//! 3. Project-local `.stv.toml` in the current working directory
//! 4. Global `~/.config/stv/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::compare::direction::SyncVariant;
use crate::error::{AppError, Result};
use crate::view::sort::{SortColumn, SortSpec};

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

/// Tree grid settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ViewConfig {
    /// Sort column: "name", "count", "bytes".
    pub sort_by: Option<String>,
    /// Sort direction; unset means the column's natural direction.
    pub ascending: Option<bool>,
    /// Show the percentage bar column.
    pub show_percentage: Option<bool>,
}

/// Initial filter settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    /// Toggle family: "category" or "action".
    pub mode: Option<String>,
    /// Show items excluded from synchronization.
    pub show_inactive: Option<bool>,
}

/// Sync direction settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// "two-way", "mirror" or "update".
    pub variant: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level viewer configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub view: ViewConfig,
    pub filter: FilterConfig,
    pub sync: SyncConfig,
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("STV_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".stv.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("stv").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (the latter is logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`: `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: other.general.mouse.or(self.general.mouse),
            },
            view: ViewConfig {
                sort_by: other.view.sort_by.clone().or(self.view.sort_by),
                ascending: other.view.ascending.or(self.view.ascending),
                show_percentage: other.view.show_percentage.or(self.view.show_percentage),
            },
            filter: FilterConfig {
                mode: other.filter.mode.clone().or(self.filter.mode),
                show_inactive: other.filter.show_inactive.or(self.filter.show_inactive),
            },
            sync: SyncConfig {
                variant: other.sync.variant.clone().or(self.sync.variant),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so that the env var path wins.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            match load_file(cli_path) {
                Some(file_cfg) => config = config.merge(&file_cfg),
                None => tracing::warn!(path = %cli_path.display(), "--config file not loaded"),
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    /// Reject names that the getters below would silently replace.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.view.sort_by.as_deref() {
            if SortColumn::parse(name).is_none() {
                return Err(AppError::Config(format!("unknown sort column '{name}'")));
            }
        }
        if let Some(name) = self.sync.variant.as_deref() {
            if SyncVariant::parse(name).is_none() {
                return Err(AppError::Config(format!("unknown sync variant '{name}'")));
            }
        }
        if let Some(mode) = self.filter.mode.as_deref() {
            if !matches!(mode, "category" | "action") {
                return Err(AppError::Config(format!("unknown filter mode '{mode}'")));
            }
        }
        Ok(())
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    /// Sort column; unknown names fall back to bytes.
    pub fn sort_column(&self) -> SortColumn {
        self.view
            .sort_by
            .as_deref()
            .and_then(SortColumn::parse)
            .unwrap_or(SortColumn::Bytes)
    }

    pub fn sort_spec(&self) -> SortSpec {
        let column = self.sort_column();
        SortSpec {
            column,
            ascending: self.view.ascending.unwrap_or(column.default_ascending()),
        }
    }

    pub fn show_percentage(&self) -> bool {
        self.view.show_percentage.unwrap_or(true)
    }

    /// Filter family: "category" or "action".
    pub fn filter_mode(&self) -> &str {
        self.filter.mode.as_deref().unwrap_or("category")
    }

    pub fn show_inactive(&self) -> bool {
        self.filter.show_inactive.unwrap_or(true)
    }

    /// Direction preset; unknown names fall back to two-way.
    pub fn sync_variant(&self) -> SyncVariant {
        self.sync
            .variant
            .as_deref()
            .and_then(SyncVariant::parse)
            .unwrap_or_default()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(cfg.mouse_enabled());
        assert_eq!(cfg.sort_column(), SortColumn::Bytes);
        assert_eq!(cfg.sort_spec(), SortSpec::default());
        assert!(cfg.show_percentage());
        assert_eq!(cfg.filter_mode(), "category");
        assert!(cfg.show_inactive());
        assert_eq!(cfg.sync_variant(), SyncVariant::TwoWay);
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
mouse = false

[view]
sort_by = "name"
ascending = false
show_percentage = false

[filter]
mode = "action"
show_inactive = false

[sync]
variant = "mirror"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(!cfg.mouse_enabled());
        assert_eq!(
            cfg.sort_spec(),
            SortSpec {
                column: SortColumn::Name,
                ascending: false
            }
        );
        assert!(!cfg.show_percentage());
        assert_eq!(cfg.filter_mode(), "action");
        assert!(!cfg.show_inactive());
        assert_eq!(cfg.sync_variant(), SyncVariant::Mirror);
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[view]
sort_by = "name"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        // Name sorts ascending unless told otherwise
        assert!(cfg.sort_spec().ascending);
        assert!(cfg.show_percentage());
        assert_eq!(cfg.filter_mode(), "category");
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let toml = r#"
[view]
sort_by = "modified"

[sync]
variant = "sideways"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.sort_column(), SortColumn::Bytes);
        assert_eq!(cfg.sync_variant(), SyncVariant::TwoWay);
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let known: AppConfig = toml::from_str(
            r#"
[view]
sort_by = "size"

[filter]
mode = "action"

[sync]
variant = "mirror"
"#,
        )
        .expect("parse failed");
        assert!(known.validate().is_ok());

        let bad_variant: AppConfig = toml::from_str("[sync]\nvariant = \"sideways\"\n").expect("parse failed");
        let err = bad_variant.validate().unwrap_err();
        assert_eq!(err.to_string(), "Config error: unknown sync variant 'sideways'");

        let bad_mode: AppConfig = toml::from_str("[filter]\nmode = \"size\"\n").expect("parse failed");
        assert!(matches!(bad_mode.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            view: ViewConfig {
                sort_by: Some("count".into()),
                show_percentage: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let over = AppConfig {
            view: ViewConfig {
                sort_by: Some("name".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.sort_column(), SortColumn::Name); // overridden
        assert!(!merged.show_percentage()); // from base
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            filter: FilterConfig {
                mode: Some("action".into()),
                show_inactive: Some(false),
            },
            ..Default::default()
        };

        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.filter_mode(), "action");
        assert!(!merged.show_inactive());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[view]
sort_by = "count"

[sync]
variant = "update"
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert_eq!(cfg.sort_column(), SortColumn::ItemCount);
        assert_eq!(cfg.sync_variant(), SyncVariant::Update);
        assert!(cfg.mouse_enabled());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[view]
sort_by = "count"
show_percentage = false
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            view: ViewConfig {
                sort_by: Some("name".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert_eq!(cfg.sort_column(), SortColumn::Name);
        assert!(!cfg.show_percentage());
    }
}
