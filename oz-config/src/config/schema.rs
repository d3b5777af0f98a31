//! Configuration schema types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Keys of the configuration file with a short description of each, in
/// declaration order
pub const FIELDS: &[(&str, &str)] = &[
    ("profile_dir", "Directory containing the sandbox profiles"),
    ("shell_path", "Path of the shell used when entering a sandbox"),
    ("prefix_path", "Prefix path containing the oz executables"),
    ("sandbox_path", "Path of the sandboxes base"),
    ("bridge_mac", "MAC Address of the bridge interface"),
    ("divert_suffix", "Suffix using for dpkg-divert of application executables"),
    (
        "nm_ignore_file",
        "Path to the NetworkManager ignore config file, disables the warning if empty",
    ),
    (
        "use_full_dev",
        "Give sandboxes full access to devices instead of a restricted set",
    ),
    ("allow_root_shell", "Allow entering a sandbox shell as root"),
    ("log_xpra", "Log output of Xpra"),
    (
        "environment_vars",
        "Default environment variables passed to sandboxes",
    ),
];

/// Daemon configuration consumed by the sandboxing service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub profile_dir: PathBuf,
    pub shell_path: PathBuf,
    pub prefix_path: PathBuf,
    pub sandbox_path: PathBuf,
    /// Colon-separated hex, passed through unchecked
    pub bridge_mac: String,
    pub divert_suffix: String,
    /// Empty disables the NetworkManager warning
    pub nm_ignore_file: PathBuf,
    pub use_full_dev: bool,
    pub allow_root_shell: bool,
    pub log_xpra: bool,
    /// Propagated into sandboxes in this order
    pub environment_vars: Vec<String>,
}

/// One row of [`Config::describe`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub key: &'static str,
    pub description: &'static str,
    pub value: String,
}

impl Config {
    /// NetworkManager ignore file, or `None` when the integration is disabled
    pub fn nm_ignore_file(&self) -> Option<&Path> {
        if self.nm_ignore_file.as_os_str().is_empty() {
            None
        } else {
            Some(&self.nm_ignore_file)
        }
    }

    /// Render the value stored under a file key
    pub fn value_of(&self, key: &str) -> Option<String> {
        serde_json::to_value(self).ok()?.get(key).map(render_value)
    }

    /// Every field with its description and current value
    pub fn describe(&self) -> Vec<FieldRow> {
        let Ok(values) = serde_json::to_value(self) else {
            return Vec::new();
        };
        FIELDS
            .iter()
            .filter_map(|&(key, description)| {
                values.get(key).map(|value| FieldRow {
                    key,
                    description,
                    value: render_value(value),
                })
            })
            .collect()
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Configuration as it appears in a file: every field optional
///
/// Only the fields present in the source are applied on top of a base
/// configuration. Unknown keys are ignored. `null` counts as absent, except
/// for `environment_vars` where it clears the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub profile_dir: Option<PathBuf>,
    pub shell_path: Option<PathBuf>,
    pub prefix_path: Option<PathBuf>,
    pub sandbox_path: Option<PathBuf>,
    pub bridge_mac: Option<String>,
    pub divert_suffix: Option<String>,
    pub nm_ignore_file: Option<PathBuf>,
    pub use_full_dev: Option<bool>,
    pub allow_root_shell: Option<bool>,
    pub log_xpra: Option<bool>,
    #[serde(deserialize_with = "null_as_empty")]
    pub environment_vars: Option<Vec<String>>,
}

/// Only called when the key is present, so `null` means an explicit empty list
fn null_as_empty<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default()))
}

impl PartialConfig {
    /// Overwrite the fields of `base` that are present here
    pub fn apply(self, mut base: Config) -> Config {
        if let Some(v) = self.profile_dir {
            base.profile_dir = v;
        }
        if let Some(v) = self.shell_path {
            base.shell_path = v;
        }
        if let Some(v) = self.prefix_path {
            base.prefix_path = v;
        }
        if let Some(v) = self.sandbox_path {
            base.sandbox_path = v;
        }
        if let Some(v) = self.bridge_mac {
            base.bridge_mac = v;
        }
        if let Some(v) = self.divert_suffix {
            base.divert_suffix = v;
        }
        if let Some(v) = self.nm_ignore_file {
            base.nm_ignore_file = v;
        }
        if let Some(v) = self.use_full_dev {
            base.use_full_dev = v;
        }
        if let Some(v) = self.allow_root_shell {
            base.allow_root_shell = v;
        }
        if let Some(v) = self.log_xpra {
            base.log_xpra = v;
        }
        if let Some(v) = self.environment_vars {
            base.environment_vars = v;
        }
        base
    }

    /// Keys that will override the base when applied
    pub fn present_keys(&self) -> Vec<&'static str> {
        let present = [
            self.profile_dir.is_some(),
            self.shell_path.is_some(),
            self.prefix_path.is_some(),
            self.sandbox_path.is_some(),
            self.bridge_mac.is_some(),
            self.divert_suffix.is_some(),
            self.nm_ignore_file.is_some(),
            self.use_full_dev.is_some(),
            self.allow_root_shell.is_some(),
            self.log_xpra.is_some(),
            self.environment_vars.is_some(),
        ];
        FIELDS
            .iter()
            .zip(present)
            .filter_map(|(&(key, _), is_present)| is_present.then_some(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::defaults;

    #[test]
    fn test_empty_partial_keeps_base() {
        let merged = PartialConfig::default().apply(defaults());
        assert_eq!(merged, defaults());
    }

    #[test]
    fn test_partial_overrides_only_present_fields() {
        let partial = PartialConfig {
            shell_path: Some(PathBuf::from("/bin/zsh")),
            log_xpra: Some(true),
            ..Default::default()
        };
        assert_eq!(partial.present_keys(), vec!["shell_path", "log_xpra"]);

        let merged = partial.apply(defaults());
        let mut expected = defaults();
        expected.shell_path = PathBuf::from("/bin/zsh");
        expected.log_xpra = true;
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_environment_vars_replaced_in_order() {
        let partial: PartialConfig =
            serde_json::from_str(r#"{"environment_vars": ["TERM", "LANG", "TERM"]}"#).unwrap();
        let merged = partial.apply(defaults());
        assert_eq!(merged.environment_vars, vec!["TERM", "LANG", "TERM"]);
    }

    #[test]
    fn test_unknown_keys_and_nulls_ignored() {
        let partial: PartialConfig =
            serde_json::from_str(r#"{"no_such_key": 1, "shell_path": null}"#).unwrap();
        assert_eq!(partial, PartialConfig::default());
    }

    #[test]
    fn test_null_environment_vars_is_present_and_empty() {
        let partial: PartialConfig =
            serde_json::from_str(r#"{"environment_vars": null}"#).unwrap();
        assert_eq!(partial.environment_vars, Some(vec![]));
        assert_eq!(partial.present_keys(), vec!["environment_vars"]);
        assert!(partial.apply(defaults()).environment_vars.is_empty());

        let absent: PartialConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.environment_vars, None);
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let result: std::result::Result<PartialConfig, _> =
            serde_json::from_str(r#"{"use_full_dev": "yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_nm_ignore_file_empty_disables() {
        let mut config = defaults();
        assert!(config.nm_ignore_file().is_some());
        config.nm_ignore_file = PathBuf::new();
        assert_eq!(config.nm_ignore_file(), None);
    }

    #[test]
    fn test_describe_covers_every_field() {
        let rows = defaults().describe();
        assert_eq!(rows.len(), FIELDS.len());
        assert_eq!(rows[1].key, "shell_path");
        assert_eq!(rows[1].value, "/bin/bash");
        let env = rows.iter().find(|r| r.key == "environment_vars").unwrap();
        assert_eq!(env.value, "USER, USERNAME, LOGNAME, LANG, LANGUAGE, _");
        let flag = rows.iter().find(|r| r.key == "use_full_dev").unwrap();
        assert_eq!(flag.value, "false");
    }

    #[test]
    fn test_value_of() {
        let config = defaults();
        assert_eq!(config.value_of("sandbox_path").as_deref(), Some("/srv/oz"));
        assert_eq!(config.value_of("allow_root_shell").as_deref(), Some("false"));
        assert_eq!(config.value_of("no_such_key"), None);
    }
}
