//! Hardened baseline configuration
//!
//! Every load starts from a freshly built copy of these values; nothing is
//! cached between calls.

use super::schema::Config;
use std::path::PathBuf;

/// Version of the oz tooling, informational only
pub const OZ_VERSION: &str = "0.0.1";

/// Location of the daemon configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/oz/oz.conf";

/// Baseline configuration every loaded file is merged onto
pub fn defaults() -> Config {
    Config {
        profile_dir: PathBuf::from("/var/lib/oz/cells.d"),
        shell_path: PathBuf::from("/bin/bash"),
        prefix_path: PathBuf::from("/usr/local"),
        sandbox_path: PathBuf::from("/srv/oz"),
        bridge_mac: "6A:A8:2E:56:E8:9C".to_string(),
        divert_suffix: "unsafe".to_string(),
        nm_ignore_file: PathBuf::from("/etc/NetworkManager/conf.d/oz.conf"),
        use_full_dev: false,
        allow_root_shell: false,
        log_xpra: false,
        environment_vars: ["USER", "USERNAME", "LOGNAME", "LANG", "LANGUAGE", "_"]
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

impl Default for Config {
    fn default() -> Self {
        defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::FIELDS;

    #[test]
    fn test_defaults_are_locked_down() {
        let config = defaults();
        assert!(!config.use_full_dev);
        assert!(!config.allow_root_shell);
        assert!(!config.log_xpra);
        assert_eq!(config.divert_suffix, "unsafe");
        assert_eq!(config.sandbox_path, PathBuf::from("/srv/oz"));
    }

    #[test]
    fn test_defaults_fresh_per_call() {
        let mut first = defaults();
        first.environment_vars.push("HOME".to_string());
        first.allow_root_shell = true;

        let second = defaults();
        assert_eq!(second.environment_vars.len(), 6);
        assert!(!second.allow_root_shell);
        assert_eq!(Config::default(), second);
    }

    #[test]
    fn test_serialized_keys_match_fields() {
        let value = serde_json::to_value(defaults()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let mut expected: Vec<&str> = FIELDS.iter().map(|(key, _)| *key).collect();
        expected.sort_unstable();
        let mut keys = keys;
        keys.sort_unstable();
        assert_eq!(keys, expected);
    }
}
