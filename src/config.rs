use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::keygen::KeyStrategy;

pub const CONFIG_FILE_NAME: &str = ".i18nizerc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default)]
    pub ignore_texts: Vec<String>,
    #[serde(default = "default_locales_root")]
    pub locales_root: String,
    #[serde(default = "default_source_locale")]
    pub source_locale: String,
    #[serde(default = "default_target_locale")]
    pub target_locale: String,
    #[serde(default)]
    pub key_strategy: KeyStrategy,
    #[serde(default = "default_hook_name")]
    pub hook_name: String,
    #[serde(default = "default_hook_module")]
    pub hook_module: String,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_locales_root() -> String {
    "./".to_string()
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_target_locale() -> String {
    "he".to_string()
}

fn default_hook_name() -> String {
    "useTranslation".to_string()
}

fn default_hook_module() -> String {
    "react-i18next".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            ignore_test_files: default_ignore_test_files(),
            ignore_texts: Vec::new(),
            locales_root: default_locales_root(),
            source_locale: default_source_locale(),
            target_locale: default_target_locale(),
            key_strategy: KeyStrategy::default(),
            hook_name: default_hook_name(),
            hook_module: default_hook_module(),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns in `ignores` or `includes`, unusable
    /// locale names, and a hook name that cannot be imported.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal paths, so `app/[locale]` is
        // valid without escaping.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for (field, locale) in [
            ("sourceLocale", &self.source_locale),
            ("targetLocale", &self.target_locale),
        ] {
            if locale.trim().is_empty() || locale.contains(['/', '\\']) {
                bail!("Invalid locale in '{}': \"{}\"", field, locale);
            }
        }
        if self.source_locale == self.target_locale {
            bail!(
                "'sourceLocale' and 'targetLocale' must differ (both are \"{}\")",
                self.source_locale
            );
        }

        if !is_identifier(&self.hook_name) {
            bail!("Invalid 'hookName': \"{}\" is not an identifier", self.hook_name);
        }
        if self.hook_module.trim().is_empty() {
            bail!("'hookModule' must not be empty");
        }

        Ok(())
    }

    pub fn source_table_path(&self, base_dir: &Path) -> PathBuf {
        base_dir
            .join(&self.locales_root)
            .join(format!("{}.json", self.source_locale))
    }

    pub fn target_table_path(&self, base_dir: &Path) -> PathBuf {
        base_dir
            .join(&self.locales_root)
            .join(format!("{}.json", self.target_locale))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// The file the config was read from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ignores.is_empty());
        assert_eq!(config.includes, vec!["src"]);
        assert_eq!(config.source_locale, "en");
        assert_eq!(config.target_locale, "he");
        assert_eq!(config.key_strategy, KeyStrategy::CamelCase);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "ignores": ["**/dist/**"],
              "includes": ["app"],
              "localesRoot": "./public/locales",
              "targetLocale": "fr",
              "keyStrategy": "componentSlug",
              "ignoreTexts": ["OK"]
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(config.includes, vec!["app"]);
        assert_eq!(config.locales_root, "./public/locales");
        assert_eq!(config.target_locale, "fr");
        assert_eq!(config.key_strategy, KeyStrategy::ComponentSlug);
        assert_eq!(config.ignore_texts, vec!["OK"]);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "ignores": ["**/dist/**"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(config.includes, default_includes());
        assert_eq!(config.hook_name, "useTranslation");
        assert_eq!(config.hook_module, "react-i18next");
    }

    #[test]
    fn test_unknown_key_strategy_is_rejected() {
        let json = r#"{ "keyStrategy": "hash" }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn test_table_paths() {
        let config = Config {
            locales_root: "locales".to_string(),
            ..Default::default()
        };
        let base = Path::new("/project");
        assert_eq!(
            config.source_table_path(base),
            Path::new("/project/locales/en.json")
        );
        assert_eq!(
            config.target_table_path(base),
            Path::new("/project/locales/he.json")
        );
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert!(found.is_some());
        assert_eq!(found.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let found = find_config_file(dir.path());
        assert!(found.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "ignores": ["**/test/**"] }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert_eq!(result.path, Some(config_path));
        assert_eq!(result.config.ignores, vec!["**/test/**"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.path.is_none());
        assert_eq!(result.config.includes, default_includes());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()], // unclosed bracket
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_invalid_include_pattern() {
        let config = Config {
            includes: vec!["src/**/[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("includes"));
    }

    #[test]
    fn test_validate_accepts_bracketed_directory_names() {
        let config = Config {
            includes: vec!["app/[locale]".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_locales() {
        let same = Config {
            target_locale: "en".to_string(),
            ..Default::default()
        };
        assert!(same.validate().unwrap_err().to_string().contains("must differ"));

        let empty = Config {
            source_locale: " ".to_string(),
            ..Default::default()
        };
        assert!(empty.validate().unwrap_err().to_string().contains("sourceLocale"));
    }

    #[test]
    fn test_validate_hook_name() {
        let config = Config {
            hook_name: "use-translation".to_string(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("hookName"));

        let config = Config {
            hook_name: "$useT".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "ignores": ["[invalid"] }"#).unwrap();

        let result = load_config(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"keyStrategy\": \"camelCase\""));
        assert!(json.contains("\"hookModule\": \"react-i18next\""));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.target_locale, "he");
    }
}
