use crate::stats::StatLine;
use crate::terminal::TerminalConfig;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_USERNAME: &str = "davidrencse";

/// Run configuration. Everything has a default; the environment can supply
/// the token, the profile to render and a fallback language list.
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub github_token: Option<String>,
    pub default_languages: Option<Vec<String>>,
    pub stat_lines: Vec<StatLine>,
    pub provider_timeout: Duration,
    pub query_timeout: Duration,
    pub output_image: PathBuf,
    pub readme_path: PathBuf,
    pub terminal: TerminalConfig,
    pub background: String,
    pub font_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            github_token: None,
            default_languages: None,
            stat_lines: StatLine::ALL.to_vec(),
            provider_timeout: Duration::from_secs(20),
            query_timeout: Duration::from_secs(20),
            output_image: PathBuf::from("output.svg"),
            readme_path: PathBuf::from("README.md"),
            terminal: TerminalConfig::default(),
            background: "#0d1117".to_string(),
            font_color: "#c9d1d9".to_string(),
        }
    }
}

impl Config {
    /// Reads `GITHUB_TOKEN`, `PROFILE_USERNAME` and
    /// `PROFILE_DEFAULT_LANGUAGES` (comma separated).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        config.github_token = non_empty("GITHUB_TOKEN");
        if let Some(username) = non_empty("PROFILE_USERNAME") {
            config.username = username;
        }
        config.default_languages = non_empty("PROFILE_DEFAULT_LANGUAGES")
            .map(|raw| parse_list(&raw))
            .filter(|langs| !langs.is_empty());
        config
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
