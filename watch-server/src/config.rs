//! Process configuration.
//!
//! All cross-cutting display state (language, theme) lives in explicit
//! values passed where needed, never in module-level statics. Detection
//! reads the environment once at startup; the theme can be toggled at
//! runtime through the web layer.

use std::net::SocketAddr;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Fr,
    Nl,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 3] = [Language::En, Language::Fr, Language::Nl];

    /// Two-letter language code, also used as the API `lang` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Nl => "nl",
        }
    }

    /// Parse a language tag, ignoring any region subtag (`fr-BE` → fr).
    ///
    /// Returns `None` for unsupported languages so the caller can fall
    /// back explicitly.
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or(tag);
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "fr" => Some(Language::Fr),
            "nl" => Some(Language::Nl),
            _ => None,
        }
    }

    /// Detect from an optional environment value, defaulting to English.
    pub fn detect(env_value: Option<&str>) -> Self {
        env_value.and_then(Language::parse).unwrap_or_default()
    }
}

/// Interface theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value for the page's `data-theme` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Detect from an optional environment value, defaulting to light.
    pub fn detect(env_value: Option<&str>) -> Self {
        match env_value {
            Some(v) if v.eq_ignore_ascii_case("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

/// Process-wide configuration, assembled once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the web server binds to.
    pub bind_addr: SocketAddr,

    /// Override for the iRail base URL (testing against a stub).
    pub base_url: Option<String>,

    /// Active interface language.
    pub language: Language,

    /// Initial theme.
    pub theme: Theme,

    /// Directory with locale catalogs (`<lang>.json`).
    pub locales_dir: String,

    /// Directory with static assets.
    pub static_dir: String,

    /// Card self-refresh interval in seconds.
    pub refresh_interval_secs: u64,
}

impl AppConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("WATCH_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        Self {
            bind_addr,
            base_url: std::env::var("IRAIL_BASE_URL").ok(),
            language: Language::detect(std::env::var("WATCH_LANG").ok().as_deref()),
            theme: Theme::detect(std::env::var("WATCH_THEME").ok().as_deref()),
            locales_dir: std::env::var("WATCH_LOCALES").unwrap_or_else(|_| "locales".to_string()),
            static_dir: std::env::var("WATCH_STATIC").unwrap_or_else(|_| "static".to_string()),
            refresh_interval_secs: std::env::var("WATCH_REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}
