use std::{collections::HashMap, fs};

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base: String,
    pub credentials_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".into(),
            credentials_path: "./data/credentials.toml".into(),
        }
    }
}

/// Defaults, overridden by `console.toml`, overridden by environment
/// variables. Resolved once at process start.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("console.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("FRAUDSHIELD_API_BASE") {
        settings.api_base = v;
    }
    if let Ok(v) = std::env::var("FRAUDSHIELD_CREDENTIALS") {
        settings.credentials_path = v;
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("api_base") {
            settings.api_base = v.clone();
        }
        if let Some(v) = file_cfg.get("credentials_path") {
            settings.credentials_path = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, "http://localhost:8000");
        assert_eq!(settings.credentials_path, "./data/credentials.toml");
    }

    #[test]
    fn file_overrides_replace_defaults() {
        let mut settings = Settings::default();
        apply_file_overrides(
            &mut settings,
            "api_base = \"https://fraud.example.com\"\ncredentials_path = \"/etc/fraudshield/key.toml\"\n",
        );
        assert_eq!(settings.api_base, "https://fraud.example.com");
        assert_eq!(settings.credentials_path, "/etc/fraudshield/key.toml");
    }

    #[test]
    fn malformed_file_keeps_defaults() {
        let mut settings = Settings::default();
        apply_file_overrides(&mut settings, "not [valid toml");
        assert_eq!(settings.api_base, "http://localhost:8000");
    }
}
