use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

const CONFIG_DIR_NAME: &str = "article-selection";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub articles_path: String,
    pub decisions_path: String,
    pub results_path: String,
    /// Unset means the transport default (no client-side timeout)
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Config with default endpoint paths for the given base address
    pub fn new(api_base_url: &str) -> Result<Self> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            articles_path: "articles".to_string(),
            decisions_path: "update-selection".to_string(),
            results_path: "results".to_string(),
            request_timeout: None,
        })
    }

    /// Load from the environment. `api_url_override` (e.g. a CLI flag) wins over
    /// `SELECTION_API_URL`.
    pub fn from_env(api_url_override: Option<&str>) -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let api_url = match api_url_override {
            Some(url) => url.to_string(),
            None => env::var("SELECTION_API_URL").context(
                "SELECTION_API_URL not found.\n\n\
                To fix this, pass --api-url or create ~/.config/article-selection/.env with:\n  \
                SELECTION_API_URL=https://your-backend.example.com/",
            )?,
        };

        let mut config = Self::new(&api_url)?;

        if let Ok(path) = env::var("SELECTION_ARTICLES_PATH") {
            config.articles_path = path;
        }
        if let Ok(path) = env::var("SELECTION_DECISIONS_PATH") {
            config.decisions_path = path;
        }
        if let Ok(path) = env::var("SELECTION_RESULTS_PATH") {
            config.results_path = path;
        }
        if let Ok(secs) = env::var("SELECTION_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("SELECTION_TIMEOUT_SECS must be a whole number of seconds, got {:?}", secs))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn articles_url(&self) -> Result<Url> {
        self.endpoint(&self.articles_path)
    }

    pub fn decisions_url(&self) -> Result<Url> {
        self.endpoint(&self.decisions_path)
    }

    pub fn results_url(&self) -> Result<Url> {
        self.endpoint(&self.results_path)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid endpoint path: {}", path))
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/article-selection/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join(CONFIG_DIR_NAME).join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }
    }
}

/// Parse the base address, treating its last path segment as a directory so
/// endpoint paths are appended rather than substituted.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .with_context(|| format!("Invalid API base URL: {:?}", raw))?;

    if url.cannot_be_a_base() {
        anyhow::bail!("API base URL cannot have paths joined onto it: {}", raw);
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = Config::new("https://backend.example.com").unwrap();
        assert_eq!(
            config.articles_url().unwrap().as_str(),
            "https://backend.example.com/articles"
        );
        assert_eq!(
            config.decisions_url().unwrap().as_str(),
            "https://backend.example.com/update-selection"
        );
        assert_eq!(
            config.results_url().unwrap().as_str(),
            "https://backend.example.com/results"
        );
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_base_path_is_kept() {
        let config = Config::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            config.articles_url().unwrap().as_str(),
            "http://localhost:5000/api/articles"
        );
    }

    #[test]
    fn test_leading_slash_in_path_is_relative() {
        let mut config = Config::new("http://localhost:5000/api/").unwrap();
        config.results_path = "/v2/results".to_string();
        assert_eq!(
            config.results_url().unwrap().as_str(),
            "http://localhost:5000/api/v2/results"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(Config::new("not a url").is_err());
        assert!(Config::new("mailto:someone@example.com").is_err());
    }
}
