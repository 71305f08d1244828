//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before any remote
//! call is made. A `.env` file is honored (loaded by `main.rs`).
//!
//! ## Required Variables
//!
//! - `MAILCHIMP_API_KEY` - Mailchimp API key in `<key>-<datacenter>` form
//!
//! ## Optional Variables
//!
//! - `MAILCHIMP_API_URL` - Provider base URL (default: `https://<dc>.api.mailchimp.com/3.0`)
//! - `GOOGLE_ACCESS_TOKEN` - OAuth bearer token for Sheets and Drive (required to publish)
//! - `METRICS_TEMPLATE_ID` - Drive id of the monthly spreadsheet template
//! - `HTTP_CONNECT_TIMEOUT_SECS` - Connect timeout, the retried failure kind (default: 10)
//! - `HTTP_READ_TIMEOUT_SECS` - Idle timeout between reads of a response (default: 10)
//! - `RETRY_BASE_DELAY_MS` - First backoff delay, doubled per retry (default: 5000)
//! - `RETRY_MAX_ATTEMPTS` - Retry ceiling (default: unset, retry forever)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use std::sync::LazyLock;

/// Drive id of the spreadsheet copied for every new month.
pub const DEFAULT_TEMPLATE_ID: &str = "1EoVKoOKPnnykMBK1bumvDWODp7mW9aAtdhE4B2qTgYY";

static API_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]+-([a-z]+[0-9]+)$").expect("valid regex"));

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub mailchimp_api_key: String,
    pub mailchimp_api_url: String,
    pub google_access_token: Option<String>,
    pub template_id: String,
    /// Bounds connection setup only. Expiry is the one retried network failure.
    pub http_connect_timeout_secs: u64,
    /// Idle limit between reads of a response. Requests have no overall deadline.
    pub http_read_timeout_secs: u64,
    /// Delay before the first retry, in milliseconds.
    pub retry_base_delay_ms: u64,
    /// `None` keeps retrying until the upstream answers.
    pub retry_max_attempts: Option<u32>,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `MAILCHIMP_API_KEY` is missing or carries no
    /// datacenter suffix while `MAILCHIMP_API_URL` is unset.
    pub fn from_env() -> Result<Self> {
        let mailchimp_api_key =
            env::var("MAILCHIMP_API_KEY").context("MAILCHIMP_API_KEY must be set")?;

        let mailchimp_api_url = match env::var("MAILCHIMP_API_URL") {
            Ok(url) => url,
            Err(_) => Self::mailchimp_url_for_key(&mailchimp_api_key)
                .context("Failed to derive Mailchimp API URL")?,
        };

        let google_access_token = env::var("GOOGLE_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        let template_id =
            env::var("METRICS_TEMPLATE_ID").unwrap_or_else(|_| DEFAULT_TEMPLATE_ID.to_string());

        let http_connect_timeout_secs = env::var("HTTP_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let http_read_timeout_secs = env::var("HTTP_READ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let retry_base_delay_ms = env::var("RETRY_BASE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let retry_max_attempts = env::var("RETRY_MAX_ATTEMPTS")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("RETRY_MAX_ATTEMPTS must be a non-negative integer")?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            mailchimp_api_key,
            mailchimp_api_url,
            google_access_token,
            template_id,
            http_connect_timeout_secs,
            http_read_timeout_secs,
            retry_base_delay_ms,
            retry_max_attempts,
            log_level,
            log_format,
        })
    }

    /// Builds the API base URL from the datacenter suffix of the key.
    ///
    /// `abc123-us16` → `https://us16.api.mailchimp.com/3.0`
    fn mailchimp_url_for_key(api_key: &str) -> Result<String> {
        let captures = API_KEY_PATTERN.captures(api_key).with_context(|| {
            format!(
                "MAILCHIMP_API_KEY must look like '<key>-<datacenter>', got '{}'",
                mask_secret(api_key)
            )
        })?;

        Ok(format!("https://{}.api.mailchimp.com/3.0", &captures[1]))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `mailchimp_api_url` is not an http(s) URL
    /// - a timeout is zero
    /// - `log_format` is not `text` or `json`
    /// - `retry_max_attempts` is `Some(0)`
    pub fn validate(&self) -> Result<()> {
        if self.mailchimp_api_key.is_empty() {
            anyhow::bail!("MAILCHIMP_API_KEY must not be empty");
        }

        let api_url = url::Url::parse(&self.mailchimp_api_url)
            .with_context(|| format!("MAILCHIMP_API_URL is invalid: '{}'", self.mailchimp_api_url))?;
        if api_url.scheme() != "http" && api_url.scheme() != "https" {
            anyhow::bail!(
                "MAILCHIMP_API_URL must start with 'http://' or 'https://', got '{}'",
                self.mailchimp_api_url
            );
        }

        if self.http_connect_timeout_secs == 0 {
            anyhow::bail!("HTTP_CONNECT_TIMEOUT_SECS must be greater than 0");
        }
        if self.http_read_timeout_secs == 0 {
            anyhow::bail!("HTTP_READ_TIMEOUT_SECS must be greater than 0");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if self.retry_max_attempts == Some(0) {
            anyhow::bail!("RETRY_MAX_ATTEMPTS must be at least 1 when set");
        }

        Ok(())
    }

    /// Returns whether the run can write to Google Sheets.
    pub fn can_publish(&self) -> bool {
        self.google_access_token.is_some()
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Mailchimp API: {}", self.mailchimp_api_url);
        tracing::info!("  Mailchimp key: {}", mask_secret(&self.mailchimp_api_key));

        if self.can_publish() {
            tracing::info!("  Google Sheets: enabled");
        } else {
            tracing::info!("  Google Sheets: disabled (no GOOGLE_ACCESS_TOKEN)");
        }

        tracing::info!("  Template: {}", self.template_id);
        tracing::info!(
            "  HTTP timeouts: {}s connect, {}s read",
            self.http_connect_timeout_secs,
            self.http_read_timeout_secs
        );
        match self.retry_max_attempts {
            Some(max) => tracing::info!(
                "  Retry: base {}ms, at most {} retries",
                self.retry_base_delay_ms,
                max
            ),
            None => tracing::info!("  Retry: base {}ms, unbounded", self.retry_base_delay_ms),
        }
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks everything but the datacenter suffix of an API key.
///
/// - `0123456789abcdef-us16` → `***-us16`
/// - `token` → `***`
fn mask_secret(secret: &str) -> String {
    match secret.rsplit_once('-') {
        Some((_, suffix)) => format!("***-{}", suffix),
        None => "***".to_string(),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> Config {
        Config {
            mailchimp_api_key: "0123456789abcdef-us16".to_string(),
            mailchimp_api_url: "https://us16.api.mailchimp.com/3.0".to_string(),
            google_access_token: None,
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            http_connect_timeout_secs: 10,
            http_read_timeout_secs: 10,
            retry_base_delay_ms: 5000,
            retry_max_attempts: None,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("0123456789abcdef-us16"), "***-us16");
        assert_eq!(mask_secret("plain"), "***");
    }

    #[test]
    fn test_mailchimp_url_for_key() {
        assert_eq!(
            Config::mailchimp_url_for_key("45ef254b0660a24c-us16").unwrap(),
            "https://us16.api.mailchimp.com/3.0"
        );
        assert!(Config::mailchimp_url_for_key("no-datacenter-here!").is_err());
        assert!(Config::mailchimp_url_for_key("nodash").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.log_format = "yaml".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.mailchimp_api_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.mailchimp_api_url = "http://127.0.0.1:8080/3.0".to_string();
        assert!(config.validate().is_ok());

        config.http_read_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.http_read_timeout_secs = 10;
        config.http_connect_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.http_connect_timeout_secs = 10;

        config.retry_max_attempts = Some(0);
        assert!(config.validate().is_err());
        config.retry_max_attempts = Some(12);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("MAILCHIMP_API_KEY", "abcdef0123-us7");
            env::remove_var("MAILCHIMP_API_URL");
            env::remove_var("RETRY_MAX_ATTEMPTS");
            env::remove_var("RETRY_BASE_DELAY_MS");
            env::remove_var("GOOGLE_ACCESS_TOKEN");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.mailchimp_api_url, "https://us7.api.mailchimp.com/3.0");
        assert_eq!(config.retry_base_delay_ms, 5000);
        assert_eq!(config.retry_max_attempts, None);
        assert!(!config.can_publish());

        unsafe {
            env::remove_var("MAILCHIMP_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_api_url_override_priority() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("MAILCHIMP_API_KEY", "opaque-token");
            env::set_var("MAILCHIMP_API_URL", "http://localhost:9000/3.0");
            env::set_var("RETRY_MAX_ATTEMPTS", "4");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.mailchimp_api_url, "http://localhost:9000/3.0");
        assert_eq!(config.retry_max_attempts, Some(4));

        unsafe {
            env::remove_var("MAILCHIMP_API_KEY");
            env::remove_var("MAILCHIMP_API_URL");
            env::remove_var("RETRY_MAX_ATTEMPTS");
        }
    }

    #[test]
    #[serial]
    fn test_invalid_retry_ceiling_is_rejected() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("MAILCHIMP_API_KEY", "abcdef0123-us7");
            env::set_var("RETRY_MAX_ATTEMPTS", "many");
        }

        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("MAILCHIMP_API_KEY");
            env::remove_var("RETRY_MAX_ATTEMPTS");
        }
    }
}
