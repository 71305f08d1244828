//! Error type shared by every stage of the metrics pipeline.
//!
//! Only two variants are recoverable: [`AppError::ConnectTimeout`] and
//! [`AppError::NotReady`]. Both are absorbed by
//! [`crate::application::retry::RetryingCaller`]; every other variant aborts the run.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The connection could not be established before the connect timeout.
    #[error("connection timed out: {0}")]
    ConnectTimeout(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-2xx response carrying a provider problem document.
    #[error("{service} returned {status} {title}: {detail}")]
    Api {
        service: &'static str,
        status: u16,
        title: String,
        detail: String,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no campaign matches query '{0}'")]
    CampaignNotFound(String),

    /// A response was received but the acceptance predicate rejected it.
    #[error("result not ready: {0}")]
    NotReady(String),

    #[error("gave up after {attempts} retries")]
    RetriesExhausted { attempts: u32 },

    #[error("campaign reports zero {0}, rates are undefined")]
    ZeroDenominator(&'static str),

    #[error("archive error: {0}")]
    Archive(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("sheet error: {0}")]
    Sheet(String),
}

impl AppError {
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn sheet(message: impl Into<String>) -> Self {
        Self::Sheet(message.into())
    }

    /// Returns `true` for the error kinds the retry layer suppresses.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectTimeout(_) | Self::NotReady(_))
    }

    /// Builds an [`AppError::Api`] from a failed response body.
    ///
    /// Both Mailchimp and Google return JSON problem documents; anything that
    /// does not parse is kept verbatim as the detail.
    pub fn from_problem(service: &'static str, status: u16, body: &str) -> Self {
        match serde_json::from_str::<ProblemDocument>(body) {
            Ok(problem) => {
                let (title, detail) = problem.into_parts();
                Self::Api {
                    service,
                    status,
                    title,
                    detail,
                }
            }
            Err(_) => Self::Api {
                service,
                status,
                title: String::new(),
                detail: body.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() && e.is_timeout() {
            Self::ConnectTimeout(e)
        } else {
            Self::Http(e)
        }
    }
}

/// Mailchimp: `{title, detail}`; Google: `{error: {message, status}}`.
#[derive(Deserialize)]
struct ProblemDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<GoogleError>,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ProblemDocument {
    fn into_parts(self) -> (String, String) {
        match self.error {
            Some(google) => (
                google.status.unwrap_or_default(),
                google.message.unwrap_or_default(),
            ),
            None => (
                self.title.unwrap_or_default(),
                self.detail.unwrap_or_default(),
            ),
        }
    }
}
