use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum QueryDeskError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Missing QueryDesk API key")]
    MissingApiKey,

    #[error("Missing QueryDesk API host")]
    MissingHost,

    #[error("Invalid database adapter `{0}`, expected one of POSTGRES, MYSQL")]
    InvalidAdapter(String),

    #[error("Invalid value for `{attribute}`: {message}")]
    InvalidAttribute {
        attribute: &'static str,
        message: String,
    },

    #[error("Invalid header value for API key")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

    #[error("GraphQL errors: [{}]", .0.join(", "))]
    GraphQl(Vec<String>),

    #[error("GraphQL operation `{0}` returned no data")]
    EmptyResponse(&'static str),

    #[error("Mutation `{0}` returned neither a result nor errors")]
    EmptyResult(&'static str),
}

impl From<figment::Error> for QueryDeskError {
    fn from(e: figment::Error) -> Self {
        QueryDeskError::Config(Box::new(e))
    }
}

impl QueryDeskError {
    /// True for errors raised before any remote I/O took place.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            QueryDeskError::Config(_)
                | QueryDeskError::MissingApiKey
                | QueryDeskError::MissingHost
                | QueryDeskError::InvalidAdapter(_)
                | QueryDeskError::InvalidAttribute { .. }
                | QueryDeskError::InvalidApiKey(_)
                | QueryDeskError::UrlParse(_)
        )
    }

    /// Attribute path a configuration error should be reported against.
    pub fn attribute(&self) -> Option<&'static str> {
        match self {
            QueryDeskError::InvalidAdapter(_) => Some("adapter"),
            QueryDeskError::InvalidAttribute { attribute, .. } => Some(*attribute),
            QueryDeskError::MissingApiKey | QueryDeskError::InvalidApiKey(_) => Some("api_key"),
            QueryDeskError::MissingHost | QueryDeskError::UrlParse(_) => Some("host"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A user-facing message reported back to whoever drives the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ThisError)]
#[error("{summary}: {detail}")]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn attribute_error(
        attribute: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            attribute: Some(attribute.into()),
            ..Self::error(summary, detail)
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary, detail)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(d: Diagnostic) -> Self {
        Self(vec![d])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
