use thiserror::Error;

use crate::models::ArticleId;

/// Failure of a call to the remote selection service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network unreachable, DNS failure, connection reset and similar
    #[error("{0}")]
    Transport(String),

    /// Non-2xx status, even when the body is valid JSON
    #[error("server returned HTTP {status}{}", body_suffix(.body))]
    Server { status: u16, body: String },

    /// Body was not the JSON shape the endpoint promises
    #[error("malformed response: {0}")]
    Malformed(String),
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {}", body)
    }
}

// reqwest's own message only names the URL; the cause (refused, DNS, TLS)
// lives further down the source chain.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(format!("{:#}", anyhow::Error::from(err)))
    }
}

/// Rejected edit of the selection form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no article with id {0} is listed")]
    UnknownArticle(ArticleId),

    #[error("the selection form is not available in the current state")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_includes_status() {
        let err = ApiError::Server {
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "server returned HTTP 503");
    }

    #[test]
    fn test_server_error_includes_body() {
        let err = ApiError::Server {
            status: 500,
            body: "{\"error\": \"boom\"}\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "server returned HTTP 500 - {\"error\": \"boom\"}"
        );
    }

    #[test]
    fn test_transport_error_is_verbatim() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }
}
