use std::time::Duration;

use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::http::uri::InvalidUri;

/// Errors raised while setting up or opening the chat connection.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("page URL `{url}` is not a valid URL: {source}")]
    InvalidPageUrl {
        url: String,
        #[source]
        source: InvalidUri,
    },
    #[error("page URL `{url}` must use http or https, got `{scheme}`")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("page URL `{url}` has no host")]
    MissingHost { url: String },
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },
    #[error("timed out after {timeout:?} connecting to {url}")]
    ConnectTimeout { url: String, timeout: Duration },
}
