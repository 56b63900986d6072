use tokio_tungstenite::tungstenite::http::Uri;

use crate::error::ClientError;

/// Path the chat server serves its socket on.
pub const WEBSOCKET_PATH: &str = "/websocket";

/// Derive the socket URL from the page URL.
///
/// Only the scheme and host of the page are used: `https` maps to `wss`, `http`
/// to `ws`, and the path is always [`WEBSOCKET_PATH`].
pub fn websocket_url(page_url: &str) -> Result<String, ClientError> {
    let uri: Uri = page_url
        .trim()
        .parse()
        .map_err(|source| ClientError::InvalidPageUrl {
            url: page_url.to_string(),
            source,
        })?;

    let scheme = match uri.scheme_str() {
        Some(scheme) if scheme.eq_ignore_ascii_case("https") => "wss",
        Some(scheme) if scheme.eq_ignore_ascii_case("http") => "ws",
        other => {
            return Err(ClientError::UnsupportedScheme {
                url: page_url.to_string(),
                scheme: other.unwrap_or_default().to_string(),
            });
        }
    };

    // Credentials in the page URL are not carried over to the socket.
    let host = uri
        .host()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| ClientError::MissingHost {
            url: page_url.to_string(),
        })?;

    Ok(match uri.port_u16() {
        Some(port) => format!("{scheme}://{host}:{port}{WEBSOCKET_PATH}"),
        None => format!("{scheme}://{host}{WEBSOCKET_PATH}"),
    })
}
