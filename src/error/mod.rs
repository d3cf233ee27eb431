use thiserror::Error;

/// Failure modes of a single metadata or translation request.
///
/// Cancellation has no variant on purpose: a superseded search task is
/// aborted and never reports anything, so there is nothing to map.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success HTTP status.
    #[error("server returned status {0}")]
    Status(u16),

    /// The request never produced a usable response (connect, DNS, ...).
    #[error("{0}")]
    Network(String),

    /// Well-formed response reporting zero results.
    #[error("no movie found")]
    NotFound,

    /// Response arrived but could not be decoded.
    #[error("unexpected payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Payload(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

pub mod messages {
    //! User-facing strings. Every error the search box can show comes
    //! through here; nothing else in the crate formats errors for display.

    use super::FetchError;

    pub const NOT_FOUND: &str = "No movie matched your search.";
    pub const SERVER_TROUBLE: &str = "There was a problem contacting the movie server.";
    pub const KEEP_TYPING: &str = "Keep typing, searches need a few more characters.";

    /// Known transport failure fragments and the message shown for each.
    /// Anything not listed passes through verbatim.
    const KNOWN_TRANSPORT: &[(&str, &str)] = &[
        ("connection refused", "Could not reach the movie server. Are you online?"),
        ("dns error", "Could not reach the movie server. Are you online?"),
        ("connection reset", "The connection to the movie server was interrupted."),
        ("timed out", "The movie server took too long to answer."),
        ("error decoding response body", "The movie server sent an unreadable reply."),
    ];

    pub fn for_fetch_error(err: &FetchError) -> String {
        match err {
            FetchError::NotFound => NOT_FOUND.to_string(),
            FetchError::Status(_) => SERVER_TROUBLE.to_string(),
            FetchError::Network(raw) | FetchError::Payload(raw) => {
                let lowered = raw.to_lowercase();
                KNOWN_TRANSPORT
                    .iter()
                    .find(|(fragment, _)| lowered.contains(fragment))
                    .map(|(_, message)| message.to_string())
                    .unwrap_or_else(|| raw.clone())
            }
        }
    }
}
