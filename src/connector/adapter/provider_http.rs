use reqwest::{Response, StatusCode};
use tracing::warn;

use crate::domain::DomainError;

/// Turn a non-2xx provider reply into an error. 401/403 mean the credential was
/// refused; anything else (quota, outage, bad request) is a transport failure.
pub(super) async fn status_error(client: &str, response: Response) -> DomainError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!("{client}: API returned {status}: {body}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DomainError::authentication(format!("{client}: API rejected credentials ({status})"))
        }
        _ => DomainError::transport(format!("{client}: API returned {status}")),
    }
}
