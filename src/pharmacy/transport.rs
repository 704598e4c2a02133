use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

/// How the credential is attached to a request.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Auth<'a> {
    Bearer(&'a str),
    Header(&'static str, &'a str),
}

#[derive(Debug)]
pub(crate) enum RequestFailure {
    Request(reqwest::Error),
    Api { status: StatusCode, body: String },
}

/// Posts a JSON payload once. Non-success statuses come back as
/// [`RequestFailure::Api`] with the response body attached.
pub(crate) async fn post_json<T: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    auth: Auth<'_>,
    payload: &T,
    timeout_secs: Option<u64>,
) -> Result<reqwest::Response, RequestFailure> {
    let mut request = client.post(url).json(payload);
    request = match auth {
        Auth::Bearer(token) => request.bearer_auth(token),
        Auth::Header(name, value) => request.header(name, value),
    };

    if let Some(timeout_secs) = timeout_secs {
        request = request.timeout(Duration::from_secs(timeout_secs));
    }

    let response = request.send().await.map_err(RequestFailure::Request)?;
    let status = response.status();
    debug!(%status, url, "provider responded");

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RequestFailure::Api { status, body })
}

/// Joins a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::join_url;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("http://h/v1", "chat"), "http://h/v1/chat");
        assert_eq!(join_url("http://h/v1/", "/chat"), "http://h/v1/chat");
    }
}
