//! Thin JSON-over-HTTP client shared by the collaborator adapters.
//!
//! Maps transport and status failures onto `CollaboratorError` so each
//! adapter only deals with its own wire types.

use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::foundation::ValidationError;
use crate::ports::{CollaboratorError, CollaboratorErrorCode};

/// Authenticated JSON client rooted at a base URL.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
}

impl RestClient {
    /// Create a client for `base_url`. The token, if any, is sent as a bearer token.
    pub fn new(base_url: &str, api_token: Option<SecretString>) -> Result<Self, ValidationError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ValidationError::invalid_format("api_base_url", e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ValidationError::invalid_format(
                "api_base_url",
                "URL cannot be used as a base",
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a JSON document. `Ok(None)` on 404.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Option<T>, CollaboratorError> {
        let response = self
            .authorize(self.http.get(url.clone()))
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), body = %body, "Collaborator returned error status");
            return Err(status_error(status, body));
        }

        response.json::<T>().await.map(Some).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Failed to decode collaborator response");
            CollaboratorError::invalid_response(e.to_string())
        })
    }

    /// POST a JSON body, discarding the response body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(), CollaboratorError> {
        let response = self
            .authorize(self.http.post(url.clone()))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), body = %body, "Collaborator rejected request");
            return Err(status_error(status, body));
        }
        Ok(())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

fn transport_error(err: reqwest::Error) -> CollaboratorError {
    if err.is_timeout() {
        CollaboratorError::new(CollaboratorErrorCode::Timeout, err.to_string())
    } else {
        CollaboratorError::network(err.to_string())
    }
}

/// Maps a non-success status onto an error code.
pub(crate) fn status_error(status: StatusCode, body: String) -> CollaboratorError {
    let code = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CollaboratorErrorCode::AuthenticationError,
        StatusCode::NOT_FOUND => CollaboratorErrorCode::NotFound,
        StatusCode::TOO_MANY_REQUESTS => CollaboratorErrorCode::RateLimitExceeded,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CollaboratorErrorCode::Timeout,
        _ => CollaboratorErrorCode::ProviderError,
    };
    let message = if body.is_empty() {
        status.to_string()
    } else {
        body
    };
    CollaboratorError::new(code, message).with_status(status.as_u16())
}
