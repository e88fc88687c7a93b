//! BI server transport implementation using reqwest.

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use url::Url;

use crate::domain::{AppError, ConnectionDescriptor, PublisherConfig};
use crate::ports::{
    FormValue, HttpMethod, HttpResponse, MultipartForm, RequestBody, Resource, Transport,
};

pub const CSRF_TOKEN_PATH: &str = "api/csrf/token";
const CSRF_HEADER_NAME: &str = "X-CSRF-HEADER";
const CSRF_TOKEN_NAME: &str = "X-CSRF-TOKEN";

#[derive(Debug, Clone)]
struct CsrfToken {
    header: String,
    token: String,
}

/// HTTP transport bound to one server base URL.
///
/// Filters are applied in order: basic auth, session cookie, anti-CSRF token.
pub struct HttpTransport {
    base_url: String,
    credentials: Option<(String, String)>,
    csrf_enabled: bool,
    csrf_token: RefCell<Option<CsrfToken>>,
    client: Client,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("user", &self.credentials.as_ref().map(|(user, _)| user))
            .field("password", &"[REDACTED]")
            .field("csrf_enabled", &self.csrf_enabled)
            .finish()
    }
}

impl HttpTransport {
    /// Client without credentials, for the platform fingerprint.
    pub fn anonymous(base_url: &str, config: &PublisherConfig) -> Result<Self, AppError> {
        Self::build(base_url, None, false, false, config)
    }

    /// Client with basic auth only, for capability probes.
    pub fn authenticated(
        connection: &ConnectionDescriptor,
        config: &PublisherConfig,
    ) -> Result<Self, AppError> {
        Self::build(connection.url(), Some(credentials_of(connection)), false, false, config)
    }

    /// Client with basic auth, a session cookie store and the anti-CSRF filter.
    pub fn publishing(
        connection: &ConnectionDescriptor,
        config: &PublisherConfig,
    ) -> Result<Self, AppError> {
        Self::build(
            connection.url(),
            Some(credentials_of(connection)),
            true,
            config.csrf.enabled,
            config,
        )
    }

    fn build(
        base_url: &str,
        credentials: Option<(String, String)>,
        session: bool,
        csrf_enabled: bool,
        config: &PublisherConfig,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .cookie_store(session)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.to_string(),
            credentials,
            csrf_enabled,
            csrf_token: RefCell::new(None),
            client,
        })
    }

    fn resource_url(&self, resource: &Resource) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.base_url)?.join(&resource.path)?;
        if let Some(segment) = &resource.segment {
            url.path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
                .pop_if_empty()
                .push(segment);
        }
        if !resource.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&resource.query);
        }
        Ok(url)
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    /// Token for mutating requests, fetched once per transport.
    fn csrf_token(&self, target: &Url) -> Option<CsrfToken> {
        if !self.csrf_enabled {
            return None;
        }
        if let Some(token) = self.csrf_token.borrow().as_ref() {
            return Some(token.clone());
        }

        let url = self
            .resource_url(&Resource::new(CSRF_TOKEN_PATH).query("url", target.as_str()))
            .ok()?;
        let response = match self.with_auth(self.client.get(url)).send() {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch CSRF token");
                return None;
            }
        };

        let header = |name: &str| {
            response.headers().get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
        };
        let token = match (header(CSRF_HEADER_NAME), header(CSRF_TOKEN_NAME)) {
            (Some(header), Some(token)) => CsrfToken { header, token },
            _ => {
                tracing::debug!(status = response.status().as_u16(), "server issued no CSRF token");
                return None;
            }
        };

        *self.csrf_token.borrow_mut() = Some(token.clone());
        Some(token)
    }
}

fn credentials_of(connection: &ConnectionDescriptor) -> (String, String) {
    (connection.user_id.clone(), connection.password.clone())
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn build_form(form: MultipartForm) -> Result<Form, reqwest::Error> {
    let mut multipart = Form::new();
    for (name, value) in form.fields {
        multipart = match value {
            FormValue::Text(text) => multipart.text(name, text),
            FormValue::File { bytes, file_name, mime } => {
                multipart.part(name, Part::bytes(bytes).file_name(file_name).mime_str(&mime)?)
            }
        };
    }
    Ok(multipart)
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: HttpMethod,
        resource: &Resource,
        body: RequestBody,
    ) -> Option<HttpResponse> {
        let url = match self.resource_url(resource) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, base = %self.base_url, path = %resource.path, "malformed URL");
                return None;
            }
        };

        let mut request = self.with_auth(self.client.request(to_reqwest_method(method), url.clone()));
        if method.is_mutating()
            && let Some(csrf) = self.csrf_token(&url)
        {
            request = request.header(csrf.header, csrf.token);
        }

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => match build_form(form) {
                Ok(form) => request.multipart(form),
                Err(e) => {
                    tracing::warn!(error = %e, "invalid multipart form");
                    return None;
                }
            },
        };

        let response = match request.send() {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, method = method.as_str(), %url, "HTTP request failed");
                return None;
            }
        };

        let status = response.status().as_u16();
        match response.text() {
            Ok(body) => {
                tracing::debug!(method = method.as_str(), %url, status, "HTTP response");
                Some(HttpResponse { status, body })
            }
            Err(e) => {
                tracing::warn!(error = %e, %url, status, "failed to read response body");
                None
            }
        }
    }
}
