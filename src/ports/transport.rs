//! HTTP transport port definition.

/// HTTP verb of a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Verbs that change server state and therefore carry the CSRF token.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// Server-relative resource: a path, optional trailing segment, and query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub path: String,
    /// Appended as its own percent-encoded path segment.
    pub segment: Option<String>,
    pub query: Vec<(String, String)>,
}

impl Resource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), segment: None, query: Vec::new() }
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { bytes: Vec<u8>, file_name: String, mime: String },
}

/// Named multipart form fields, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: Vec<(String, FormValue)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FormValue::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        self.fields.push((
            name.into(),
            FormValue::File { bytes: bytes.into(), file_name: file_name.into(), mime: mime.into() },
        ));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Port for requests against the BI server.
///
/// `None` means the exchange never completed (refused, DNS, timeout, bad URL);
/// callers must read it as "outcome unknown", never as success.
pub trait Transport {
    fn send(&self, method: HttpMethod, resource: &Resource, body: RequestBody)
    -> Option<HttpResponse>;

    fn get(&self, resource: &Resource) -> Option<HttpResponse> {
        self.send(HttpMethod::Get, resource, RequestBody::Empty)
    }

    fn put(&self, resource: &Resource, body: RequestBody) -> Option<HttpResponse> {
        self.send(HttpMethod::Put, resource, body)
    }

    fn post(&self, resource: &Resource, body: RequestBody) -> Option<HttpResponse> {
        self.send(HttpMethod::Post, resource, body)
    }

    fn delete(&self, resource: &Resource) -> Option<HttpResponse> {
        self.send(HttpMethod::Delete, resource, RequestBody::Empty)
    }

    fn multipart_upload(
        &self,
        method: HttpMethod,
        resource: &Resource,
        form: MultipartForm,
    ) -> Option<HttpResponse> {
        self.send(method, resource, RequestBody::Multipart(form))
    }
}
