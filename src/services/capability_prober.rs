//! Capability probes against a BI server over HTTP.

use std::cell::Cell;

use crate::domain::{AppError, ConnectionDescriptor, PublisherConfig};
use crate::ports::{Resource, ServerProbe, Transport};
use crate::services::HttpTransport;

pub const WEBCONTEXT_PATH: &str = "webcontext.js";
pub const PLATFORM_MARKER: &str = "CONTEXT_PATH";
pub const AUTHORIZATION_PATH: &str = "api/authorization/action/isauthorized";

pub const PUBLISH_ACTION: &str = "org.pentaho.security.publish";
pub const CREATE_ACTION: &str = "org.pentaho.repository.create";
pub const EXECUTE_ACTION: &str = "org.pentaho.repository.execute";
pub const MANAGE_DATASOURCES_ACTION: &str =
    "org.pentaho.platform.dataaccess.datasource.security.manage";

const NO_RESPONSE: i32 = -1;
const UNAUTHORIZED: u16 = 401;

/// Probes one server with an anonymous and a basic-auth client.
#[derive(Debug)]
pub struct HttpCapabilityProber<T: Transport = HttpTransport> {
    connection: ConnectionDescriptor,
    anonymous: T,
    authenticated: T,
    last_status: Cell<i32>,
}

impl HttpCapabilityProber<HttpTransport> {
    pub fn new(connection: &ConnectionDescriptor, config: &PublisherConfig) -> Result<Self, AppError> {
        Ok(Self::with_transports(
            connection,
            HttpTransport::anonymous(connection.url(), config)?,
            HttpTransport::authenticated(connection, config)?,
        ))
    }
}

impl<T: Transport> HttpCapabilityProber<T> {
    pub fn with_transports(connection: &ConnectionDescriptor, anonymous: T, authenticated: T) -> Self {
        Self {
            connection: connection.clone(),
            anonymous,
            authenticated,
            last_status: Cell::new(0),
        }
    }

    fn record(&self, status: Option<u16>) {
        self.last_status.set(status.map(i32::from).unwrap_or(NO_RESPONSE));
    }

    fn is_authorized(&self, action: &str) -> bool {
        let resource = Resource::new(AUTHORIZATION_PATH).query("authAction", action);
        let response = self.authenticated.get(&resource);
        self.record(response.as_ref().map(|r| r.status));

        let allowed = response
            .is_some_and(|r| r.is_success() && r.body.trim().eq_ignore_ascii_case("true"));
        tracing::debug!(action, allowed, status = self.last_status.get(), "authorization probe");
        allowed
    }
}

impl<T: Transport> ServerProbe for HttpCapabilityProber<T> {
    fn is_host_reachable_and_is_target_platform(&self) -> bool {
        if self.connection.url().trim().is_empty() {
            return false;
        }
        let response = self.anonymous.get(&Resource::new(WEBCONTEXT_PATH));
        self.record(response.as_ref().map(|r| r.status));
        response.is_some_and(|r| r.is_success() && r.body.contains(PLATFORM_MARKER))
    }

    fn has_credentials(&self) -> bool {
        self.connection.has_credentials()
    }

    fn is_unauthenticated(&self) -> bool {
        let resource = Resource::new(AUTHORIZATION_PATH).query("authAction", PUBLISH_ACTION);
        let response = self.authenticated.get(&resource);
        self.record(response.as_ref().map(|r| r.status));
        response.is_some_and(|r| r.status == UNAUTHORIZED)
    }

    fn can_publish(&self) -> bool {
        self.is_authorized(PUBLISH_ACTION)
    }

    fn can_manage_datasources(&self) -> bool {
        self.is_authorized(MANAGE_DATASOURCES_ACTION)
    }

    fn can_create(&self) -> bool {
        self.is_authorized(CREATE_ACTION)
    }

    fn can_execute(&self) -> bool {
        self.is_authorized(EXECUTE_ACTION)
    }

    fn last_status(&self) -> i32 {
        self.last_status.get()
    }
}
