//! Connection validation before a publish.

use url::Url;

use crate::domain::{ConnectionDescriptor, ValidationError};
use crate::ports::{MessageKind, MessageSink, ServerProbe};

const NOT_FOUND: i32 = 404;

/// Runs the probe checks in a fixed order and reports the first failure.
pub struct ConnectionValidator<'a> {
    probe: &'a dyn ServerProbe,
    connection: &'a ConnectionDescriptor,
}

impl<'a> ConnectionValidator<'a> {
    pub fn new(probe: &'a dyn ServerProbe, connection: &'a ConnectionDescriptor) -> Self {
        Self { probe, connection }
    }

    /// Headless variant: the first failing check becomes the error.
    pub fn validate_connection_in_runtime(&self) -> Result<(), ValidationError> {
        let url = self.connection.url();
        if url.trim().is_empty()
            || Url::parse(url).is_err()
            || !self.probe.is_host_reachable_and_is_target_platform()
        {
            return Err(ValidationError::InvalidServer { url: url.to_string() });
        }

        if !self.probe.has_credentials() {
            return Err(ValidationError::MissingCredentials);
        }

        if self.probe.is_unauthenticated() {
            return Err(ValidationError::AuthenticationFailed {
                user: self.connection.user_id.clone(),
            });
        }

        if !self.probe.can_publish() {
            return Err(self.permission_error("publish"));
        }

        if !self.probe.can_manage_datasources() {
            return Err(self.permission_error("manage data sources"));
        }

        tracing::debug!(url, user = %self.connection.user_id, "connection validated");
        Ok(())
    }

    /// Interactive variant: reports through `sink` and returns whether the connection is usable.
    pub fn validate_connection(&self, sink: &dyn MessageSink, suppress_success: bool) -> bool {
        match self.validate_connection_in_runtime() {
            Ok(()) => {
                if !suppress_success {
                    sink.show(
                        MessageKind::Info,
                        "Connection Successful",
                        &format!("Connected to {} as {}", self.connection.url(), self.connection.user_id),
                    );
                }
                true
            }
            Err(err) => {
                sink.show(MessageKind::Error, err.title(), &err.to_string());
                false
            }
        }
    }

    fn permission_error(&self, action: &str) -> ValidationError {
        if self.probe.last_status() == NOT_FOUND {
            ValidationError::BadUrl { url: self.connection.url().to_string() }
        } else {
            ValidationError::Forbidden {
                user: self.connection.user_id.clone(),
                action: action.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeProbe, RecordingMessageSink};

    fn connection() -> ConnectionDescriptor {
        ConnectionDescriptor::new("http://bi:8080/pentaho", "admin", "password")
    }

    #[test]
    fn healthy_server_passes() {
        let probe = FakeProbe::healthy();
        let conn = connection();
        assert!(ConnectionValidator::new(&probe, &conn).validate_connection_in_runtime().is_ok());
        assert_eq!(
            probe.calls(),
            ["reachable", "credentials", "unauthenticated", "publish", "manage"]
        );
    }

    #[test]
    fn blank_url_is_invalid_server_without_probing() {
        let probe = FakeProbe::healthy();
        let conn = ConnectionDescriptor::new("", "admin", "password");
        let err = ConnectionValidator::new(&probe, &conn).validate_connection_in_runtime();
        assert!(matches!(err, Err(ValidationError::InvalidServer { .. })));
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn unrecognised_platform_is_invalid_server() {
        let probe = FakeProbe { platform: false, ..FakeProbe::healthy() };
        let conn = connection();
        let err = ConnectionValidator::new(&probe, &conn).validate_connection_in_runtime();
        assert!(matches!(err, Err(ValidationError::InvalidServer { .. })));
    }

    #[test]
    fn missing_credentials_fail_second() {
        let probe = FakeProbe { credentials: false, ..FakeProbe::healthy() };
        let conn = connection();
        let err = ConnectionValidator::new(&probe, &conn).validate_connection_in_runtime();
        assert_eq!(err, Err(ValidationError::MissingCredentials));
    }

    #[test]
    fn unauthenticated_user_short_circuits_capability_probes() {
        let probe = FakeProbe { unauthenticated: true, ..FakeProbe::healthy() };
        let conn = connection();
        let err = ConnectionValidator::new(&probe, &conn).validate_connection_in_runtime();
        assert_eq!(err, Err(ValidationError::AuthenticationFailed { user: "admin".into() }));
        assert_eq!(probe.calls(), ["reachable", "credentials", "unauthenticated"]);
    }

    #[test]
    fn not_found_status_means_bad_url() {
        let probe = FakeProbe { publish: false, status: 404, ..FakeProbe::healthy() };
        let conn = connection();
        let err = ConnectionValidator::new(&probe, &conn).validate_connection_in_runtime();
        assert!(matches!(err, Err(ValidationError::BadUrl { .. })));
    }

    #[test]
    fn other_status_means_forbidden() {
        let probe = FakeProbe { manage: false, status: 200, ..FakeProbe::healthy() };
        let conn = connection();
        let err = ConnectionValidator::new(&probe, &conn).validate_connection_in_runtime();
        assert_eq!(
            err,
            Err(ValidationError::Forbidden {
                user: "admin".into(),
                action: "manage data sources".into()
            })
        );
    }

    #[test]
    fn interactive_variant_reports_titled_messages() {
        let conn = connection();
        let sink = RecordingMessageSink::default();

        let probe = FakeProbe { unauthenticated: true, ..FakeProbe::healthy() };
        assert!(!ConnectionValidator::new(&probe, &conn).validate_connection(&sink, false));

        let probe = FakeProbe::healthy();
        assert!(ConnectionValidator::new(&probe, &conn).validate_connection(&sink, false));
        assert!(ConnectionValidator::new(&probe, &conn).validate_connection(&sink, true));

        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].0, MessageKind::Error);
        assert_eq!(messages[0].1, "Invalid Credentials");
        assert_eq!(messages[1].1, "Connection Successful");
    }
}
