//! Capability probe port definition.

/// Read-only checks against a BI server.
///
/// Implementations record the HTTP status of the last probe, so one instance
/// must not be shared across concurrent validations.
pub trait ServerProbe {
    /// Unauthenticated fingerprint check; false for a blank URL.
    fn is_host_reachable_and_is_target_platform(&self) -> bool;

    fn has_credentials(&self) -> bool;

    /// True when the server answers 401 to the configured credentials.
    fn is_unauthenticated(&self) -> bool;

    fn can_publish(&self) -> bool;

    fn can_manage_datasources(&self) -> bool;

    fn can_create(&self) -> bool;

    fn can_execute(&self) -> bool;

    /// Status of the most recent probe, `-1` when it produced no response.
    fn last_status(&self) -> i32;
}
