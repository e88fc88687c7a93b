/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Presentation boundary for interactive feedback (message boxes, console).
pub trait MessageSink {
    fn show(&self, kind: MessageKind, title: &str, message: &str);
}
