use crate::ports::{MessageSink, PublishClientFactory};

/// Application context holding dependencies for command execution.
pub struct AppContext<F: PublishClientFactory, M: MessageSink> {
    clients: F,
    messages: M,
}

impl<F: PublishClientFactory, M: MessageSink> AppContext<F, M> {
    pub fn new(clients: F, messages: M) -> Self {
        Self { clients, messages }
    }

    /// Source of probes and publishers for a server.
    pub fn clients(&self) -> &F {
        &self.clients
    }

    /// Where user-facing validation messages go.
    pub fn messages(&self) -> &M {
        &self.messages
    }
}
