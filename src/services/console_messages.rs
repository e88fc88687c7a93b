use crate::ports::{MessageKind, MessageSink};

/// Prints titled messages the way a message box would show them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMessageSink;

impl MessageSink for ConsoleMessageSink {
    fn show(&self, kind: MessageKind, title: &str, message: &str) {
        match kind {
            MessageKind::Info => println!("✅ {}: {}", title, message),
            MessageKind::Error => eprintln!("❌ {}: {}", title, message),
        }
    }
}
