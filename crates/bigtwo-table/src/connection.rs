use crate::protocol::ServerMessage;
use core::fmt;
use parking_lot::Mutex;
use thiserror::Error;

/// Table-assigned handle for one attached transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("connection closed")]
    Closed,
    #[error("transport error: {0}")]
    Transport(String),
}

/// Outbound half of a client transport. Implementations must not call back
/// into the table from `deliver`.
pub trait Connection: Send + Sync {
    fn deliver(&self, message: &ServerMessage) -> Result<(), DeliveryError>;
}

/// In-memory connection that queues everything it is sent.
#[derive(Debug, Default)]
pub struct Mailbox {
    inbox: Mutex<Vec<ServerMessage>>,
    closed: Mutex<bool>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every queued message, oldest first.
    pub fn drain(&self) -> Vec<ServerMessage> {
        std::mem::take(&mut *self.inbox.lock())
    }

    pub fn len(&self) -> usize {
        self.inbox.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inbox.lock().is_empty()
    }

    /// Makes later deliveries fail, as a dropped socket would.
    pub fn close(&self) {
        *self.closed.lock() = true;
    }
}

impl Connection for Mailbox {
    fn deliver(&self, message: &ServerMessage) -> Result<(), DeliveryError> {
        if *self.closed.lock() {
            return Err(DeliveryError::Closed);
        }
        self.inbox.lock().push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Connection, ConnectionId, DeliveryError, Mailbox};
    use crate::protocol::ServerMessage;

    #[test]
    fn mailbox_queues_until_drained() {
        let mailbox = Mailbox::new();
        mailbox.deliver(&ServerMessage::system("one")).unwrap();
        mailbox.deliver(&ServerMessage::error("two")).unwrap();
        assert_eq!(mailbox.len(), 2);
        let drained = mailbox.drain();
        assert_eq!(drained[0], ServerMessage::system("one"));
        assert!(mailbox.is_empty());
    }

    #[test]
    fn closed_mailbox_refuses_delivery() {
        let mailbox = Mailbox::new();
        mailbox.close();
        assert_eq!(
            mailbox.deliver(&ServerMessage::system("late")),
            Err(DeliveryError::Closed)
        );
    }

    #[test]
    fn connection_ids_display_compactly() {
        assert_eq!(ConnectionId(7).to_string(), "conn-7");
    }
}
