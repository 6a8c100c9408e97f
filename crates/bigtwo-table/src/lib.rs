//! Shared-table session layer: seats transports, serializes their actions
//! against one match, and fans out per-seat views.

pub mod connection;
pub mod protocol;
pub mod registry;
pub mod table;

pub use connection::{Connection, ConnectionId, DeliveryError, Mailbox};
pub use protocol::{ClientMessage, ProtocolError, Request, ServerMessage};
pub use table::{Handled, Seating, Table, TableError};
