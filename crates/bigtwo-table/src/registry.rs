use crate::connection::{Connection, ConnectionId};
use std::sync::Arc;

#[derive(Clone)]
pub struct Session {
    pub id: ConnectionId,
    pub seat: usize,
    pub connection: Arc<dyn Connection>,
}

/// Seat-to-connection bookkeeping. At most one live connection per seat.
pub struct Registry {
    seats: Vec<Option<Session>>,
}

impl Registry {
    pub fn new(seats: usize) -> Self {
        Self {
            seats: vec![None; seats],
        }
    }

    /// Claims the lowest free seat, or `None` when every seat is held.
    pub fn claim(&mut self, id: ConnectionId, connection: Arc<dyn Connection>) -> Option<usize> {
        let seat = self.seats.iter().position(Option::is_none)?;
        self.seats[seat] = Some(Session {
            id,
            seat,
            connection,
        });
        Some(seat)
    }

    pub fn release(&mut self, id: ConnectionId) -> Option<Session> {
        self.seats
            .iter_mut()
            .find(|slot| matches!(slot, Some(session) if session.id == id))
            .and_then(Option::take)
    }

    pub fn seat_of(&self, id: ConnectionId) -> Option<usize> {
        self.sessions().find(|s| s.id == id).map(|s| s.seat)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.seats.iter().flatten()
    }

    /// Owned copy of the live sessions, for delivering after the lock is gone.
    pub fn snapshot(&self) -> Vec<Session> {
        self.sessions().cloned().collect()
    }

    pub fn occupied(&self) -> usize {
        self.sessions().count()
    }

    pub fn capacity(&self) -> usize {
        self.seats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::connection::{ConnectionId, Mailbox};
    use std::sync::Arc;

    #[test]
    fn claims_lowest_free_seat_and_reuses_released_ones() {
        let mut registry = Registry::new(3);
        let mailbox = Arc::new(Mailbox::new());
        assert_eq!(registry.claim(ConnectionId(1), mailbox.clone()), Some(0));
        assert_eq!(registry.claim(ConnectionId(2), mailbox.clone()), Some(1));
        assert_eq!(registry.claim(ConnectionId(3), mailbox.clone()), Some(2));
        assert_eq!(registry.claim(ConnectionId(4), mailbox.clone()), None);

        let released = registry.release(ConnectionId(2)).unwrap();
        assert_eq!(released.seat, 1);
        assert_eq!(registry.occupied(), 2);
        assert_eq!(registry.claim(ConnectionId(5), mailbox), Some(1));
        assert_eq!(registry.seat_of(ConnectionId(5)), Some(1));
        assert_eq!(registry.seat_of(ConnectionId(2)), None);
    }

    #[test]
    fn releasing_unknown_connection_is_a_no_op() {
        let mut registry = Registry::new(2);
        assert!(registry.release(ConnectionId(9)).is_none());
        assert_eq!(registry.capacity(), 2);
    }
}
