use crate::connection::{Connection, ConnectionId};
use crate::protocol::{ClientMessage, Request, ServerMessage};
use crate::registry::{Registry, Session};
use bigtwo_core::game::action::Outcome;
use bigtwo_core::game::config::{ConfigError, MatchConfig};
use bigtwo_core::game::match_state::MatchState;
use bigtwo_core::game::view::MatchView;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Sorry, the game is full or not available.")]
    Full,
    #[error("{0} is not seated at this table")]
    UnknownConnection(ConnectionId),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seating {
    pub id: ConnectionId,
    pub seat: usize,
}

/// What handling one client message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    Applied(Outcome),
    /// Refused; the reason went back to the sender only.
    Rejected(String),
    Chat,
}

struct Envelope {
    to: ConnectionId,
    connection: Arc<dyn Connection>,
    message: ServerMessage,
}

/// One shared match plus the connections seated at it.
///
/// Every entry point locks `state` before `registry`. Outgoing messages are
/// built under the locks and delivered once both are released.
pub struct Table {
    state: Mutex<MatchState>,
    registry: Mutex<Registry>,
    next_id: AtomicU64,
}

impl Table {
    pub fn new(config: MatchConfig) -> Result<Self, TableError> {
        Ok(Self::from_state(MatchState::new(config)?))
    }

    pub fn from_state(state: MatchState) -> Self {
        let seats = state.players().len();
        Self {
            state: Mutex::new(state),
            registry: Mutex::new(Registry::new(seats)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seats `connection` in the first free seat, announces it, and sends
    /// everyone a fresh view.
    pub fn join(&self, connection: Arc<dyn Connection>) -> Result<Seating, TableError> {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let claimed = {
            let state = self.state.lock();
            let mut registry = self.registry.lock();
            match registry.claim(id, connection.clone()) {
                Some(seat) => {
                    let sessions = registry.snapshot();
                    drop(registry);
                    let name = seat_name(&state, seat);
                    event!(Level::INFO, %id, seat, name = %name, "connection seated");
                    let mut outbox = announce(&sessions, format!("{name} has connected."));
                    outbox.extend(render_views(&state, &sessions));
                    Some((seat, outbox))
                }
                None => None,
            }
        };

        match claimed {
            Some((seat, outbox)) => {
                deliver(outbox);
                Ok(Seating { id, seat })
            }
            None => {
                event!(Level::INFO, %id, "table full; connection refused");
                deliver(vec![Envelope {
                    to: id,
                    connection,
                    message: ServerMessage::error(TableError::Full.to_string()),
                }]);
                Err(TableError::Full)
            }
        }
    }

    /// Frees the seat held by `id`. The match itself is untouched.
    pub fn leave(&self, id: ConnectionId) -> Result<usize, TableError> {
        let (seat, outbox) = {
            let state = self.state.lock();
            let mut registry = self.registry.lock();
            let session = registry
                .release(id)
                .ok_or(TableError::UnknownConnection(id))?;
            let sessions = registry.snapshot();
            drop(registry);
            let name = seat_name(&state, session.seat);
            event!(Level::INFO, %id, seat = session.seat, name = %name, "connection left");
            (
                session.seat,
                announce(&sessions, format!("{name} has disconnected.")),
            )
        };
        deliver(outbox);
        Ok(seat)
    }

    /// Parses and handles one raw frame. Protocol errors go back to the sender.
    pub fn handle_json(&self, id: ConnectionId, raw: &str) -> Result<Handled, TableError> {
        match ClientMessage::from_json(raw) {
            Ok(message) => self.handle(id, message),
            Err(err) => {
                let connection = {
                    let registry = self.registry.lock();
                    registry
                        .sessions()
                        .find(|s| s.id == id)
                        .map(|s| s.connection.clone())
                        .ok_or(TableError::UnknownConnection(id))?
                };
                event!(Level::DEBUG, %id, reason = %err, "unparseable message");
                let reason = err.to_string();
                deliver(vec![Envelope {
                    to: id,
                    connection,
                    message: ServerMessage::error(reason.clone()),
                }]);
                Ok(Handled::Rejected(reason))
            }
        }
    }

    pub fn handle(&self, id: ConnectionId, message: ClientMessage) -> Result<Handled, TableError> {
        let (handled, outbox) = {
            let mut state = self.state.lock();
            let (sender, sessions) = {
                let registry = self.registry.lock();
                let sender = registry
                    .sessions()
                    .find(|s| s.id == id)
                    .cloned()
                    .ok_or(TableError::UnknownConnection(id))?;
                (sender, registry.snapshot())
            };

            match message.into_request() {
                Request::Chat(content) => {
                    let sender_label = state
                        .player(sender.seat)
                        .map(|p| format!("{} ({})", p.name(), p.id()))
                        .unwrap_or_default();
                    let chat = ServerMessage::Chat {
                        sender: sender_label,
                        content,
                    };
                    (Handled::Chat, broadcast(&sessions, &chat))
                }
                Request::Act(action) => match state.apply(sender.seat, action) {
                    Ok(outcome) => (Handled::Applied(outcome), render_views(&state, &sessions)),
                    Err(err) => {
                        if !err.is_user_error() {
                            event!(Level::ERROR, %id, seat = sender.seat, error = %err, "action aborted");
                        }
                        let reason = err.to_string();
                        let reply = Envelope {
                            to: id,
                            connection: sender.connection,
                            message: ServerMessage::error(reason.clone()),
                        };
                        (Handled::Rejected(reason), vec![reply])
                    }
                },
            }
        };
        deliver(outbox);
        Ok(handled)
    }

    /// Runs `read` against the match under the state lock.
    pub fn inspect<R>(&self, read: impl FnOnce(&MatchState) -> R) -> R {
        read(&self.state.lock())
    }

    pub fn view_for(&self, seat: Option<usize>) -> MatchView {
        self.inspect(|state| state.view_for(seat))
    }

    pub fn seat_of(&self, id: ConnectionId) -> Option<usize> {
        self.registry.lock().seat_of(id)
    }

    pub fn occupied(&self) -> usize {
        self.registry.lock().occupied()
    }
}

fn seat_name(state: &MatchState, seat: usize) -> String {
    state
        .player(seat)
        .map(|p| p.name().to_string())
        .unwrap_or_default()
}

fn announce(sessions: &[Session], content: String) -> Vec<Envelope> {
    broadcast(sessions, &ServerMessage::system(content))
}

fn broadcast(sessions: &[Session], message: &ServerMessage) -> Vec<Envelope> {
    sessions
        .iter()
        .map(|s| Envelope {
            to: s.id,
            connection: s.connection.clone(),
            message: message.clone(),
        })
        .collect()
}

fn render_views(state: &MatchState, sessions: &[Session]) -> Vec<Envelope> {
    sessions
        .iter()
        .map(|s| Envelope {
            to: s.id,
            connection: s.connection.clone(),
            message: ServerMessage::GameState(state.view_for(Some(s.seat))),
        })
        .collect()
}

fn deliver(outbox: Vec<Envelope>) {
    for envelope in outbox {
        if let Err(err) = envelope.connection.deliver(&envelope.message) {
            event!(
                Level::WARN,
                to = %envelope.to,
                kind = envelope.message.kind(),
                error = %err,
                "delivery failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Handled, Table, TableError};
    use crate::connection::Mailbox;
    use crate::protocol::{ClientMessage, ServerMessage};
    use bigtwo_core::game::action::Outcome;
    use bigtwo_core::game::config::MatchConfig;
    use std::sync::Arc;

    fn table(players: usize) -> Table {
        Table::new(MatchConfig {
            players,
            seed: Some(17),
            ..MatchConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn join_announces_then_sends_state() {
        let table = table(4);
        let first = Arc::new(Mailbox::new());
        let seating = table.join(first.clone()).unwrap();
        assert_eq!(seating.seat, 0);

        let messages = first.drain();
        assert_eq!(messages[0], ServerMessage::system("P1 has connected."));
        match &messages[1] {
            ServerMessage::GameState(view) => {
                assert_eq!(view.your_player_id.as_ref().unwrap().as_str(), "player1");
                assert_eq!(view.hand.len(), 13);
            }
            other => panic!("expected game state, got {other:?}"),
        }

        let second = Arc::new(Mailbox::new());
        assert_eq!(table.join(second.clone()).unwrap().seat, 1);
        let seen_by_first = first.drain();
        assert_eq!(seen_by_first[0], ServerMessage::system("P2 has connected."));
        assert_eq!(seen_by_first.len(), 2);
    }

    #[test]
    fn full_table_refuses_with_error() {
        let table = table(2);
        table.join(Arc::new(Mailbox::new())).unwrap();
        table.join(Arc::new(Mailbox::new())).unwrap();
        let late = Arc::new(Mailbox::new());
        assert_eq!(table.join(late.clone()), Err(TableError::Full));
        assert_eq!(
            late.drain(),
            vec![ServerMessage::error("Sorry, the game is full or not available.")]
        );
    }

    #[test]
    fn leave_frees_seat_and_keeps_match() {
        let table = table(2);
        let a = Arc::new(Mailbox::new());
        let b = Arc::new(Mailbox::new());
        let seat_a = table.join(a.clone()).unwrap();
        table.join(b.clone()).unwrap();
        let before = table.view_for(Some(0));
        b.drain();

        assert_eq!(table.leave(seat_a.id), Ok(0));
        assert_eq!(b.drain(), vec![ServerMessage::system("P1 has disconnected.")]);
        assert_eq!(table.view_for(Some(0)), before);
        assert_eq!(table.leave(seat_a.id), Err(TableError::UnknownConnection(seat_a.id)));

        let c = Arc::new(Mailbox::new());
        assert_eq!(table.join(c).unwrap().seat, 0);
    }

    #[test]
    fn rejected_action_only_reaches_sender() {
        let table = table(2);
        let a = Arc::new(Mailbox::new());
        let b = Arc::new(Mailbox::new());
        let seat_a = table.join(a.clone()).unwrap();
        let seat_b = table.join(b.clone()).unwrap();
        a.drain();
        b.drain();

        let leader = table.inspect(|state| state.turn());
        let idle = if leader == 0 { seat_b } else { seat_a };
        let idle_box = if leader == 0 { &b } else { &a };
        let other_box = if leader == 0 { &a } else { &b };

        let handled = table.handle(idle.id, ClientMessage::PassTurn).unwrap();
        assert!(matches!(handled, Handled::Rejected(_)));
        let replies = idle_box.drain();
        assert_eq!(replies.len(), 1);
        assert!(matches!(&replies[0], ServerMessage::Error { content } if content.starts_with("It's not your turn")));
        assert!(other_box.is_empty());
    }

    #[test]
    fn accepted_action_broadcasts_personal_views() {
        let table = table(2);
        let a = Arc::new(Mailbox::new());
        let b = Arc::new(Mailbox::new());
        let seat_a = table.join(a.clone()).unwrap();
        let seat_b = table.join(b.clone()).unwrap();
        a.drain();
        b.drain();

        let (leader, card) = table.inspect(|state| {
            let seat = state.turn();
            (seat, state.players()[seat].hand().lowest().unwrap())
        });
        let id = if leader == 0 { seat_a.id } else { seat_b.id };
        let handled = table
            .handle(id, ClientMessage::PlayCards { cards: vec![card] })
            .unwrap();
        assert!(matches!(handled, Handled::Applied(Outcome::Played { .. })));

        for (mailbox, seat) in [(&a, 0usize), (&b, 1usize)] {
            let messages = mailbox.drain();
            assert_eq!(messages.len(), 1);
            let ServerMessage::GameState(view) = &messages[0] else {
                panic!("expected game state");
            };
            assert_eq!(view.players[seat].id, view.your_player_id.clone().unwrap());
            assert!(view.last_played_hand.is_some());
        }
    }

    #[test]
    fn chat_is_relayed_with_name_and_id() {
        let table = table(2);
        let a = Arc::new(Mailbox::new());
        let b = Arc::new(Mailbox::new());
        let seat_a = table.join(a.clone()).unwrap();
        table.join(b.clone()).unwrap();
        a.drain();
        b.drain();

        table
            .handle(seat_a.id, ClientMessage::SetAlias { alias: "Ana".into() })
            .unwrap();
        b.drain();
        assert_eq!(
            table.handle_json(seat_a.id, r#"{"type":"chat","content":"hello"}"#),
            Ok(Handled::Chat)
        );
        let expected = ServerMessage::Chat {
            sender: "Ana (player1)".into(),
            content: "hello".into(),
        };
        assert_eq!(b.drain(), vec![expected]);
    }

    #[test]
    fn protocol_errors_reach_sender_only() {
        let table = table(2);
        let a = Arc::new(Mailbox::new());
        let b = Arc::new(Mailbox::new());
        let seat_a = table.join(a.clone()).unwrap();
        table.join(b.clone()).unwrap();
        a.drain();
        b.drain();

        let handled = table.handle_json(seat_a.id, r#"{"type":"dance"}"#).unwrap();
        assert_eq!(handled, Handled::Rejected("Unknown message type: dance".into()));
        assert_eq!(a.drain(), vec![ServerMessage::error("Unknown message type: dance")]);
        assert!(b.is_empty());
    }

    #[test]
    fn failed_delivery_does_not_block_others() {
        let table = table(2);
        let a = Arc::new(Mailbox::new());
        let b = Arc::new(Mailbox::new());
        let seat_a = table.join(a.clone()).unwrap();
        table.join(b.clone()).unwrap();
        b.drain();
        a.close();
        table
            .handle(seat_a.id, ClientMessage::SetAlias { alias: "Zed".into() })
            .unwrap();
        assert_eq!(b.len(), 1);
    }
}
