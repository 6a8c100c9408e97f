use bigtwo_core::game::action::Action;
use bigtwo_core::game::view::MatchView;
use bigtwo_core::model::card::Card;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Sender name used for table announcements.
pub const SYSTEM_SENDER: &str = "System";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    PlayCards { cards: Vec<Card> },
    PassTurn,
    NewGame,
    SetAlias { alias: String },
    Chat { content: String },
}

impl ClientMessage {
    /// Parses one inbound frame, telling apart broken JSON, a missing or
    /// unknown `type`, and a known type with a bad payload.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| ProtocolError::Malformed)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?
            .to_string();
        if !Self::KINDS.contains(&kind.as_str()) {
            return Err(ProtocolError::UnknownType(kind));
        }
        serde_json::from_value(value).map_err(|err| ProtocolError::InvalidPayload {
            kind,
            reason: err.to_string(),
        })
    }

    const KINDS: [&'static str; 5] = ["playCards", "passTurn", "newGame", "setAlias", "chat"];

    /// Splits match actions from chat, which never touches the match.
    pub fn into_request(self) -> Request {
        match self {
            ClientMessage::PlayCards { cards } => Request::Act(Action::PlayCards(cards)),
            ClientMessage::PassTurn => Request::Act(Action::PassTurn),
            ClientMessage::NewGame => Request::Act(Action::NewGame),
            ClientMessage::SetAlias { alias } => Request::Act(Action::SetAlias(alias)),
            ClientMessage::Chat { content } => Request::Chat(content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Act(Action),
    Chat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    GameState(MatchView),
    Error { content: String },
    Chat { sender: String, content: String },
}

impl ServerMessage {
    pub fn error(content: impl Into<String>) -> Self {
        ServerMessage::Error {
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        ServerMessage::Chat {
            sender: SYSTEM_SENDER.to_string(),
            content: content.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::GameState(_) => "gameState",
            ServerMessage::Error { .. } => "error",
            ServerMessage::Chat { .. } => "chat",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A frame that could not be turned into a [`ClientMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Malformed JSON.")]
    Malformed,
    #[error("Message missing 'type' field.")]
    MissingType,
    #[error("Unknown message type: {0}")]
    UnknownType(String),
    #[error("Invalid {kind} message: {reason}")]
    InvalidPayload { kind: String, reason: String },
}
