pub mod bot;
pub mod policy;

pub use bot::{BotStyle, UnknownStyle, legal_plays};
pub use policy::{Decision, HeuristicPolicy, Policy, PolicyContext};
