pub mod action;
pub mod config;
pub mod error;
pub mod match_state;
pub mod view;
