pub mod card;
pub mod category;
pub mod deck;
pub mod hand;
pub mod played;
pub mod player;
pub mod rank;
pub mod score;
pub mod suit;
