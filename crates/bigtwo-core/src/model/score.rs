//! End-of-round penalties and running match totals.

use crate::model::player::Player;

/// Penalty for finishing a round with `remaining` cards out of a dealt `hand_size`.
///
/// Untouched hands are tripled; 10 to 12 leftover cards are doubled.
pub fn round_penalty(remaining: usize, hand_size: usize) -> u32 {
    let base = remaining as u32;
    if remaining == 0 {
        0
    } else if remaining == hand_size {
        base * 3
    } else if (10..=12).contains(&remaining) {
        base * 2
    } else {
        base
    }
}

/// Per-seat penalties for a finished round. The winner holds no cards and scores 0.
pub fn score_round(players: &[Player], hand_size: usize) -> Vec<u32> {
    players
        .iter()
        .map(|player| round_penalty(player.card_count(), hand_size))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: Vec<u32>,
}

impl ScoreBoard {
    pub fn new(players: usize) -> Self {
        Self {
            totals: vec![0; players],
        }
    }

    pub fn add_penalty(&mut self, seat: usize, points: u32) {
        if let Some(total) = self.totals.get_mut(seat) {
            *total += points;
        }
    }

    pub fn score(&self, seat: usize) -> u32 {
        self.totals.get(seat).copied().unwrap_or(0)
    }

    pub fn standings(&self) -> &[u32] {
        &self.totals
    }

    pub fn apply_round(&mut self, penalties: &[u32]) {
        for (seat, points) in penalties.iter().copied().enumerate() {
            self.add_penalty(seat, points);
        }
    }

    /// Whether any seat's total has reached `target`.
    pub fn reached(&self, target: u32) -> bool {
        self.totals.iter().any(|&total| total >= target)
    }

    /// Seat with the lowest total; ties go to the earlier seat.
    pub fn leading_seat(&self) -> usize {
        self.totals
            .iter()
            .enumerate()
            .min_by_key(|(_, total)| **total)
            .map(|(seat, _)| seat)
            .unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.totals.iter_mut().for_each(|total| *total = 0);
    }
}
