use std::fs;
use std::path::Path;

use bigtwo_bot::BotStyle;
use thiserror::Error;

/// Per-agent aggregates for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSummary {
    pub name: String,
    pub style: BotStyle,
    pub matches: usize,
    pub matches_won: usize,
    pub rounds: usize,
    pub rounds_won: usize,
    pub total_penalty: u64,
}

impl AgentSummary {
    pub fn avg_penalty_per_round(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.total_penalty as f64 / self.rounds as f64
        }
    }

    pub fn match_win_rate(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.matches_won as f64 / self.matches as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryCollector {
    agents: Vec<AgentSummary>,
}

impl SummaryCollector {
    pub fn new(agents: impl IntoIterator<Item = (String, BotStyle)>) -> Self {
        let agents = agents
            .into_iter()
            .map(|(name, style)| AgentSummary {
                name,
                style,
                matches: 0,
                matches_won: 0,
                rounds: 0,
                rounds_won: 0,
                total_penalty: 0,
            })
            .collect();
        Self { agents }
    }

    pub fn record_round(&mut self, seat: usize, penalty: u32, won: bool) {
        if let Some(agent) = self.agents.get_mut(seat) {
            agent.rounds += 1;
            agent.total_penalty += u64::from(penalty);
            if won {
                agent.rounds_won += 1;
            }
        }
    }

    pub fn record_match(&mut self, winner: Option<usize>) {
        for (seat, agent) in self.agents.iter_mut().enumerate() {
            agent.matches += 1;
            if winner == Some(seat) {
                agent.matches_won += 1;
            }
        }
    }

    pub fn agents(&self) -> &[AgentSummary] {
        &self.agents
    }

    pub fn write_markdown(&self, run_id: &str, path: impl AsRef<Path>) -> Result<(), SummaryError> {
        let mut rows = String::new();
        rows.push_str(&format!("# Match Summary: {run_id}\n\n"));
        rows.push_str("| Agent | Style | Matches | Match Wins | Win % | Rounds | Rounds Won | Avg Penalty/Round |\n");
        rows.push_str("|-------|-------|---------|------------|-------|--------|------------|-------------------|\n");

        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {style} | {matches} | {wins} | {rate:.1}% | {rounds} | {rounds_won} | {avg:.3} |\n",
                name = agent.name,
                style = agent.style,
                matches = agent.matches,
                wins = agent.matches_won,
                rate = agent.match_win_rate() * 100.0,
                rounds = agent.rounds,
                rounds_won = agent.rounds_won,
                avg = agent.avg_penalty_per_round(),
            ));
        }

        fs::write(path.as_ref(), rows).map_err(|e| SummaryError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}
