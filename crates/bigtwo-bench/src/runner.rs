use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bigtwo_bot::{BotStyle, Decision, HeuristicPolicy, Policy, PolicyContext};
use bigtwo_core::game::action::Outcome;
use bigtwo_core::game::match_state::{MatchPhase, MatchState};
use bigtwo_table::{ClientMessage, ConnectionId, Handled, Mailbox, Table, TableError};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs};
use crate::summary::{SummaryCollector, SummaryError};

/// Plays seeded bot-only matches through a [`Table`] and records the results.
pub struct MatchRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub base_seed: u64,
    pub matches_played: usize,
    pub rounds_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

#[derive(Debug, Clone)]
struct AgentBlueprint {
    name: String,
    style: BotStyle,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, RunnerError> {
        configs
            .iter()
            .map(|cfg| match cfg.kind {
                AgentKind::Heuristic => {
                    let style = cfg.style().map_err(|err| RunnerError::Agent {
                        name: cfg.name.clone(),
                        message: err.to_string(),
                    })?;
                    Ok(Self {
                        name: cfg.name.clone(),
                        style,
                    })
                }
            })
            .collect()
    }
}

/// One agent's view of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SeatResult {
    penalty: u32,
    cards_left: usize,
    total_after: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RoundResult {
    round_number: u32,
    winner: usize,
    seats: Vec<SeatResult>,
}

impl RoundResult {
    fn capture(state: &MatchState) -> Option<Self> {
        let record = state.history().last()?;
        let seats = state
            .players()
            .iter()
            .enumerate()
            .map(|(seat, player)| SeatResult {
                penalty: record.penalties.get(player.id()).copied().unwrap_or(0),
                cards_left: player.card_count(),
                total_after: state.scores().score(seat),
            })
            .collect();
        Some(Self {
            round_number: record.round_number,
            winner: record.winner,
            seats,
        })
    }
}

struct PlayedMatch {
    rounds: Vec<RoundResult>,
    winner: Option<usize>,
    actions: usize,
}

struct SeatDriver {
    id: ConnectionId,
    mailbox: Arc<Mailbox>,
    policy: HeuristicPolicy,
}

#[derive(Serialize)]
struct RoundRow<'a> {
    run_id: &'a str,
    match_index: usize,
    match_seed: u64,
    round: u32,
    seat: usize,
    agent: &'a str,
    style: &'static str,
    cards_left: usize,
    penalty: u32,
    total_after: u32,
    won_round: bool,
}

impl MatchRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        if agents.len() != config.table.players {
            return Err(RunnerError::SeatCount {
                seats: config.table.players,
                found: agents.len(),
            });
        }
        Ok(Self {
            config,
            outputs,
            agents,
        })
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let base_seed = self.config.deals.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(base_seed);
        let mut summary =
            SummaryCollector::new(self.agents.iter().map(|a| (a.name.clone(), a.style)));

        event!(
            Level::INFO,
            run_id = %self.config.run_id,
            base_seed,
            matches = self.config.deals.matches,
            "run started"
        );

        let mut rows_written = 0;
        let mut rounds_played = 0;
        for match_index in 0..self.config.deals.matches {
            let match_seed = rng.next_u64();
            let played = self.play_match(match_index, match_seed)?;

            for round in &played.rounds {
                rows_written += self.write_round_rows(&mut writer, match_index, match_seed, round)?;
                for (seat, result) in round.seats.iter().enumerate() {
                    summary.record_round(seat, result.penalty, seat == round.winner);
                }
            }
            rounds_played += played.rounds.len();
            summary.record_match(played.winner);

            event!(
                Level::INFO,
                run_id = %self.config.run_id,
                match_index,
                match_seed,
                rounds = played.rounds.len(),
                actions = played.actions,
                winner = ?played.winner.map(|seat| self.agents[seat].name.as_str()),
                "match complete"
            );
        }

        writer.flush()?;
        summary.write_markdown(&self.config.run_id, &self.outputs.summary_md)?;

        Ok(RunSummary {
            base_seed,
            matches_played: self.config.deals.matches,
            rounds_played,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn play_match(&self, match_index: usize, match_seed: u64) -> Result<PlayedMatch, RunnerError> {
        let table = Table::new(self.config.match_config(match_seed))?;
        let mut seats: Vec<SeatDriver> = Vec::with_capacity(self.agents.len());
        for (index, agent) in self.agents.iter().enumerate() {
            let mailbox = Arc::new(Mailbox::new());
            let seating = table.join(mailbox.clone())?;
            if seating.seat != index {
                return Err(RunnerError::Game {
                    message: format!("agent {} was seated at {} instead of {index}", agent.name, seating.seat),
                });
            }
            table.handle(
                seating.id,
                ClientMessage::SetAlias {
                    alias: agent.name.clone(),
                },
            )?;
            seats.push(SeatDriver {
                id: seating.id,
                mailbox,
                policy: HeuristicPolicy::new(agent.style),
            });
        }

        let budget = self.config.deals.max_actions;
        let mut actions = 0;
        let mut rounds = Vec::new();
        loop {
            drain_all(&seats);
            let (phase, turn) = table.inspect(|state| (state.phase(), state.turn()));
            match phase {
                MatchPhase::MatchOver => break,
                MatchPhase::RoundOver => {
                    match table.handle(seats[0].id, ClientMessage::NewGame)? {
                        Handled::Applied(Outcome::NextRound { .. }) => continue,
                        other => {
                            return Err(RunnerError::Game {
                                message: format!("expected the next round to start, got {other:?}"),
                            });
                        }
                    }
                }
                MatchPhase::Playing => {}
            }

            if actions >= budget {
                return Err(RunnerError::ActionBudget {
                    match_index,
                    budget,
                });
            }

            let driver = &mut seats[turn];
            let decision = table.inspect(|state| {
                PolicyContext::from_state(state, turn).map(|ctx| driver.policy.choose(&ctx))
            });
            let message = match decision {
                Some(Decision::Play(cards)) => ClientMessage::PlayCards { cards },
                Some(Decision::Pass) => ClientMessage::PassTurn,
                None => {
                    return Err(RunnerError::Game {
                        message: format!("no player at seat {turn}"),
                    });
                }
            };

            match table.handle(driver.id, message)? {
                Handled::Applied(outcome) => {
                    actions += 1;
                    if let Outcome::RoundWon { winner, .. } = outcome {
                        let round = table.inspect(RoundResult::capture).ok_or_else(|| {
                            RunnerError::Game {
                                message: "round ended without a record".to_string(),
                            }
                        })?;
                        event!(
                            Level::DEBUG,
                            match_index,
                            round = round.round_number,
                            winner,
                            "round complete"
                        );
                        rounds.push(round);
                    }
                }
                Handled::Rejected(reason) => {
                    return Err(RunnerError::Game {
                        message: format!(
                            "seat {turn} made an illegal move in match {match_index}: {reason}"
                        ),
                    });
                }
                Handled::Chat => {}
            }
        }

        drain_all(&seats);
        Ok(PlayedMatch {
            rounds,
            winner: table.inspect(MatchState::match_winner),
            actions,
        })
    }

    fn write_round_rows(
        &self,
        writer: &mut BufWriter<File>,
        match_index: usize,
        match_seed: u64,
        round: &RoundResult,
    ) -> Result<usize, RunnerError> {
        for (seat, (agent, result)) in self.agents.iter().zip(&round.seats).enumerate() {
            let row = RoundRow {
                run_id: &self.config.run_id,
                match_index,
                match_seed,
                round: round.round_number,
                seat,
                agent: &agent.name,
                style: agent.style.as_str(),
                cards_left: result.cards_left,
                penalty: result.penalty,
                total_after: result.total_after,
                won_round: seat == round.winner,
            };
            serde_json::to_writer(&mut *writer, &row)?;
            writer.write_all(b"\n")?;
        }
        Ok(round.seats.len())
    }
}

/// Views pile up in every mailbox after each action; nobody reads them here.
fn drain_all(seats: &[SeatDriver]) {
    for seat in seats {
        seat.mailbox.drain();
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("agent {name}: {message}")]
    Agent { name: String, message: String },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("table error: {0}")]
    Table(#[from] TableError),
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("configuration has {seats} seats but {found} agents")]
    SeatCount { seats: usize, found: usize },
    #[error("match {match_index} exceeded the budget of {budget} actions")]
    ActionBudget { match_index: usize, budget: usize },
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),
}
