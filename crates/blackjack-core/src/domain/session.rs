//! Per-connection session state: who is playing, how many rounds, and the tally.
//!
//! Both sides keep a [`Session`]: the server one per accepted connection, the
//! client exactly one per process.  It is owned by a single task and never
//! shared, so it needs no locking.

use super::round::{validate_rounds, RoundStatus};
use super::DomainError;

/// Clamps a user-supplied round count into the wire range `1..=255`.
pub fn clamp_rounds(requested: i64) -> u8 {
    requested.clamp(1, i64::from(u8::MAX)) as u8
}

/// Win/loss/tie counters, from the player's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl SessionTally {
    /// Adds one resolved round.  `Continue` is not an outcome and is ignored.
    pub fn record(&mut self, status: RoundStatus) {
        match status {
            RoundStatus::Win => self.wins += 1,
            RoundStatus::Loss => self.losses += 1,
            RoundStatus::Tie => self.ties += 1,
            RoundStatus::Continue => {}
        }
    }

    pub fn played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Fraction of rounds won, `0.0` before any round is played.
    pub fn win_rate(&self) -> f64 {
        match self.played() {
            0 => 0.0,
            n => f64::from(self.wins) / f64::from(n),
        }
    }
}

/// State for one team's sequence of rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    team_name: String,
    rounds_requested: u8,
    rounds_completed: u8,
    tally: SessionTally,
}

impl Session {
    /// Starts a session.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRoundCount`] when `rounds_requested` is 0.
    pub fn new(team_name: impl Into<String>, rounds_requested: u8) -> Result<Self, DomainError> {
        Ok(Self {
            team_name: team_name.into(),
            rounds_requested: validate_rounds(rounds_requested)?,
            rounds_completed: 0,
            tally: SessionTally::default(),
        })
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn rounds_requested(&self) -> u8 {
        self.rounds_requested
    }

    pub fn rounds_completed(&self) -> u8 {
        self.rounds_completed
    }

    pub fn tally(&self) -> SessionTally {
        self.tally
    }

    pub fn is_complete(&self) -> bool {
        self.rounds_completed >= self.rounds_requested
    }

    /// Records a finished round.
    ///
    /// Returns `false` (and records nothing) for a non-terminal status or
    /// once every requested round has been played.
    pub fn record_round(&mut self, status: RoundStatus) -> bool {
        if !status.is_terminal() || self.is_complete() {
            return false;
        }
        self.rounds_completed += 1;
        self.tally.record(status);
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
