//! Session score and the one-shot parade flags.

use serde::{Deserialize, Serialize};

use crate::constants::{PARADE_SCORE_THRESHOLD, SCORE_PER_PAIR};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    score: u32,
    parade_triggered: bool,
    parade_in_progress: bool,
    pub pairs_solved: u32,
    pub pairs_missed: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn parade_triggered(&self) -> bool {
        self.parade_triggered
    }

    pub fn parade_in_progress(&self) -> bool {
        self.parade_in_progress
    }

    /// Credit a solved pair. True when this success should arm the parade.
    pub fn award_pair(&mut self) -> bool {
        self.score = self.score.saturating_add(SCORE_PER_PAIR);
        self.pairs_solved += 1;
        self.score >= PARADE_SCORE_THRESHOLD && !self.parade_triggered && !self.parade_in_progress
    }

    pub fn record_miss(&mut self) {
        self.pairs_missed += 1;
    }

    /// Latch the one-shot trigger. Only the first call returns true.
    pub fn mark_parade_triggered(&mut self) -> bool {
        if self.parade_triggered {
            return false;
        }
        self.parade_triggered = true;
        true
    }

    pub fn set_parade_in_progress(&mut self, active: bool) {
        self.parade_in_progress = active;
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
