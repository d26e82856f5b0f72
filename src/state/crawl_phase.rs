/// Phase definitions for one (region, filter) crawl
use crate::HarvestError;
use std::fmt;

/// Represents the current phase of a single target crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Listing pages are being rendered and links merged into the frontier
    Discovering,

    /// Detail pages from the frontier are being fetched by the worker pool
    FanningOut,

    /// Records have been merged into the dataset; the target is done
    Merged,
}

impl CrawlPhase {
    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Merged)
    }

    /// Returns true if the transition `self -> next` is allowed
    ///
    /// Phases only move forward, one step at a time.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Discovering, Self::FanningOut) | (Self::FanningOut, Self::Merged)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovering => "discovering",
            Self::FanningOut => "fanning_out",
            Self::Merged => "merged",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Enforces forward-only phase transitions for one target
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    phase: CrawlPhase,
}

impl PhaseTracker {
    /// Starts a new target in `Discovering`
    pub fn new() -> Self {
        Self {
            phase: CrawlPhase::Discovering,
        }
    }

    /// Current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, rejecting anything but the next forward step
    pub fn advance(&mut self, next: CrawlPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
