use crate::decay::DecayTimers;
use crate::layout::{Target, TargetId};
use crate::session::{Outcome, Phase};

/// Read-only view of a session, taken once per rendering pass
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub elapsed_secs: f64,
    pub expected_next: TargetId,
    pub target_count: u32,
    pub activated: &'a [TargetId],
    pub targets: &'a [Target],
    pub remaining: &'a DecayTimers,
    pub autoplay: bool,
    pub has_started: bool,
}

/// Headline shown above the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    LetsPlay,
    AllCleared,
    GameOver,
}

impl Banner {
    pub fn text(&self) -> &'static str {
        match self {
            Banner::LetsPlay => "LET'S PLAY",
            Banner::AllCleared => "ALL CLEARED",
            Banner::GameOver => "GAME OVER",
        }
    }
}

impl<'a> Snapshot<'a> {
    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    pub fn banner(&self) -> Banner {
        match self.phase {
            Phase::Ended(Outcome::Cleared) => Banner::AllCleared,
            Phase::Ended(Outcome::Failed) => Banner::GameOver,
            Phase::Idle | Phase::Playing => Banner::LetsPlay,
        }
    }

    pub fn start_label(&self) -> &'static str {
        if self.has_started {
            "Restart"
        } else {
            "Play"
        }
    }

    pub fn autoplay_label(&self) -> Option<&'static str> {
        match (self.is_playing(), self.autoplay) {
            (false, _) => None,
            (true, true) => Some("Auto Play ON"),
            (true, false) => Some("Auto Play OFF"),
        }
    }

    /// Hidden outside play and once the last target has been hit
    pub fn next_label(&self) -> Option<String> {
        (self.is_playing() && self.expected_next <= self.target_count)
            .then(|| format!("Next: {}", self.expected_next))
    }

    /// Targets hit so far out of the round's total, once a round has run
    pub fn hits_label(&self) -> Option<String> {
        self.has_started
            .then(|| format!("{}/{}", self.activated.len(), self.targets.len()))
    }

    pub fn elapsed_label(&self) -> String {
        format!("{:.1}s", self.elapsed_secs)
    }

    pub fn is_activated(&self, id: TargetId) -> bool {
        self.remaining.remaining_ms(id).is_some()
    }

    /// Faded-out targets are gone for good
    pub fn is_visible(&self, id: TargetId) -> bool {
        !self.remaining.is_expired(id)
    }

    /// 1.0 until activated, then shrinking with the countdown
    pub fn opacity(&self, id: TargetId) -> f64 {
        let duration = self.remaining.config().duration_ms;
        match self.remaining.remaining_ms(id) {
            Some(_) if duration == 0 => 0.0,
            Some(ms) => f64::from(ms) / f64::from(duration),
            None => 1.0,
        }
    }

    pub fn countdown_label(&self, id: TargetId) -> Option<String> {
        self.remaining
            .remaining_ms(id)
            .map(|ms| format!("{:.1}s", f64::from(ms) / 1000.0))
    }

    pub fn visible_targets(&self) -> impl Iterator<Item = &'a Target> + 'a {
        let snapshot = *self;
        self.targets
            .iter()
            .filter(move |t| snapshot.is_visible(t.id))
    }
}
