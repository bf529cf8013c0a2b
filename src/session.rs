use std::collections::HashSet;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, trace};

use crate::autoplay::Autoplay;
use crate::decay::{DecayConfig, DecayTimers};
use crate::layout::{self, LayoutRules, Target, TargetId};
use crate::snapshot::Snapshot;
use crate::validator::{self, Progress, Verdict};

pub const DEFAULT_TARGET_COUNT: u32 = 5;
pub const MAX_TARGET_COUNT: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Outcome {
    Cleared,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    Ended(Outcome),
}

impl Phase {
    pub fn is_playing(&self) -> bool {
        matches!(self, Phase::Playing)
    }
}

/// Every timing and placement constant the engine uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub decay: DecayConfig,
    /// Resolution of the elapsed clock
    pub clock_step_ms: u32,
    pub grace_delay_ms: u32,
    pub autoplay_delay_ms: u32,
    pub layout: LayoutRules,
    pub max_target_count: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::with_decay(DecayConfig::default())
    }
}

impl Tuning {
    pub fn with_decay(decay: DecayConfig) -> Self {
        Self {
            decay,
            clock_step_ms: 100,
            grace_delay_ms: Self::grace_for(&decay),
            autoplay_delay_ms: 1000,
            layout: LayoutRules::default(),
            max_target_count: MAX_TARGET_COUNT,
        }
    }

    /// Time for the last target to fade out completely, plus six intervals
    /// of slack before the round is declared cleared
    pub fn grace_for(decay: &DecayConfig) -> u32 {
        let steps = decay.duration_ms / decay.step_ms.max(1);
        decay.interval_ms.saturating_mul(steps.saturating_add(6))
    }
}

/// One game of tap-the-numbers: layout, ordering, countdowns and outcome
#[derive(Debug)]
pub struct Session {
    tuning: Tuning,
    rng: StdRng,
    phase: Phase,
    target_count: u32,
    progress: Progress,
    targets: Vec<Target>,
    elapsed_steps: u64,
    clock_carry_ms: u64,
    activated: Vec<TargetId>,
    activated_ids: HashSet<TargetId>,
    decay: DecayTimers,
    pending_clear_ms: Option<u32>,
    autoplay: Autoplay,
    has_started: bool,
    revision: u64,
}

impl Session {
    pub fn new(tuning: Tuning) -> Self {
        Self::with_rng(tuning, StdRng::from_entropy())
    }

    /// Deterministic layouts for a given seed
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(tuning, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tuning: Tuning, rng: StdRng) -> Self {
        Self {
            rng,
            phase: Phase::Idle,
            target_count: DEFAULT_TARGET_COUNT,
            progress: Progress::new(DEFAULT_TARGET_COUNT),
            targets: Vec::new(),
            elapsed_steps: 0,
            clock_carry_ms: 0,
            activated: Vec::new(),
            activated_ids: HashSet::new(),
            decay: DecayTimers::new(tuning.decay),
            pending_clear_ms: None,
            autoplay: Autoplay::new(tuning.autoplay_delay_ms),
            has_started: false,
            revision: 0,
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    pub fn expected_next(&self) -> TargetId {
        self.progress.expected_next
    }

    pub fn activated(&self) -> &[TargetId] {
        &self.activated
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn remaining_ms(&self, id: TargetId) -> Option<u32> {
        self.decay.remaining_ms(id)
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay.is_enabled()
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.elapsed_steps * u64::from(self.tuning.clock_step_ms)) as f64 / 1000.0
    }

    /// Bumped on every observable change; renderers redraw when it moves
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            elapsed_secs: self.elapsed_secs(),
            expected_next: self.progress.expected_next,
            target_count: self.target_count,
            activated: &self.activated,
            targets: &self.targets,
            remaining: &self.decay,
            autoplay: self.autoplay.is_enabled(),
            has_started: self.has_started,
        }
    }

    /// Set the number of targets for the next round.
    ///
    /// Ignored while a round is in play or when the count is out of range.
    pub fn configure(&mut self, target_count: u32) {
        if self.phase.is_playing() {
            return;
        }
        if target_count == 0 || target_count > self.tuning.max_target_count {
            debug!(target_count, "ignoring out-of-range target count");
            return;
        }
        if self.target_count != target_count {
            debug!(target_count, "configured");
            self.target_count = target_count;
            self.touch();
        }
    }

    /// Begin a fresh round, discarding everything from the previous one
    pub fn start(&mut self) {
        self.decay.reset();
        self.autoplay.disable();
        self.pending_clear_ms = None;
        self.activated.clear();
        self.activated_ids.clear();
        self.elapsed_steps = 0;
        self.clock_carry_ms = 0;
        self.progress = Progress::new(self.target_count);
        self.targets = layout::generate(self.target_count, &self.tuning.layout, &mut self.rng);
        self.phase = Phase::Playing;
        self.has_started = true;
        self.touch();

        debug!(target_count = self.target_count, "round started");
    }

    pub fn activate(&mut self, id: TargetId) {
        if !self.phase.is_playing()
            || id == 0
            || id > self.progress.target_count
            || self.activated_ids.contains(&id)
        {
            return;
        }

        self.activated.push(id);
        self.activated_ids.insert(id);
        self.decay.on_activate(id);

        let verdict = validator::validate(id, &self.progress);
        trace!(target_id = id, %verdict, "activated");

        match verdict {
            Verdict::Advance => {
                self.progress.expected_next += 1;
                self.autoplay.arm();
            }
            Verdict::Complete => {
                self.progress.expected_next += 1;
                self.pending_clear_ms = Some(self.tuning.grace_delay_ms);
                self.autoplay.arm();
            }
            Verdict::Mismatch => {
                self.finish(Outcome::Failed);
            }
        }
        self.touch();
    }

    pub fn toggle_autoplay(&mut self) {
        if !self.phase.is_playing() {
            return;
        }
        let enabled = self.autoplay.toggle();
        debug!(enabled, "autoplay toggled");
        self.touch();
    }

    /// Let `delta_ms` of game time pass. Nothing moves outside of play.
    pub fn tick(&mut self, delta_ms: u32) {
        if !self.phase.is_playing() || delta_ms == 0 {
            return;
        }

        self.advance_clock(delta_ms);
        self.decay.advance(delta_ms);
        self.touch();

        if let Some(left) = self.pending_clear_ms {
            if left <= delta_ms {
                self.finish(Outcome::Cleared);
                return;
            }
            self.pending_clear_ms = Some(left - delta_ms);
        }

        if self.autoplay.advance(delta_ms) {
            self.activate(self.progress.expected_next);
        }
    }

    fn advance_clock(&mut self, delta_ms: u32) {
        let step_ms = u64::from(self.tuning.clock_step_ms.max(1));
        let total = self.clock_carry_ms + u64::from(delta_ms);
        self.elapsed_steps += total / step_ms;
        self.clock_carry_ms = total % step_ms;
    }

    fn finish(&mut self, outcome: Outcome) {
        self.phase = Phase::Ended(outcome);
        self.pending_clear_ms = None;
        self.autoplay.cancel();
        info!(
            %outcome,
            elapsed_secs = self.elapsed_secs(),
            activated = self.activated.len(),
            "round over"
        );
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}
