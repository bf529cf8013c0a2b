use std::collections::BTreeMap;

use tracing::trace;

use crate::layout::TargetId;

/// Step granularity for per-target countdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayConfig {
    pub duration_ms: u32,
    /// Amount removed from a countdown on every step
    pub step_ms: u32,
    /// Game time between two steps of one countdown
    pub interval_ms: u32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            duration_ms: 3000,
            step_ms: 100,
            interval_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Countdown {
    remaining_ms: u32,
    // game time accumulated since this countdown's last step
    carry_ms: u32,
}

impl Countdown {
    fn is_expired(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Returns true when this step expired the countdown
    fn step(&mut self, step_ms: u32) -> bool {
        if self.is_expired() {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(step_ms);
        self.is_expired()
    }
}

/// Registry of per-target countdowns.
///
/// Every activated target owns one entry, keyed by id. An entry at zero is
/// terminal and stays in the registry frozen at zero.
#[derive(Debug, Clone, Default)]
pub struct DecayTimers {
    config: DecayConfig,
    timers: BTreeMap<TargetId, Countdown>,
}

impl DecayTimers {
    pub fn new(config: DecayConfig) -> Self {
        Self {
            config,
            timers: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> DecayConfig {
        self.config
    }

    /// Start a countdown for `id` unless one already exists
    pub fn on_activate(&mut self, id: TargetId) {
        self.timers.entry(id).or_insert(Countdown {
            remaining_ms: self.config.duration_ms,
            carry_ms: 0,
        });
    }

    /// Step every running countdown once
    pub fn tick(&mut self) {
        let step_ms = self.config.step_ms;
        for (id, countdown) in self.timers.iter_mut() {
            if countdown.step(step_ms) {
                trace!(target_id = id, "decay finished");
            }
        }
    }

    /// Let `delta_ms` of game time pass. Each countdown steps on its own
    /// interval boundaries, measured from its own activation.
    pub fn advance(&mut self, delta_ms: u32) {
        let DecayConfig {
            step_ms,
            interval_ms,
            ..
        } = self.config;
        let interval_ms = interval_ms.max(1);

        for (id, countdown) in self.timers.iter_mut() {
            if countdown.is_expired() {
                continue;
            }
            countdown.carry_ms = countdown.carry_ms.saturating_add(delta_ms);
            while countdown.carry_ms >= interval_ms && !countdown.is_expired() {
                countdown.carry_ms -= interval_ms;
                if countdown.step(step_ms) {
                    trace!(target_id = id, "decay finished");
                }
            }
            if countdown.is_expired() {
                countdown.carry_ms = 0;
            }
        }
    }

    /// Drop every countdown
    pub fn reset(&mut self) {
        self.timers.clear();
    }

    pub fn remaining_ms(&self, id: TargetId) -> Option<u32> {
        self.timers.get(&id).map(|c| c.remaining_ms)
    }

    pub fn is_expired(&self, id: TargetId) -> bool {
        self.timers.get(&id).is_some_and(Countdown::is_expired)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, u32)> + '_ {
        self.timers.iter().map(|(id, c)| (*id, c.remaining_ms))
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timers() -> DecayTimers {
        DecayTimers::new(DecayConfig::default())
    }

    #[test]
    fn test_on_activate_starts_at_full_duration() {
        let mut t = timers();
        t.on_activate(3);
        assert_eq!(t.remaining_ms(3), Some(3000));
        assert_eq!(t.remaining_ms(4), None);
    }

    #[test]
    fn test_on_activate_twice_keeps_running_countdown() {
        let mut t = timers();
        t.on_activate(1);
        t.tick();
        t.on_activate(1);
        assert_eq!(t.remaining_ms(1), Some(2900));
    }

    #[test]
    fn test_tick_clamps_to_zero_and_stays_terminal() {
        let mut t = DecayTimers::new(DecayConfig {
            duration_ms: 250,
            step_ms: 100,
            interval_ms: 50,
        });
        t.on_activate(1);
        t.tick();
        t.tick();
        assert_eq!(t.remaining_ms(1), Some(50));
        t.tick();
        assert_eq!(t.remaining_ms(1), Some(0));
        assert!(t.is_expired(1));
        t.tick();
        assert_eq!(t.remaining_ms(1), Some(0));
    }

    #[test]
    fn test_advance_steps_per_interval() {
        let mut t = timers();
        t.on_activate(1);
        // 50ms interval, 100ms step: 3000ms of countdown drains in 1.5s
        t.advance(49);
        assert_eq!(t.remaining_ms(1), Some(3000));
        t.advance(1);
        assert_eq!(t.remaining_ms(1), Some(2900));
        t.advance(1450);
        assert_eq!(t.remaining_ms(1), Some(0));
    }

    #[test]
    fn test_advance_keeps_independent_phases() {
        let mut t = timers();
        t.on_activate(1);
        t.advance(30);
        t.on_activate(2);
        t.advance(20);
        // timer 1 crossed its first boundary, timer 2 has not
        assert_eq!(t.remaining_ms(1), Some(2900));
        assert_eq!(t.remaining_ms(2), Some(3000));
        t.advance(30);
        assert_eq!(t.remaining_ms(1), Some(2900));
        assert_eq!(t.remaining_ms(2), Some(2900));
    }

    #[test]
    fn test_expiry_does_not_touch_other_timers() {
        let mut t = timers();
        t.on_activate(1);
        t.advance(1000);
        t.on_activate(2);
        t.advance(500);
        assert_eq!(t.remaining_ms(1), Some(0));
        assert_eq!(t.remaining_ms(2), Some(2000));
        t.advance(50);
        assert_eq!(t.remaining_ms(1), Some(0));
        assert_eq!(t.remaining_ms(2), Some(1900));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut t = timers();
        t.on_activate(1);
        t.on_activate(2);
        t.reset();
        assert!(t.is_empty());
        t.tick();
        t.advance(10_000);
        assert!(t.is_empty());
    }

    #[test]
    fn test_advance_with_huge_delta_expires() {
        let mut t = timers();
        t.on_activate(1);
        t.advance(30);
        t.on_activate(2);
        t.advance(u32::MAX);
        assert!(t.is_expired(1));
        assert!(t.is_expired(2));
    }

    #[test]
    fn test_iter_is_ordered_by_id() {
        let mut t = timers();
        t.on_activate(5);
        t.on_activate(2);
        let ids: Vec<TargetId> = t.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 5]);
    }
}
