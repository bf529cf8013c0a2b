use rand::Rng;

pub type TargetId = u32;

/// A numbered, positioned target. Coordinates are percentages of the play area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub x: f64,
    pub y: f64,
}

impl Target {
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt()
    }
}

/// Placement constraints for [`generate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRules {
    pub min_distance_percent: f64,
    pub max_attempts: u32,
    /// Only the most recently placed targets are checked for spacing
    pub recent_window: usize,
    pub margin_percent: f64,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            min_distance_percent: 8.0,
            max_attempts: 10,
            recent_window: 5,
            margin_percent: 5.0,
        }
    }
}

impl LayoutRules {
    pub fn new(min_distance_percent: f64, max_attempts: u32) -> Self {
        Self {
            min_distance_percent,
            max_attempts,
            ..Self::default()
        }
    }

    fn is_far_enough(&self, x: f64, y: f64, placed: &[Target]) -> bool {
        let window_start = placed.len().saturating_sub(self.recent_window);
        placed[window_start..]
            .iter()
            .all(|t| t.distance_to(x, y) >= self.min_distance_percent)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let span = (100.0 - 2.0 * self.margin_percent).max(0.0);
        (
            self.margin_percent + rng.gen::<f64>() * span,
            self.margin_percent + rng.gen::<f64>() * span,
        )
    }
}

/// Place `count` targets, generated from id `count` down to `1`.
///
/// Spacing is best-effort: once `max_attempts` samples have been rejected the
/// last one is kept, so this always terminates with exactly `count` targets.
pub fn generate<R: Rng + ?Sized>(count: u32, rules: &LayoutRules, rng: &mut R) -> Vec<Target> {
    let mut targets: Vec<Target> = Vec::with_capacity(count as usize);

    for id in (1..=count).rev() {
        let mut attempts = 0;
        let (x, y) = loop {
            let (x, y) = rules.sample(rng);
            attempts += 1;
            if attempts >= rules.max_attempts || rules.is_far_enough(x, y, &targets) {
                break (x, y);
            }
        };

        targets.push(Target { id, x, y });
    }

    targets
}
