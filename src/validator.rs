use crate::layout::TargetId;

/// Ordering progress the validator checks activations against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub expected_next: TargetId,
    pub target_count: u32,
}

impl Progress {
    pub fn new(target_count: u32) -> Self {
        Self {
            expected_next: 1,
            target_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Verdict {
    /// Correct target, more remain
    Advance,
    /// Correct target and it was the last one
    Complete,
    /// Any id other than the expected one
    Mismatch,
}

pub fn validate(target_id: TargetId, progress: &Progress) -> Verdict {
    if target_id != progress.expected_next {
        Verdict::Mismatch
    } else if progress.expected_next == progress.target_count {
        Verdict::Complete
    } else {
        Verdict::Advance
    }
}
