/// Single-shot delay that fires an automatic activation.
///
/// The driver only tracks time; the session decides what firing means and
/// re-arms it after every activation.
#[derive(Debug, Clone, Default)]
pub struct Autoplay {
    enabled: bool,
    delay_ms: u32,
    pending_ms: Option<u32>,
}

impl Autoplay {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            enabled: false,
            delay_ms,
            pending_ms: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if self.enabled {
            self.arm();
        } else {
            self.cancel();
        }
        self.enabled
    }

    /// Restart the delay; ignored while disabled
    pub fn arm(&mut self) {
        if self.enabled {
            self.pending_ms = Some(self.delay_ms);
        }
    }

    pub fn cancel(&mut self) {
        self.pending_ms = None;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.cancel();
    }

    /// Count down; returns true once when the delay runs out
    pub fn advance(&mut self, delta_ms: u32) -> bool {
        match self.pending_ms {
            Some(left) if left <= delta_ms => {
                self.pending_ms = None;
                true
            }
            Some(left) => {
                self.pending_ms = Some(left - delta_ms);
                false
            }
            None => false,
        }
    }
}
