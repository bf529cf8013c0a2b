// Library surface for the binary and for headless/integration tests.
// The engine modules (layout, decay, validator, session, autoplay) know
// nothing about terminals; app/ui/runtime are the presentation layer.
pub mod app;
pub mod autoplay;
pub mod config;
pub mod decay;
pub mod error;
pub mod layout;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod ui;
pub mod validator;

pub use app::{App, Flow};
pub use layout::{Target, TargetId};
pub use session::{Outcome, Phase, Session, Tuning};
pub use snapshot::Snapshot;

/// Interval between ticks of the event loop
pub const TICK_RATE_MS: u64 = 50;
