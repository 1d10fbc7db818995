// Library surface for headless/integration tests and reuse.
// Terminal rendering lives in the binary (main.rs / ui.rs).
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod language;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod sequence;
pub mod session;
pub mod viewport;
pub mod word_generator;

pub use metrics::MetricsSnapshot;
pub use sequence::Mark;
pub use session::{Phase, SessionDuration};
pub use typing_test::{Change, SessionObserver, SessionStatus, TypingTest};
