//! Logging setup and timing utilities.

mod logging;
mod timer;

pub use logging::init_logging;
pub use timer::SpanTimer;
