//! Observability: structured logging setup and span macros

pub mod logging;

pub use logging::{init_default_logging, init_logging, parse_level, LogFormat};
pub use logging::{connect_span, session_span};
