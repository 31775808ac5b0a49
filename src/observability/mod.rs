//! Observability for the hash record service
//!
//! # Principles
//!
//! 1. Observability is read-only — no side effects on execution
//! 2. Events are explicit and typed
//! 3. Logging is synchronous, one line per event
//! 4. The sink is injected into each service; there is no process-wide logger
//!
//! # Usage
//!
//! ```ignore
//! use hashledger::observability::{Event, JsonLogger, LogSink, Severity};
//!
//! let sink = JsonLogger::stdout();
//! sink.log(Severity::Info, Event::CreateComplete.as_str(), &[("id", "dev-001")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{CaptureSink, JsonLogger, LogSink, NullSink, Severity};
