//! Port definitions — traits for the collaborators the core talks to.
//!
//! Ports are the boundaries between the application core and the outside
//! world. Concrete implementations are constructed by the caller and
//! injected, never reached through ambient global state.

pub mod hook;
pub mod log_sink;
pub mod notifier;

pub use hook::Hook;
pub use log_sink::{LogSink, MemorySink, SharedSink, TracingSink};
pub use notifier::{Notifier, SinkNotifier};
