//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → connect broker → start consumers → wait for signal
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast to consumer tasks → close connection → exit 0
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful close
//! ```
//!
//! # Design Decisions
//! - Exactly two termination paths: signal (exit 0) and fatal startup
//!   error (exit 1)
//! - No cooperative drain of in-flight dispatches before exit

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::FatalError;
