//! Message-to-request transformation subsystem.
//!
//! # Data Flow
//! ```text
//! raw message bytes + binding
//!     → envelope.rs (parse & classify producer intent)
//!     → request.rs (assemble URL, headers, body)
//!     → OutgoingRequest (handed to the dispatcher)
//! ```
//!
//! # Design Decisions
//! - Transformation never fails; anything unparseable falls back to the
//!   default envelope
//! - Producer override is a tagged classification, decided once, not
//!   re-inspected downstream
//! - Header precedence: defaults, then binding auth and static headers,
//!   then message override headers last

pub mod envelope;
pub mod request;

pub use envelope::Envelope;
pub use request::{build_request, OutgoingRequest};
