//! Primitive wrappers shared by the canonical model.
//!
//! - [`Timestamp`] - Unix millisecond timestamps with ISO-8601 rendering

mod timestamp;

pub use timestamp::Timestamp;
