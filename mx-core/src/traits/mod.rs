//! Core trait definitions.
//!
//! - transport - [`Transport`], the HTTP collaborator the adapter sends through
//! - exchange - [`ExchangeApi`], the unified trading interface, and [`Credentials`]

mod exchange;
mod transport;

pub use exchange::{Credentials, ExchangeApi};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
