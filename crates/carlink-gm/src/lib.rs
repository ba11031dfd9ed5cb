//! Client for the GM vehicle API.
//!
//! The vendor wraps every response in a `{status, reason, data}` envelope and
//! encodes each field of `data` as a `{type, value}` pair whose value is always
//! text. [`GmClient`] handles the envelope; [`coerce`] turns the tagged fields
//! into typed records.

pub mod client;
pub mod coerce;
pub mod connector;
pub mod error;
pub mod types;

pub use client::{GmClient, Operation};
pub use coerce::{coerce, FieldKind, RawFieldValue, RawRecord, TypedRecord};
pub use connector::VehicleConnector;
pub use error::{CoercionError, GmError};
pub use types::{EngineCommand, VehicleFlags};
