//! Change-tracked, case-insensitive business records.
//!
//! A [`Record`] wraps an attributes block (`type`, `url`, external-id info)
//! and a set of fields whose names are normalized to lower case. Writes are
//! tracked so callers can build partial-update payloads.

pub mod error;
pub mod record;
pub mod serialization;
pub mod types;
pub mod value;

pub use error::RecordError;
pub use record::Record;
pub use serialization::PayloadMode;
pub use types::{Attributes, FastMap};
pub use value::{FieldNumber, FieldValue};
