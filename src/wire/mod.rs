pub mod encoder;

pub use encoder::{decode, encode, WireError, WireField, EVENT_MARKER, FIELDS_PER_EVENT};
