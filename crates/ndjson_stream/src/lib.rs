//! Incremental newline-delimited JSON decoding.
//!
//! [`NdjsonDecoder`] is the push side: feed it arbitrary byte chunks and drain the records
//! completed so far. [`NdjsonStream`] is the pull side: it wraps any byte-chunk
//! [`futures_util::Stream`] and yields one decoded record per line, in arrival order.
//!
//! Malformed lines never abort decoding. They are logged and replaced with the record type's
//! `Default` value so later lines keep flowing.

pub mod decoder;
pub mod error;
pub mod stream;

pub use decoder::NdjsonDecoder;
pub use error::NdjsonError;
pub use stream::NdjsonStream;
