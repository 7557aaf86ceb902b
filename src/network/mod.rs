//! Network Codec
//!
//! Binary wire encoding for replicated archives. Stateless apart from the
//! per-call cursors, so independent messages can be encoded and decoded
//! concurrently against one shared set of enum tables.

pub mod archive;
pub mod bools;
pub mod coded;

pub use archive::{
    decode, encode, transfer_list, Archive, ArchiveError, ArchiveReader, ArchiveWriter, Archiver,
    FieldSpec, FlagWord, Gate, MalformedKind,
};
pub use bools::{BoolDecoder, BoolEncoder};
pub use coded::{CodedReader, CodedWriter};
