//! Blackijecky network protocol: record types, fixed-layout codec, and stream reassembly.

pub mod codec;
pub mod messages;
pub mod reassembly;
pub mod stream;

pub use codec::{ProtocolError, Record};
pub use messages::*;
pub use reassembly::StreamReassembler;
pub use stream::{RecordStream, StreamError};
