//! Engine protocol handling.
//!
//! The engine talks newline-delimited JSON: one request object per input
//! line, one response object per output line. Messages carry plain data
//! only, so the engine can run in a separate process or thread from its
//! caller with nothing shared between them.

pub mod message;

pub use message::{parse_request, Payload, ProtocolError, Request, Response};
