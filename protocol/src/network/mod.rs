//! # Network Module
//!
//! Message envelopes for exchanging transactions between peers. Transport,
//! discovery and peer scoring are out of scope; see [`message`].

pub mod message;

pub use message::{Envelope, MessageError, MessageKind};
