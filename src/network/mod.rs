//! Participant network module.
//!
//! This module contains the participant arena and the builder that wires
//! participants together and hands out their external contacts.

pub mod types;
pub mod builder;

pub use types::{LogEntry, Network, Participant, ParticipantId, ShadowContact};
pub use builder::build_network;
