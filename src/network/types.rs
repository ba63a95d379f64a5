//! Participant graph data structures.
//!
//! Participants live in a flat arena indexed by [`ParticipantId`]; partner
//! edges are stored as ids, so no participant owns another.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::phone::RawNumber;

/// Index of a participant in the network arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub usize);

impl ParticipantId {
    /// One-based number used in the output file name (`log<N>.csv`)
    pub fn file_number(self) -> usize {
        self.0 + 1
    }

    pub fn file_name(self) -> String {
        format!("log{}.csv", self.file_number())
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.file_number())
    }
}

/// A rendered record together with the true event time it sorts by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub line: String,
}

/// A simulated, fully logged phone subscriber
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub number: RawNumber,
    /// Other participants this one calls; not necessarily symmetric
    pub partners: Vec<ParticipantId>,
    /// External contacts; repeated entries bias selection
    pub externals: Vec<RawNumber>,
    /// Append-only record buffer, sorted once by the finalizer
    pub log: Vec<LogEntry>,
}

impl Participant {
    pub fn new(id: ParticipantId, number: RawNumber) -> Self {
        Self {
            id,
            number,
            partners: Vec::new(),
            externals: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Add a partner edge, ignoring self edges and duplicates
    pub fn connect(&mut self, other: ParticipantId) -> bool {
        if other == self.id || self.partners.contains(&other) {
            return false;
        }
        self.partners.push(other);
        true
    }

    pub fn knows(&self, other: ParticipantId) -> bool {
        self.partners.contains(&other)
    }
}

/// An external number shared across a sub-clan of participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowContact {
    pub number: RawNumber,
    pub repetition: u32,
    pub members: Vec<ParticipantId>,
}

/// The participant arena plus the shadow contacts injected into it
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub participants: Vec<Participant>,
    pub shadows: Vec<ShadowContact>,
}

impl Network {
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id.0)
    }

    pub fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(id.0)
    }

    /// Total number of buffered records over all participants
    pub fn record_count(&self) -> usize {
        self.participants.iter().map(|p| p.log.len()).sum()
    }
}
