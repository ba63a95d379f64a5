//! Call event types shared by the sampler and the record emitter.

use chrono::NaiveDateTime;

use crate::network::ParticipantId;
use crate::phone::RawNumber;

/// Direction of a record from the log owner's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `S`: the owner placed the call
    Outgoing,
    /// `E`: the owner received the call
    Incoming,
}

impl Direction {
    pub fn as_char(self) -> char {
        match self {
            Direction::Outgoing => 'S',
            Direction::Incoming => 'E',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Direction::Outgoing),
            'E' => Some(Direction::Incoming),
            _ => None,
        }
    }
}

/// Who is on the other end of a sampled call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    /// Call to another participant; logged by both sides
    Internal { receiver: ParticipantId },
    /// Call with an untracked number; logged by the participant only
    External { number: RawNumber, direction: Direction },
}

/// One accepted draw of the sampler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledCall {
    pub timestamp: NaiveDateTime,
    /// Participant the call was drawn for
    pub caller: ParticipantId,
    pub kind: CallKind,
    pub duration_secs: u32,
}

impl SampledCall {
    pub fn is_internal(&self) -> bool {
        matches!(self.kind, CallKind::Internal { .. })
    }
}

/// A single call leg as it appears in one participant's log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEvent {
    pub caller: RawNumber,
    pub receiver: RawNumber,
    pub direction: Direction,
    pub start: NaiveDateTime,
    pub duration_secs: u32,
}
