//! Record emission.
//!
//! Turns a sampled call into one or two CDR lines and appends them to the
//! owning participants' buffers. Internal calls are logged twice: the
//! caller's leg at the sampled time, and the receiver's leg with its own
//! timestamp and duration jitter. External calls are logged once, in the
//! participant's file only.
//!
//! Layout of a line (semicolon separated, see [`HEADER`]):
//!
//! ```text
//! Mo. 06.01.2018;08:05:00;+491701234567;01519876543;SPRACHE;S;02:35
//! ```

use chrono::{Datelike, Duration, NaiveDateTime};
use rand::Rng;

use crate::config::JitterConfig;
use crate::network::{LogEntry, Network, ParticipantId};
use crate::phone::format_number;
use crate::sampler::{CallEvent, CallKind, Direction, SampledCall};
use crate::utils::duration::format_mm_ss;

/// Header row of every log file
pub const HEADER: &str = "Datum;Zeit;Anrufer;Angerufener;Typ;Richtung;Dauer";

/// The only call type modelled
pub const CALL_TYPE: &str = "SPRACHE";

/// Weekday abbreviations, Monday first
pub const WEEKDAYS: [&str; 7] = ["Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa.", "So."];

/// `Mo. 06.01.2018`
pub fn format_date(t: NaiveDateTime) -> String {
    let weekday = WEEKDAYS[t.weekday().num_days_from_monday() as usize];
    format!("{} {}", weekday, t.format("%d.%m.%Y"))
}

/// Render a call leg, drawing a fresh prefix notation for each number
pub fn render<R: Rng + ?Sized>(event: &CallEvent, rng: &mut R) -> String {
    let caller = format_number(rng, &event.caller);
    let receiver = format_number(rng, &event.receiver);
    format!(
        "{};{};{};{};{};{};{}",
        format_date(event.start),
        event.start.format("%H:%M:%S"),
        caller,
        receiver,
        CALL_TYPE,
        event.direction.as_char(),
        format_mm_ss(event.duration_secs)
    )
}

/// Derive the receiver leg of an internal call from the caller leg
pub fn jitter_leg<R: Rng + ?Sized>(sender: &CallEvent, jitter: &JitterConfig, rng: &mut R) -> CallEvent {
    let offset = rng.gen_range(0..=jitter.max_offset_secs);
    let max_delta = i64::from(jitter.max_duration_delta_secs);
    let delta = rng.gen_range(-max_delta..=max_delta);
    let duration = (i64::from(sender.duration_secs) + delta).max(1);

    CallEvent {
        caller: sender.caller.clone(),
        receiver: sender.receiver.clone(),
        direction: Direction::Incoming,
        start: sender.start + Duration::seconds(i64::from(offset)),
        duration_secs: duration as u32,
    }
}

/// Split a sampled call into per-owner legs
///
/// Returns an empty list if the call references a participant that is not
/// part of `network`.
pub fn legs<R: Rng + ?Sized>(
    network: &Network,
    call: &SampledCall,
    jitter: &JitterConfig,
    rng: &mut R,
) -> Vec<(ParticipantId, CallEvent)> {
    let Some(owner) = network.get(call.caller) else {
        return Vec::new();
    };

    match &call.kind {
        CallKind::Internal { receiver } => {
            let Some(partner) = network.get(*receiver) else {
                return Vec::new();
            };
            let sender_leg = CallEvent {
                caller: owner.number.clone(),
                receiver: partner.number.clone(),
                direction: Direction::Outgoing,
                start: call.timestamp,
                duration_secs: call.duration_secs,
            };
            let receiver_leg = jitter_leg(&sender_leg, jitter, rng);
            vec![(owner.id, sender_leg), (partner.id, receiver_leg)]
        }
        CallKind::External { number, direction } => {
            let (caller, receiver) = match direction {
                Direction::Incoming => (number.clone(), owner.number.clone()),
                Direction::Outgoing => (owner.number.clone(), number.clone()),
            };
            vec![(
                owner.id,
                CallEvent {
                    caller,
                    receiver,
                    direction: *direction,
                    start: call.timestamp,
                    duration_secs: call.duration_secs,
                },
            )]
        }
    }
}

/// Render and append every leg of `call`; returns the number of records appended
pub fn emit<R: Rng + ?Sized>(
    network: &mut Network,
    call: &SampledCall,
    jitter: &JitterConfig,
    rng: &mut R,
) -> usize {
    let split = legs(network, call, jitter, rng);
    for (owner, event) in &split {
        let line = render(event, rng);
        if let Some(participant) = network.get_mut(*owner) {
            participant.log.push(LogEntry {
                timestamp: event.start,
                line,
            });
        }
    }
    split.len()
}
