//! Cross-file checks for internal calls.
//!
//! An internal call leaves an `S` record in the caller's file and an `E`
//! record in the receiver's file. Both carry the same raw numbers; the `E`
//! leg starts up to `max_offset_secs` later and its duration differs by at
//! most `max_duration_delta_secs`.

use std::collections::BTreeMap;

use super::types::*;
use crate::config::JitterConfig;
use crate::manifest::Manifest;
use crate::phone::RawNumber;
use crate::sampler::Direction;

/// Outcome of matching sender legs against receiver legs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingResult {
    pub paired_calls: usize,
    pub violations: Vec<Violation>,
}

/// A record belonging to an internal call, with the file of the other side
struct Leg<'a> {
    file_number: usize,
    counterpart_file: usize,
    record: &'a ParsedRecord,
}

/// Every record must name the owner of its file on the right side
pub fn check_ownership(log: &ParsedLog, owner: &RawNumber) -> Vec<Violation> {
    log.records
        .iter()
        .filter(|r| match r.direction {
            Direction::Outgoing => &r.caller != owner,
            Direction::Incoming => &r.receiver != owner,
        })
        .map(|r| Violation::new(log.file_number, r.line, ViolationKind::ForeignRecord))
        .collect()
}

/// Match every internal `S` leg with exactly one `E` leg in the partner's file
pub fn check_pairing(logs: &[ParsedLog], manifest: &Manifest, jitter: &JitterConfig) -> PairingResult {
    let owners = manifest.owners();
    let file_of = |number: &RawNumber| owners.get(number).map(|id| id.file_number());

    type Key = (RawNumber, RawNumber);
    let mut senders: BTreeMap<Key, Vec<Leg>> = BTreeMap::new();
    let mut receivers: BTreeMap<Key, Vec<Leg>> = BTreeMap::new();

    for log in logs {
        for record in &log.records {
            let (counterpart, legs) = match record.direction {
                Direction::Outgoing => (file_of(&record.receiver), &mut senders),
                Direction::Incoming => (file_of(&record.caller), &mut receivers),
            };
            let Some(counterpart_file) = counterpart else {
                continue;
            };
            if counterpart_file == log.file_number {
                continue;
            }
            legs.entry((record.caller.clone(), record.receiver.clone()))
                .or_default()
                .push(Leg {
                    file_number: log.file_number,
                    counterpart_file,
                    record,
                });
        }
    }

    let mut result = PairingResult::default();
    let max_offset = i64::from(jitter.max_offset_secs);
    let max_delta = i64::from(jitter.max_duration_delta_secs);

    for (key, mut sent) in senders {
        let mut received = receivers.remove(&key).unwrap_or_default();
        sent.sort_by_key(|leg| leg.record.timestamp);
        received.sort_by_key(|leg| leg.record.timestamp);

        let mut matched = vec![false; received.len()];
        let mut lo = 0;
        for leg in &sent {
            let start = leg.record.timestamp;
            while lo < received.len() && received[lo].record.timestamp < start {
                lo += 1;
            }

            // Closest duration wins; ties go to the earliest receiver leg
            let found = (lo..received.len())
                .take_while(|&i| (received[i].record.timestamp - start).num_seconds() <= max_offset)
                .filter(|&i| !matched[i])
                .map(|i| {
                    let delta = i64::from(received[i].record.duration_secs) - i64::from(leg.record.duration_secs);
                    (delta.abs(), i)
                })
                .filter(|&(delta, _)| delta <= max_delta)
                .min()
                .map(|(_, i)| i);

            match found {
                Some(i) => {
                    matched[i] = true;
                    result.paired_calls += 1;
                }
                None => result.violations.push(unpaired(leg)),
            }
        }

        for (leg, was_matched) in received.iter().zip(matched) {
            if !was_matched {
                result.violations.push(unpaired(leg));
            }
        }
    }

    // Receiver legs whose caller never logged the call at all
    for legs in receivers.values() {
        result.violations.extend(legs.iter().map(unpaired));
    }

    result
}

fn unpaired(leg: &Leg) -> Violation {
    Violation::new(
        leg.file_number,
        leg.record.line,
        ViolationKind::UnpairedLeg {
            counterpart_file: leg.counterpart_file,
        },
    )
}
