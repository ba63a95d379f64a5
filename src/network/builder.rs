//! Network construction.
//!
//! Builds the participant graph in stages:
//!
//! 1. **Ring**: every participant knows its predecessor and successor
//! 2. **Cross-wiring**: a few random extra partners per participant
//! 3. **Private contacts**: external numbers known to one participant only
//! 4. **Sub-clans**: shadow numbers shared by random participant subsets,
//!    repeated so they dominate external call selection

use std::collections::HashSet;

use log::{debug, info, warn};
use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::config::NetworkConfig;
use crate::network::types::{Network, Participant, ParticipantId, ShadowContact};
use crate::phone::{generate_raw_number, RawNumber};

/// Hands out raw numbers that were never issued before in this network
struct NumberPool {
    issued: HashSet<RawNumber>,
}

impl NumberPool {
    fn new() -> Self {
        Self { issued: HashSet::new() }
    }

    fn fresh<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RawNumber {
        loop {
            let number = generate_raw_number(rng);
            if self.issued.insert(number.clone()) {
                return number;
            }
        }
    }
}

/// Build the participant network described by `config`
pub fn build_network<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Network {
    let count = config.participants as usize;
    let mut pool = NumberPool::new();

    let participants = (0..count)
        .map(|i| Participant::new(ParticipantId(i), pool.fresh(rng)))
        .collect();
    let mut network = Network {
        participants,
        shadows: Vec::new(),
    };

    wire_ring(&mut network);
    wire_random_partners(&mut network, config, rng);
    assign_private_contacts(&mut network, config, &mut pool, rng);
    inject_sub_clans(&mut network, config, &mut pool, rng);

    for participant in &mut network.participants {
        participant.partners.sort();
        debug!(
            "Participant {} ({}) knows {} participants and {} external entries",
            participant.id,
            participant.number,
            participant.partners.len(),
            participant.externals.len()
        );
    }

    let edges: usize = network.participants.iter().map(|p| p.partners.len()).sum();
    info!(
        "Built network: {} participants, {} partner edges, {} shadow contacts",
        network.len(),
        edges,
        network.shadows.len()
    );

    network
}

/// Connect every participant to its predecessor and successor, circularly
fn wire_ring(network: &mut Network) {
    let n = network.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        let prev = if i == 0 { n - 1 } else { i - 1 };
        let next = if i == n - 1 { 0 } else { i + 1 };
        let participant = &mut network.participants[i];
        participant.connect(ParticipantId(prev));
        participant.connect(ParticipantId(next));
    }
}

/// Add extra one-directional partners chosen among not yet connected participants
fn wire_random_partners<R: Rng + ?Sized>(network: &mut Network, config: &NetworkConfig, rng: &mut R) {
    let n = network.len();
    for i in 0..n {
        let participant = &network.participants[i];
        let available: Vec<ParticipantId> = (0..n)
            .map(ParticipantId)
            .filter(|&other| other != participant.id && !participant.knows(other))
            .collect();
        if available.is_empty() {
            continue;
        }

        let wanted = rng.gen_range(config.extra_partners.min..=config.extra_partners.max) as usize;
        let chosen: Vec<ParticipantId> = available.choose_multiple(rng, wanted).copied().collect();

        let participant = &mut network.participants[i];
        for other in chosen {
            participant.connect(other);
        }
    }
}

fn assign_private_contacts<R: Rng + ?Sized>(
    network: &mut Network,
    config: &NetworkConfig,
    pool: &mut NumberPool,
    rng: &mut R,
) {
    for participant in &mut network.participants {
        let count = rng.gen_range(config.private_contacts.min..=config.private_contacts.max);
        for _ in 0..count {
            participant.externals.push(pool.fresh(rng));
        }
    }
}

/// Share shadow numbers across random participant subsets
fn inject_sub_clans<R: Rng + ?Sized>(
    network: &mut Network,
    config: &NetworkConfig,
    pool: &mut NumberPool,
    rng: &mut R,
) {
    let clans = &config.sub_clans;
    if clans.count == 0 {
        return;
    }

    let n = network.len();
    if n < 2 {
        warn!("Sub-clans need at least 2 participants; skipping {} shadow contacts", clans.count);
        return;
    }

    let max_size = (clans.max_size as usize).min(n);
    let min_size = (clans.min_size as usize).min(max_size);
    if max_size < clans.max_size as usize {
        warn!(
            "sub_clans.max_size {} exceeds participant count, clamped to {}",
            clans.max_size, max_size
        );
    }

    for _ in 0..clans.count {
        let number = pool.fresh(rng);
        let size = rng.gen_range(min_size..=max_size);
        let mut members: Vec<ParticipantId> = index::sample(rng, n, size)
            .into_iter()
            .map(ParticipantId)
            .collect();
        members.sort();

        for &member in &members {
            let participant = &mut network.participants[member.0];
            for _ in 0..clans.repetition {
                participant.externals.push(number.clone());
            }
        }

        debug!(
            "Shadow contact {} shared by {} participants: {:?}",
            number,
            members.len(),
            members.iter().map(|m| m.file_number()).collect::<Vec<_>>()
        );
        network.shadows.push(ShadowContact {
            number,
            repetition: clans.repetition,
            members,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, SubClanConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ring_only(participants: u32) -> NetworkConfig {
        NetworkConfig {
            participants,
            extra_partners: Bounds::new(0, 0),
            private_contacts: Bounds::new(15, 20),
            sub_clans: SubClanConfig { count: 0, ..SubClanConfig::default() },
        }
    }

    #[test]
    fn test_ring_single_participant_has_no_edges() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = build_network(&ring_only(1), &mut rng);
        assert_eq!(network.len(), 1);
        assert!(network.participants[0].partners.is_empty());
    }

    #[test]
    fn test_ring_two_participants_single_edge_each() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = build_network(&ring_only(2), &mut rng);
        assert_eq!(network.participants[0].partners, vec![ParticipantId(1)]);
        assert_eq!(network.participants[1].partners, vec![ParticipantId(0)]);
    }

    #[test]
    fn test_ring_wraps_around() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = build_network(&ring_only(5), &mut rng);
        assert_eq!(network.participants[0].partners, vec![ParticipantId(1), ParticipantId(4)]);
        assert_eq!(network.participants[2].partners, vec![ParticipantId(1), ParticipantId(3)]);
        assert_eq!(network.participants[4].partners, vec![ParticipantId(0), ParticipantId(3)]);
    }

    #[test]
    fn test_cross_wiring_bounds() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = NetworkConfig {
            participants: 12,
            extra_partners: Bounds::new(2, 4),
            ..ring_only(12)
        };
        let network = build_network(&config, &mut rng);
        for p in &network.participants {
            // ring (2) + extra (2..=4)
            assert!((4..=6).contains(&p.partners.len()), "{} has {}", p.id, p.partners.len());
            assert!(!p.partners.contains(&p.id));
            let unique: HashSet<_> = p.partners.iter().collect();
            assert_eq!(unique.len(), p.partners.len());
        }
    }

    #[test]
    fn test_cross_wiring_tolerates_exhausted_pool() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = NetworkConfig {
            participants: 3,
            extra_partners: Bounds::new(2, 4),
            ..ring_only(3)
        };
        // Ring already connects everyone with 3 participants
        let network = build_network(&config, &mut rng);
        for p in &network.participants {
            assert_eq!(p.partners.len(), 2);
        }
    }

    #[test]
    fn test_private_contacts_are_exclusive() {
        let mut rng = StdRng::seed_from_u64(6);
        let network = build_network(&ring_only(6), &mut rng);
        let mut seen = HashSet::new();
        for p in &network.participants {
            assert!((15..=20).contains(&p.externals.len()));
            for number in &p.externals {
                assert!(seen.insert(number.clone()), "{number} shared between participants");
                assert_ne!(number, &p.number);
            }
        }
    }

    #[test]
    fn test_sub_clans_repeat_shadow_numbers() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = NetworkConfig {
            participants: 10,
            extra_partners: Bounds::new(2, 4),
            private_contacts: Bounds::new(15, 15),
            sub_clans: SubClanConfig { count: 2, min_size: 3, max_size: 6, repetition: 5 },
        };
        let network = build_network(&config, &mut rng);
        assert_eq!(network.shadows.len(), 2);

        for shadow in &network.shadows {
            assert!((3..=6).contains(&shadow.members.len()));
            for p in &network.participants {
                let occurrences = p.externals.iter().filter(|n| **n == shadow.number).count();
                if shadow.members.contains(&p.id) {
                    assert_eq!(occurrences, 5);
                } else {
                    assert_eq!(occurrences, 0);
                }
            }
        }
    }

    #[test]
    fn test_sub_clan_size_clamped_to_participants() {
        let mut rng = StdRng::seed_from_u64(8);
        let config = NetworkConfig {
            participants: 3,
            extra_partners: Bounds::new(0, 0),
            private_contacts: Bounds::new(0, 0),
            sub_clans: SubClanConfig { count: 1, min_size: 2, max_size: 15, repetition: 5 },
        };
        let network = build_network(&config, &mut rng);
        assert!(network.shadows[0].members.len() <= 3);
    }

    #[test]
    fn test_sub_clans_skipped_for_single_participant() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = NetworkConfig {
            participants: 1,
            extra_partners: Bounds::new(2, 4),
            private_contacts: Bounds::new(1, 1),
            sub_clans: SubClanConfig::default(),
        };
        let network = build_network(&config, &mut rng);
        assert!(network.shadows.is_empty());
        assert_eq!(network.participants[0].externals.len(), 1);
    }
}
