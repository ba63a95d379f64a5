//! Ground-truth manifest.
//!
//! `network.json` records who is who in a generated fixture set: which raw
//! number each log file belongs to, who knows whom, and which shadow numbers
//! were shared by which participants. Downstream checks read it back to map
//! numbers in the logs to participants.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::network::{Network, ParticipantId, ShadowContact};
use crate::phone::RawNumber;

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE: &str = "network.json";

/// One participant as seen by downstream tooling
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ParticipantInfo {
    pub id: ParticipantId,
    /// Log file holding this participant's records
    pub file: String,
    pub number: RawNumber,
    pub partners: Vec<ParticipantId>,
    /// Distinct external numbers known only to this participant
    pub private_contacts: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub seed: u64,
    pub participants: Vec<ParticipantInfo>,
    pub shadow_contacts: Vec<ShadowContact>,
}

impl Manifest {
    pub fn from_network(network: &Network, seed: u64) -> Self {
        let participants = network
            .participants
            .iter()
            .map(|p| {
                let private_contacts = p
                    .externals
                    .iter()
                    .filter(|n| !network.shadows.iter().any(|s| &s.number == *n))
                    .count();
                ParticipantInfo {
                    id: p.id,
                    file: p.id.file_name(),
                    number: p.number.clone(),
                    partners: p.partners.clone(),
                    private_contacts,
                }
            })
            .collect();

        Self {
            seed,
            participants,
            shadow_contacts: network.shadows.clone(),
        }
    }

    /// Map raw numbers to the participant owning them
    pub fn owners(&self) -> BTreeMap<RawNumber, ParticipantId> {
        self.participants
            .iter()
            .map(|p| (p.number.clone(), p.id))
            .collect()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .wrap_err_with(|| format!("Failed to write manifest '{}'", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read manifest '{}'", path.display()))?;
        let manifest = serde_json::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse manifest '{}'", path.display()))?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::network::build_network;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    #[test]
    fn test_manifest_reflects_network() {
        let mut rng = StdRng::seed_from_u64(51);
        let network = build_network(&NetworkConfig::default(), &mut rng);
        let manifest = Manifest::from_network(&network, 51);

        assert_eq!(manifest.participants.len(), 15);
        assert_eq!(manifest.shadow_contacts.len(), 3);
        assert_eq!(manifest.participants[0].file, "log1.csv");
        for (info, participant) in manifest.participants.iter().zip(&network.participants) {
            assert!((15..=20).contains(&info.private_contacts));
            assert_eq!(info.partners, participant.partners);
        }
        assert_eq!(manifest.owners().len(), 15);
    }

    #[test]
    fn test_manifest_write_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let mut rng = StdRng::seed_from_u64(52);
        let network = build_network(&NetworkConfig::default(), &mut rng);
        let manifest = Manifest::from_network(&network, 52);

        manifest.write(&path).unwrap();
        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"shadow_contacts\""));
    }
}
