//! Log finalization.
//!
//! Records are appended out of order during sampling (a receiver leg may be
//! jittered past calls that were sampled later). Each buffer is stable
//! sorted by true event time exactly once, then written with the header.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;

use crate::network::{LogEntry, Network, Participant};
use crate::record::HEADER;

/// A log file written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenLog {
    pub path: PathBuf,
    pub records: usize,
}

/// Stable sort of a participant's buffer by event time
pub fn sort_log(participant: &mut Participant) {
    participant.log.sort_by_key(|entry| entry.timestamp);
}

/// Write header plus one line per entry, each terminated by a newline
pub fn write_log(path: &Path, entries: &[LogEntry]) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create log file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", HEADER)?;
    for entry in entries {
        writeln!(writer, "{}", entry.line)?;
    }
    writer
        .flush()
        .wrap_err_with(|| format!("Failed to write log file '{}'", path.display()))?;
    Ok(())
}

/// Sort every participant's buffer and write `log<N>.csv` into `output_dir`
pub fn finalize(network: &mut Network, output_dir: &Path) -> Result<Vec<WrittenLog>> {
    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let mut written = Vec::with_capacity(network.len());
    for participant in &mut network.participants {
        sort_log(participant);

        let path = output_dir.join(participant.id.file_name());
        write_log(&path, &participant.log)?;
        info!("  -> {}: {} records", participant.id.file_name(), participant.log.len());

        written.push(WrittenLog {
            path,
            records: participant.log.len(),
        });
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ParticipantId;
    use crate::phone::RawNumber;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::tempdir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    fn entry(t: NaiveDateTime, line: &str) -> LogEntry {
        LogEntry { timestamp: t, line: line.to_string() }
    }

    #[test]
    fn test_sort_is_stable_and_chronological() {
        let mut p = Participant::new(ParticipantId(0), RawNumber::parse("1701234567").unwrap());
        p.log = vec![
            entry(at(10, 0, 5), "c"),
            entry(at(9, 0, 0), "a"),
            entry(at(10, 0, 5), "d"),
            entry(at(9, 30, 0), "b"),
        ];
        sort_log(&mut p);
        let lines: Vec<&str> = p.log.iter().map(|e| e.line.as_str()).collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_finalize_writes_header_and_lines() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("data");

        let mut first = Participant::new(ParticipantId(0), RawNumber::parse("1701234567").unwrap());
        first.log = vec![entry(at(12, 0, 0), "late"), entry(at(8, 0, 0), "early")];
        let second = Participant::new(ParticipantId(1), RawNumber::parse("1511234567").unwrap());
        let mut network = Network {
            participants: vec![first, second],
            shadows: Vec::new(),
        };

        let written = finalize(&mut network, &out).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].records, 2);
        assert_eq!(written[1].records, 0);

        let content = std::fs::read_to_string(out.join("log1.csv")).unwrap();
        assert_eq!(content, format!("{HEADER}\nearly\nlate\n"));

        let empty = std::fs::read_to_string(out.join("log2.csv")).unwrap();
        assert_eq!(empty, format!("{HEADER}\n"));
    }
}
