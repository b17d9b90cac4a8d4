//! Persistent record of providers whose attestations lost a verification
//! round. JSON lines, append only.

use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ordlight_primitives::Checkpoint;

/// One deny decision: who was rejected, and which champion they disagreed
/// with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyRecord {
    pub height: u64,
    pub champion_name: String,
    pub champion_url: String,
    pub champion_commitment: String,
    pub rejected_name: String,
    pub rejected_url: String,
    pub rejected_commitment: String,
}

#[derive(Debug, Clone)]
pub struct DenyList {
    path: PathBuf,
}

impl DenyList {
    /// Builds a deny list at `path`. An empty path disables denying
    /// entirely and yields `None`.
    pub fn new(path: &str) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self {
            path: PathBuf::from(path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a deny record. Idempotent per `(rejected_url,
    /// champion_commitment)`: a pair already on file is not written again.
    pub fn record(
        &self,
        height: u64,
        champion: &Checkpoint,
        rejected: &Checkpoint,
    ) -> io::Result<()> {
        if self.contains(&rejected.url, &champion.commitment)? {
            return Ok(());
        }
        let record = DenyRecord {
            height,
            champion_name: champion.name.clone(),
            champion_url: champion.url.clone(),
            champion_commitment: champion.commitment.clone(),
            rejected_name: rejected.name.clone(),
            rejected_url: rejected.url.clone(),
            rejected_commitment: rejected.commitment.clone(),
        };
        let line = serde_json::to_string(&record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Loads every record currently on file. Unparsable lines are skipped
    /// so a torn write cannot poison the list.
    pub fn load(&self) -> io::Result<Vec<DenyRecord>> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if let Ok(record) = serde_json::from_str(&line) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn contains(&self, rejected_url: &str, champion_commitment: &str) -> io::Result<bool> {
        Ok(self.load()?.iter().any(|r| {
            r.rejected_url == rejected_url && r.champion_commitment == champion_commitment
        }))
    }
}
