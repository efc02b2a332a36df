//! Files handed between runs: the harvested link list and one JSON file per record.

use crate::error::HarvestError;
use crate::model::RestaurantRecord;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;

pub(crate) const BOM: char = '\u{feff}';

/// Write `links` one per line, prefixed with a UTF-8 byte-order mark.
pub async fn write_link_list(path: &Path, links: &[String]) -> Result<(), HarvestError> {
    let mut content = String::new();
    content.push(BOM);
    for link in links {
        content.push_str(link);
        content.push('\n');
    }
    fs::write(path, content).await?;
    Ok(())
}

/// Read a link list separated by newlines and/or commas.
pub async fn read_link_list(path: &Path) -> Result<Vec<String>, HarvestError> {
    let content = fs::read_to_string(path).await?;
    Ok(parse_link_list(&content))
}

pub fn parse_link_list(content: &str) -> Vec<String> {
    content
        .trim_start_matches(BOM)
        .split(|c| c == '\n' || c == ',')
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
        .collect()
}

/// File stem for a record: the restaurant name with characters that are not
/// allowed in file names replaced.
pub fn record_file_stem(name: Option<&str>) -> String {
    let stem: String = name
        .unwrap_or("")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim().trim_end_matches('.').trim();
    if stem.is_empty() {
        "unnamed".to_string()
    } else {
        stem.to_string()
    }
}

/// Directory of record files, one `<name>.json` per restaurant.
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// Use `dir`, creating it if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, HarvestError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `record` as pretty JSON, never overwriting an existing file:
    /// a repeated name gets a ` (2)`, ` (3)`, ... suffix.
    pub async fn save(&self, record: &RestaurantRecord) -> Result<PathBuf, HarvestError> {
        let stem = record_file_stem(record.name.as_deref());
        let mut path = self.dir.join(format!("{stem}.json"));
        let mut copy = 2;
        while fs::try_exists(&path).await? {
            path = self.dir.join(format!("{stem} ({copy}).json"));
            copy += 1;
        }

        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).await?;
        debug!("Saved record to {}", path.display());
        Ok(path)
    }
}
