//! Folds a directory of record files into one CSV table.

use crate::error::HarvestError;
use crate::model::RestaurantRecord;
use crate::store::BOM;
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Column order of the output table
pub const HEADERS: [&str; 13] = [
    "name",
    "description",
    "cuisinePrimary",
    "cuisineSecond",
    "address_full",
    "phone",
    "website",
    "latitude",
    "longitude",
    "rating",
    "reviewCount",
    "priceRange",
    "features",
];

/// Stand-in for a missing `rating` or `reviewCount`
pub const MISSING_NUMBER: i64 = -1;

/// Quote a field for the table: absent values become `""` and embedded
/// quotes are doubled.
pub fn sanitize_field(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("\"{}\"", value.replace('"', "\"\"")),
        None => "\"\"".to_string(),
    }
}

fn number_or_missing<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING_NUMBER.to_string())
}

/// One table row, already rendered cell by cell in [`HEADERS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    cells: Vec<String>,
}

impl CsvRow {
    pub fn from_record(record: &RestaurantRecord) -> Self {
        let latitude = record.coordinates.latitude.map(|v| v.to_string());
        let longitude = record.coordinates.longitude.map(|v| v.to_string());
        let features = record.features.join("; ");

        let cells = vec![
            sanitize_field(record.name.as_deref()),
            sanitize_field(record.description.as_deref()),
            sanitize_field(record.cuisine_primary.as_deref()),
            sanitize_field(record.cuisine_second.as_deref()),
            sanitize_field(record.address.full.as_deref()),
            sanitize_field(record.phone.as_deref()),
            sanitize_field(record.website.as_deref()),
            sanitize_field(latitude.as_deref()),
            sanitize_field(longitude.as_deref()),
            // numeric columns stay unquoted so consumers can type them as numbers
            number_or_missing(record.rating),
            number_or_missing(record.review_count),
            sanitize_field(record.price_range.as_deref()),
            sanitize_field(Some(&features)),
        ];

        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn to_line(&self) -> String {
        self.cells.join(",")
    }
}

/// Counts from one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateReport {
    /// Data rows written (header excluded)
    pub written: usize,
    /// Record files that could not be used
    pub skipped: usize,
}

pub struct Aggregator {
    extension: String,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new("json")
    }
}

impl Aggregator {
    /// Aggregate files whose extension matches `extension` (without the dot,
    /// compared case-insensitively)
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    /// Record files in `dir`, sorted by file name so repeated runs emit rows
    /// in the same order.
    async fn record_files(&self, dir: &Path) -> Result<Vec<PathBuf>, HarvestError> {
        let mut entries = fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension));
            if matches {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn read_record(path: &Path) -> Result<RestaurantRecord, String> {
        let content = fs::read_to_string(path).await.map_err(|e| e.to_string())?;
        let record: RestaurantRecord = serde_json::from_str(content.trim_start_matches(BOM))
            .map_err(|e| e.to_string())?;
        if !record.is_valid() {
            return Err("record has no name".to_string());
        }
        Ok(record)
    }

    /// Build the full table text for `dir` without writing it.
    ///
    /// Unreadable or invalid files are logged and counted as skipped; only a
    /// failure to list the directory is an error.
    pub async fn render(&self, dir: &Path) -> Result<(String, AggregateReport), HarvestError> {
        let files = self.record_files(dir).await?;
        info!(
            "Found {} .{} files to process in '{}'",
            files.len(),
            self.extension,
            dir.display()
        );

        let mut table = String::new();
        table.push(BOM);
        table.push_str(&HEADERS.join(","));
        table.push('\n');

        let mut report = AggregateReport::default();
        for path in files {
            match Self::read_record(&path).await {
                Ok(record) => {
                    table.push_str(&CsvRow::from_record(&record).to_line());
                    table.push('\n');
                    report.written += 1;
                }
                Err(reason) => {
                    let file_name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    warn!("Could not process file '{}'. Error: {}", file_name, reason);
                    report.skipped += 1;
                }
            }
        }

        Ok((table, report))
    }

    /// Aggregate every record file in `dir` into the table at `output`.
    pub async fn aggregate(
        &self,
        dir: &Path,
        output: &Path,
    ) -> Result<AggregateReport, HarvestError> {
        let (table, report) = self.render(dir).await?;
        fs::write(output, table).await?;
        info!(
            "Compiled {} records into '{}' ({} skipped)",
            report.written,
            output.display(),
            report.skipped
        );
        Ok(report)
    }
}
