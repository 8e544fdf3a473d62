use std::path::{Path, PathBuf};

use crate::steam::PriceRecord;
use crate::{Error, Result};

const HEADER: [&str; 3] = ["Date", "Price", "Sold"];
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes one CSV file of price history per item into a results directory.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Creates the results directory if it does not exist yet.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        std::fs::create_dir_all(&dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, item: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", file_stem(item)))
    }

    /// Writes (or replaces) the file for `item`. The header row is always
    /// written, even if there are no records.
    pub fn save(&self, item: &str, records: &[PriceRecord]) -> Result<PathBuf> {
        let path = self.path_for(item);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;

        writer.write_record(HEADER)?;
        for record in records {
            let date = record.timestamp.format(DATE_FORMAT).to_string();
            let volume = record.volume.to_string();

            writer.write_record([date.as_str(), record.price.as_str(), volume.as_str()])?;
        }

        writer.flush().map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), rows = records.len(), "Saved price history");

        Ok(path)
    }
}

/// Market names may contain characters that are not allowed in file names.
fn file_stem(item: &str) -> String {
    item.replace([':', '/', '\\'], "_")
}
