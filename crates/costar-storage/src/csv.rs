//! CSV file sink

use crate::error::StorageResult;
use crate::record::DistanceRow;
use async_trait::async_trait;
use costar_core::{PairOutcome, ResultSink, SinkError};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Default output file name
pub const DEFAULT_CSV_FILE: &str = "movie_distances.csv";

/// Writes outcomes as `actor_from,actor_to,distance,error` rows
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render outcomes as CSV text, header included
pub fn render_csv(outcomes: &[PairOutcome]) -> String {
    let mut output = DistanceRow::HEADER.join(",");
    output.push('\n');

    for outcome in outcomes {
        let cells = DistanceRow::from(outcome).cells();
        let escaped: Vec<String> = cells.iter().map(|cell| csv_escape(cell)).collect();
        output.push_str(&escaped.join(","));
        output.push('\n');
    }

    output
}

/// Escape a string for CSV output with formula injection protection
pub fn csv_escape(s: &str) -> String {
    // Spreadsheets evaluate cells starting with these characters
    let needs_formula_protection = s
        .chars()
        .next()
        .map(|c| matches!(c, '=' | '+' | '-' | '@' | '\t' | '\r'))
        .unwrap_or(false);

    let escaped = if needs_formula_protection {
        format!("'{}", s)
    } else {
        s.to_string()
    };

    if escaped.contains(',') || escaped.contains('"') || escaped.contains('\n') {
        format!("\"{}\"", escaped.replace('"', "\"\""))
    } else {
        escaped
    }
}

/// Write a file readable only by its owner
pub(crate) fn write_private(path: &Path, content: &str) -> StorageResult<()> {
    #[cfg(unix)]
    {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(content.as_bytes())?;
    }
    #[cfg(not(unix))]
    {
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
    }
    Ok(())
}

#[async_trait]
impl ResultSink for CsvSink {
    async fn write_all(&self, outcomes: &[PairOutcome]) -> Result<(), SinkError> {
        let content = render_csv(outcomes);
        write_private(&self.path, &content)?;
        tracing::info!("Wrote {} rows to {}", outcomes.len(), self.path.display());
        Ok(())
    }
}
