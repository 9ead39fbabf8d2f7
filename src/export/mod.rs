//! CSV export of generated plans
//!
//! Renders a plan as a spreadsheet-friendly CSV (one row per round) and
//! saves it to the export directory.

use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::planner::Plan;

/// MIME type spreadsheets pick up as openable
pub const CSV_CONTENT_TYPE: &str = "application/vnd.ms-excel";

/// Render a plan as CSV
///
/// Header is `RoundNo,Date,Player1..PlayerK` where K is the plan's group
/// size. Rows are separated by `\n` with no trailing newline.
pub fn render_csv(plan: &Plan) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());

    let mut header = vec![String::from("RoundNo"), String::from("Date")];
    header.extend((1..=plan.arity()).map(|i| format!("Player{i}")));
    wtr.write_record(&header)?;

    for round in &plan.rounds {
        let mut record = vec![
            round.round_no.to_string(),
            round.date.format("%Y-%m-%d").to_string(),
        ];
        record.extend(round.selected_players.iter().map(|p| p.name.clone()));
        wtr.write_record(&record)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    let mut content = String::from_utf8_lossy(&bytes).into_owned();
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}

/// A CSV file written by [`CsvExporter`]
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub path: PathBuf,
    pub content: String,
}

/// Writes plans into an output directory
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    /// Create an exporter; the directory is created on first write
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save `plan` as `plan-<epoch millis>.csv`
    pub fn write(&self, plan: &Plan) -> Result<ExportedFile> {
        let filename = format!("plan-{}.csv", chrono::Utc::now().timestamp_millis());
        self.write_as(plan, &filename)
    }

    /// Save `plan` under an explicit file name, replacing any existing file
    pub fn write_as(&self, plan: &Plan, filename: &str) -> Result<ExportedFile> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| Error::export(&self.output_dir, e))?;

        let content = render_csv(plan)?;
        let path = self.output_dir.join(filename);
        fs::write(&path, &content).map_err(|e| Error::export(&path, e))?;

        tracing::info!(
            plan_id = %plan.id,
            path = %path.display(),
            rounds = plan.rounds.len(),
            "Exported plan as CSV"
        );

        Ok(ExportedFile {
            filename: filename.to_string(),
            path,
            content,
        })
    }
}
