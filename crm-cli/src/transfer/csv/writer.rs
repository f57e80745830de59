use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use ::csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::models::{DATE_FORMAT, Record, RecordKind};
use crate::transfer::mapping::{export_columns, template_headers, template_row};

/// Write a header row and data rows with every value quoted
///
/// Rows are joined by `\n` with no trailing newline.
fn render_rows<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(headers)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer
            .write_record(row.iter().map(|v| v.as_ref()))
            .context("Failed to write CSV row")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    let mut text = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Import template for a record kind: header row plus one example row
pub fn render_template(kind: RecordKind, user: &str, today: NaiveDate) -> Result<String> {
    let headers = template_headers(kind);
    let example = template_row(kind, user, today);
    render_rows(&headers, &[example])
}

/// Export the given records with the kind's export columns
///
/// Missing values are written as empty strings. Refuses an empty selection.
pub fn render_export<R: Record>(records: &[&R]) -> Result<String> {
    if records.is_empty() {
        bail!("No {} records selected for export", R::KIND.label().to_lowercase());
    }

    let columns = export_columns(R::KIND);
    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.field(c.field).unwrap_or_default())
                .collect()
        })
        .collect();

    log::debug!("Rendering {} {} rows for export", rows.len(), R::KIND);
    render_rows(&headers, &rows)
}

/// `<prefix>_export_<YYYY-MM-DD>.csv`
pub fn export_filename(kind: RecordKind, today: NaiveDate) -> String {
    format!("{}_export_{}.csv", kind.export_prefix(), today.format(DATE_FORMAT))
}

/// Save CSV text as a file in `dir`, creating the directory if needed
pub fn write_download(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join(filename);
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    log::info!("Wrote CSV file: {}", path.display());
    Ok(path)
}
