//! Month reports: on-screen amount formatting, the CSV summary, and the PDF
//! statement, plus writing either one into the export directory.

pub mod csv_export;
pub mod format;
pub mod pdf_export;

use std::path::{Path, PathBuf};

use crate::errors::SplitError;
use crate::utils::paths::write_atomic;

pub use csv_export::{csv_file_name, summary_csv};
pub use format::{format_amount, trim_amount};
pub use pdf_export::{layout_summary, pdf_file_name, render_summary_pdf, PdfLine, PdfPage};

/// Writes `contents` to `<dir>/<file_name>` through a temporary file and
/// returns the final path.
pub fn write_export(dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf, SplitError> {
    let path = dir.join(file_name);
    write_atomic(&path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "export written");
    Ok(path)
}
