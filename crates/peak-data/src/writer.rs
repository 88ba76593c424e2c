//! Result document encoding and delivery.

use std::io::Write;
use std::path::Path;

use peak_core::error::Result;
use peak_core::models::DailySummary;
use serde::Serialize;
use tracing::debug;

/// Top-level shape of the results document: `{"results": [...]}`.
#[derive(Debug, Serialize)]
pub struct ResultDocument<'a> {
    pub results: &'a [DailySummary],
}

/// Render `summaries` as a pretty-printed results document.
pub fn render_results(summaries: &[DailySummary]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ResultDocument { results: summaries })?)
}

/// Write the results document to `dest`, or to stdout when `dest` is `None`.
pub fn write_results(summaries: &[DailySummary], dest: Option<&Path>) -> Result<()> {
    let json = render_results(summaries)?;
    match dest {
        Some(path) => write_atomically(path, &json),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Write to a sibling temp file, then rename over `path`. Creates parent
/// directories as needed.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }

    debug!("wrote results to {}", path.display());
    Ok(())
}
