use std::path::{Path, PathBuf};

use lopdf::Document as PdfDocument;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{Error, Result};

/// Load every `*.pdf` directly inside `dir`, one `Document` per page.
///
/// Files are read in sorted path order. Any unreadable file or page aborts the load.
pub async fn load_pdf_folder(dir: &Path) -> Result<Vec<Document>> {
    let paths = discover_pdf_files(dir)?;
    info!("Loading {} PDF files from {}", paths.len(), dir.display());

    let mut documents = Vec::new();
    for path in paths {
        let pages = tokio::task::spawn_blocking(move || load_pdf_pages(&path))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;
        documents.extend(pages);
    }

    info!("Loaded {} pages", documents.len());
    Ok(documents)
}

pub fn discover_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_pdf_pages(path: &Path) -> Result<Vec<Document>> {
    let pdf_error = |e: lopdf::Error| Error::Pdf {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let pdf = PdfDocument::load(path).map_err(pdf_error)?;

    let mut documents = Vec::new();
    for page in pdf.get_pages().keys() {
        let text = pdf.extract_text(&[*page]).map_err(pdf_error)?;
        documents.push(Document {
            source: path.to_path_buf(),
            page: *page,
            text,
        });
    }

    debug!("{}: {} pages", path.display(), documents.len());
    Ok(documents)
}
