//! Retrieval of the upstream Hepburn dictionaries.
//!
//! The core builder only sees text; this module downloads it and keeps a
//! local copy per source URL so repeated builds stay offline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Local file name for a source URL: its last path segment, with any query
/// or fragment removed.
pub fn file_name_for(url: &str) -> Result<String, SourceError> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    // Sanitize: use only the file basename to prevent path traversal
    let name = path
        .rsplit('/')
        .next()
        .map(|segment| Path::new(segment).file_name().unwrap_or_default())
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    if name.is_empty() {
        return Err(SourceError::Parse(format!("no file name in URL {url}")));
    }
    Ok(name)
}

pub fn fetch_text(url: &str) -> Result<String, SourceError> {
    ureq::get(url)
        .call()
        .map_err(|e| SourceError::Http(format!("{url}: {e}")))?
        .into_body()
        .read_to_string()
        .map_err(|e| SourceError::Http(format!("{url}: {e}")))
}

/// Download every URL into `dest`, returning the local paths in URL order.
///
/// Files already present are kept unless `force` is set. Each download is
/// written to a temporary name first, so an interrupted fetch never leaves a
/// truncated dictionary behind.
pub fn fetch_all(urls: &[String], dest: &Path, force: bool) -> Result<Vec<PathBuf>, SourceError> {
    fs::create_dir_all(dest)?;
    let mut paths = Vec::with_capacity(urls.len());
    for url in urls {
        let path = dest.join(file_name_for(url)?);
        if path.exists() && !force {
            debug!(path = %path.display(), "already downloaded");
            paths.push(path);
            continue;
        }
        info!(url = %url, "downloading");
        let text = fetch_text(url)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, text.as_bytes())?;
        fs::rename(&tmp, &path)?;
        paths.push(path);
    }
    Ok(paths)
}

/// Local paths `fetch_all` would produce for `urls`, without downloading.
pub fn local_paths(urls: &[String], dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    urls.iter()
        .map(|url| Ok(dir.join(file_name_for(url)?)))
        .collect()
}
