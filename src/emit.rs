use crate::{
    error::{Result, ViewerError},
    tool::CSV_EXTENSION,
};
use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

/// Everything one run produces, held in memory until it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    /// Graphviz description
    pub dot: String,
    /// Graph editor link carrying `dot`
    pub url: String,
    /// Standalone tree JSON, only produced when a value column is configured
    pub json: Option<String>,
    /// Tree viewer page
    pub html: String,
}

/// Paths of the files written for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Written {
    pub dot: PathBuf,
    pub json: Option<PathBuf>,
    pub html: PathBuf,
}

/// `<base>.<extension>`, keeping any dots already in the base name.
fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf> {
    std::fs::write(&path, contents).map_err(|source| ViewerError::FileWrite {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(path)
}

impl Artifacts {
    /// Write `<base>.dot`, `<base>.html` and, when present, `<base>.json`.
    pub fn write(&self, base: &Path) -> Result<Written> {
        let dot = write_file(with_suffix(base, "dot"), &self.dot)?;
        let json = self
            .json
            .as_deref()
            .map(|json| write_file(with_suffix(base, "json"), json))
            .transpose()?;
        let html = write_file(with_suffix(base, "html"), &self.html)?;
        Ok(Written { dot, json, html })
    }
}

/// Input path for a file argument given with or without its `.csv` extension.
pub fn csv_path(file: &Path) -> PathBuf {
    let is_csv = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION));
    if is_csv {
        file.to_path_buf()
    } else {
        with_suffix(file, CSV_EXTENSION)
    }
}

/// Base name of the output files: the input without `.csv`, optionally moved to `out_dir`.
pub fn output_base(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let base = input.with_extension("");
    match (out_dir, base.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => base,
    }
}

/// Hand a URL or file to the desktop's default viewer. Failures are only logged.
pub fn open_viewer(location: &str) -> bool {
    launch(location, |location| open::that(location))
}

fn launch(location: &str, opener: impl FnOnce(&str) -> io::Result<()>) -> bool {
    match opener(location) {
        Ok(()) => {
            tracing::debug!(location, "launched viewer");
            true
        }
        Err(err) => {
            tracing::warn!(location, %err, "could not launch viewer");
            false
        }
    }
}
