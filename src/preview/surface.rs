use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempPath;

use super::PreviewSurface;

/// Writes the document to a temporary `.html` file and opens it.
///
/// The returned [`TempPath`] deletes the file when dropped.
pub struct TempFileSurface {
    /// Opener command line; the platform opener when `None`.
    opener: Option<String>,
}

impl TempFileSurface {
    pub fn new(opener: Option<String>) -> Self {
        Self { opener }
    }

    fn launch(&self, path: &Path) -> io::Result<()> {
        let mut parts: Vec<String> = match &self.opener {
            Some(opener) => opener.split_whitespace().map(String::from).collect(),
            None => Vec::new(),
        };
        let program = if parts.is_empty() {
            platform_opener()?
        } else {
            PathBuf::from(parts.remove(0))
        };

        crate::debug!("preview"; "{} {}", program.display(), path.display());
        Command::new(&program)
            .args(&parts)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
    }
}

impl PreviewSurface for TempFileSurface {
    type Handle = TempPath;

    fn open(&self, document: &str, name: &str) -> io::Result<TempPath> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("rawpeek-{}-", file_stem(name)))
            .suffix(".html")
            .tempfile()?;
        file.write_all(document.as_bytes())?;
        file.flush()?;

        let path = file.into_temp_path();
        self.launch(&path)?;
        crate::log!("preview"; "opened {}", path.display());
        Ok(path)
    }
}

/// Writes the document to a fixed output file. Nothing is released.
pub struct WriteSurface {
    output: PathBuf,
}

impl WriteSurface {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl PreviewSurface for WriteSurface {
    type Handle = ();

    fn open(&self, document: &str, _name: &str) -> io::Result<()> {
        if let Some(parent) = self.output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output, document)?;
        crate::log!("preview"; "wrote {}", self.output.display());
        Ok(())
    }
}

/// Locate the platform's default document opener.
fn platform_opener() -> io::Result<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(windows) {
        &["explorer"]
    } else {
        &["xdg-open", "open"]
    };

    candidates
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no document opener found (tried {})", candidates.join(", ")),
            )
        })
}

/// File stem restricted to characters safe in a temp file prefix.
fn file_stem(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let safe: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(40)
        .collect();
    if safe.is_empty() { "document".into() } else { safe }
}
