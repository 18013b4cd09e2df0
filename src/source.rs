//! Input reading
//!
//! The engine only ever sees bytes already in memory; this module gets them
//! from a file or from standard input.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Input errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read standard input")]
    Stdin(#[source] io::Error),

    #[error("{0} is a directory")]
    Directory(PathBuf),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Where input comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// `-` or no argument means standard input.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Source::Stdin,
            Some(path) => Source::File(PathBuf::from(path)),
        }
    }

    /// Name used for the document title and the info report
    pub fn name(&self) -> String {
        match self {
            Source::Stdin => "stdin".to_string(),
            Source::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        let data = match self {
            Source::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .map_err(SourceError::Stdin)?;
                buf
            }
            Source::File(path) => read_file(path)?,
        };
        debug!(source = %self.name(), bytes = data.len(), "input read");
        Ok(data)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    if path.is_dir() {
        return Err(SourceError::Directory(path.to_path_buf()));
    }
    fs::read(path).map_err(|source| SourceError::File {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_from_arg() {
        assert_eq!(Source::from_arg(None), Source::Stdin);
        assert_eq!(Source::from_arg(Some("-")), Source::Stdin);
        assert_eq!(
            Source::from_arg(Some("art/logo.ans")),
            Source::File(PathBuf::from("art/logo.ans"))
        );
        assert_eq!(Source::from_arg(Some("art/logo.ans")).name(), "logo.ans");
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"@X07Hello").unwrap();
        let source = Source::File(file.path().to_path_buf());
        assert_eq!(source.read().unwrap(), b"@X07Hello");
    }

    #[test]
    fn test_read_errors() {
        let dir = TempDir::new().unwrap();
        let err = Source::File(dir.path().to_path_buf()).read().unwrap_err();
        assert!(matches!(err, SourceError::Directory(_)));

        let err = Source::File(dir.path().join("missing.ans")).read().unwrap_err();
        assert!(matches!(err, SourceError::File { .. }));
        assert!(err.to_string().contains("missing.ans"));
    }
}
