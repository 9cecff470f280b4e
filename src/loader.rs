use std::path::Path;

use tracing::{debug, trace};

use crate::error::Error;
use crate::model::{Entry, EnvMap, to_map};
use crate::parser::parse_str_with_source;

/// Read and parse a single dotenv file.
///
/// Entries carry `path` as their source. A missing or unreadable file is an
/// [`Error::FileRead`].
pub fn read_env_file(path: impl AsRef<Path>) -> Result<Vec<Entry>, Error> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let content = std::str::from_utf8(&bytes)?;
    let entries = parse_str_with_source(content, Some(path))?;

    debug!(path = %path.display(), entries = entries.len(), "parsed env file");
    for entry in &entries {
        trace!(key = %entry.key, line = entry.line, "env entry");
    }

    Ok(entries)
}

/// Read a dotenv file into a decoded map.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<EnvMap, Error> {
    read_env_file(path).map(to_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_carry_source_path() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let file = dir.path().join(".env");
        std::fs::write(&file, "A=1\n# note\nB='two'\n").expect("failed to write fixture");

        let entries = read_env_file(&file).expect("read should succeed");
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|entry| entry.source.as_deref() == Some(file.as_path())));
        assert_eq!(entries[1].line, 3);

        let map = load_env_file(&file).expect("load should succeed");
        assert_eq!(map.get("B").expect("B should exist"), "two");
    }

    #[test]
    fn missing_file_is_a_file_read_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let file = dir.path().join("missing.env");

        let err = load_env_file(&file).expect_err("expected read error");
        match err {
            Error::FileRead { path, source } => {
                assert_eq!(path, file);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let file = dir.path().join(".env");
        std::fs::write(&file, b"A=\xfe\xff\n").expect("failed to write fixture");

        let err = load_env_file(&file).expect_err("expected encoding error");
        assert!(matches!(err, Error::InvalidEncoding(_)), "unexpected error: {err:?}");
    }
}
