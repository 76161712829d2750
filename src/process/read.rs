use crate::error::{Result, TransformError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument};

/// Read a whole UTF-8 file into a `String`.
///
/// The handle is dropped before decoding, so it is released on every path.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = {
        let mut file =
            File::open(path).map_err(|e| TransformError::from_io(path.to_path_buf(), e))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| TransformError::from_io(path.to_path_buf(), e))?;
        buf
    };
    debug!(bytes = bytes.len(), "read file");

    String::from_utf8(bytes).map_err(|source| TransformError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::init_test_logging;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_read_round_trip() -> Result<()> {
        init_test_logging();
        let content = "id,status\n1,open\n2,fechado ✓\r\n";
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(content.as_bytes())?;

        assert_eq!(read_file(tmp.path())?, content);
        Ok(())
    }

    #[test]
    fn test_read_empty_file() -> Result<()> {
        let tmp = NamedTempFile::new()?;
        assert_eq!(read_file(tmp.path())?, "");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_not_found() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nope.txt");
        let err = read_file(&path).unwrap_err();
        assert!(matches!(err, TransformError::NotFound { path: ref p } if p == &path));
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(&[0x66, 0x6f, 0xff, 0xfe])?;

        let err = read_file(tmp.path()).unwrap_err();
        assert!(matches!(err, TransformError::Decode { .. }));
        Ok(())
    }

    #[test]
    fn test_directory_is_an_io_error() -> Result<()> {
        let dir = tempdir()?;
        let err = read_file(dir.path()).unwrap_err();
        assert!(!matches!(err, TransformError::NotFound { .. }));
        Ok(())
    }
}
