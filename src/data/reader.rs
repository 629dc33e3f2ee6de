//! Buffered input file with a size hint

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::EvalError;

/// An opened input file read line by line into a caller-owned buffer
pub struct InputFile {
    path: PathBuf,
    reader: BufReader<File>,
    size: Option<u64>,
    /// Raw bytes of the current line
    bytes: Vec<u8>,
    line_no: usize,
}

impl InputFile {
    /// Open the file and fetch its size, `None` when the size is unavailable
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EvalError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| EvalError::Open {
            path: path.clone(),
            source,
        })?;
        let size = file.metadata().ok().map(|meta| meta.len());
        Ok(Self {
            path,
            reader: BufReader::new(file),
            size,
            bytes: Vec::new(),
            line_no: 0,
        })
    }

    /// File size in bytes if known
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name of the file
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// Replace the buffer content with the next line, without the line terminator.
    /// Returns false at the end of file.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD and reported, so a
    /// corrupt line does not stop the reading.
    pub fn read_line(&mut self, line: &mut String) -> Result<bool, EvalError> {
        line.clear();
        self.bytes.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.bytes)
            .map_err(|source| EvalError::Read {
                path: self.path.clone(),
                source,
            })?;
        if read == 0 {
            return Ok(false);
        }
        self.line_no += 1;

        while matches!(self.bytes.last(), Some(b'\n' | b'\r')) {
            self.bytes.pop();
        }
        match std::str::from_utf8(&self.bytes) {
            Ok(text) => line.push_str(text),
            Err(err) => {
                log::warn!(
                    "Invalid UTF-8 at line {} of {}: {}",
                    self.line_no,
                    self.path.display(),
                    err
                );
                line.push_str(&String::from_utf8_lossy(&self.bytes));
            }
        }
        Ok(true)
    }

    /// Number of lines read so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_lines_into_reused_buffer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1 2 3\r\n\n4 5").unwrap();

        let mut input = InputFile::open(file.path()).unwrap();
        assert_eq!(input.size(), Some(11));

        let mut line = String::new();
        assert!(input.read_line(&mut line).unwrap());
        assert_eq!(line, "1 2 3");
        assert!(input.read_line(&mut line).unwrap());
        assert_eq!(line, "");
        assert!(input.read_line(&mut line).unwrap());
        assert_eq!(line, "4 5");
        assert!(!input.read_line(&mut line).unwrap());
        assert!(line.is_empty());
        assert_eq!(input.line_no(), 3);
    }

    #[test]
    fn test_invalid_utf8_line_is_decoded_lossily() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"1 \xff 3\n4 5\n").unwrap();

        let mut input = InputFile::open(file.path()).unwrap();
        let mut line = String::new();
        assert!(input.read_line(&mut line).unwrap());
        assert_eq!(line, "1 \u{FFFD} 3");
        assert!(input.read_line(&mut line).unwrap());
        assert_eq!(line, "4 5");
        assert!(!input.read_line(&mut line).unwrap());
    }

    #[test]
    fn test_reading_a_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut input = InputFile::open(dir.path()).unwrap();
        let mut line = String::new();
        assert!(matches!(
            input.read_line(&mut line),
            Err(EvalError::Read { .. })
        ));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = InputFile::open(dir.path().join("missing.cnl"));
        assert!(matches!(result, Err(EvalError::Open { .. })));
    }
}
