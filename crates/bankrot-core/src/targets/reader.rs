use crate::records::InputRecord;
use crate::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Field separator inside a target line: `<username>||<birthday>`
pub const SEPARATOR: &str = "||";

/// Records parsed from a target file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetList {
    pub records: Vec<InputRecord>,
    /// Lines that did not split into exactly two fields
    pub malformed: usize,
}

impl TargetList {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct TargetReader;

impl TargetReader {
    /// Read a target file.
    ///
    /// Returns `Ok(None)` when the file does not exist, so callers can end the
    /// run quietly instead of failing.
    pub fn from_file(path: &Path) -> Result<Option<TargetList>> {
        tracing::debug!("Reading target file from: {}", path.display());

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("File {} not found", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some(Self::from_str(&content)))
    }

    /// Parse target lines from a string
    pub fn from_str(content: &str) -> TargetList {
        let mut list = TargetList::default();

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match Self::parse_line(line) {
                Some(record) => list.records.push(record),
                None => {
                    tracing::warn!(
                        "Line {}: invalid separator. Expected <username>{}<birthday>",
                        idx + 1,
                        SEPARATOR
                    );
                    list.malformed += 1;
                }
            }
        }

        tracing::info!("Found {} target records", list.records.len());

        list
    }

    /// Split one line into a record; fields are kept verbatim
    pub fn parse_line(line: &str) -> Option<InputRecord> {
        let mut fields = line.split(SEPARATOR);
        let username = fields.next()?;
        let birthday = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        Some(InputRecord::new(username, birthday))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_well_formed_line() {
        let record = TargetReader::parse_line("ivanov||01.01.1980").unwrap();
        assert_eq!(record, InputRecord::new("ivanov", "01.01.1980"));
    }

    #[test]
    fn test_parse_keeps_inner_whitespace() {
        let record = TargetReader::parse_line("Иванов Иван Иванович||01.01.1980").unwrap();
        assert_eq!(record.username, "Иванов Иван Иванович");
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert!(TargetReader::parse_line("malformed-line").is_none());
        assert!(TargetReader::parse_line("a|b").is_none());
    }

    #[test]
    fn test_parse_rejects_extra_fields() {
        assert!(TargetReader::parse_line("a||b||c").is_none());
    }

    #[test]
    fn test_from_str_skips_malformed_lines() {
        let list = TargetReader::from_str("a||b\nmalformed-line\nc||d\n");

        assert_eq!(
            list.records,
            vec![InputRecord::new("a", "b"), InputRecord::new("c", "d")]
        );
        assert_eq!(list.malformed, 1);
    }

    #[test]
    fn test_from_str_handles_crlf_and_blank_lines() {
        let list = TargetReader::from_str("a||b\r\n\r\nc||d\r\n");

        assert_eq!(list.records.len(), 2);
        assert_eq!(list.records[0].birthday, "b");
        assert_eq!(list.malformed, 0);
    }

    #[test]
    fn test_from_file_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = TargetReader::from_file(&dir.path().join("target.txt")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_from_file_reads_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "petrov||02.02.1975").unwrap();
        writeln!(file, "ivanov||01.01.1980").unwrap();

        let list = TargetReader::from_file(file.path()).unwrap().unwrap();
        assert_eq!(list.records.len(), 2);
        assert_eq!(list.records[0].username, "petrov");
        assert_eq!(list.records[1].username, "ivanov");
    }
}
