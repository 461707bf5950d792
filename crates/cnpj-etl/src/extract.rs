//! Streaming CSV extraction for RFB extracts
//!
//! The source files are semicolon-delimited, double-quoted and usually
//! headerless, with field names supplied by the pipeline layout. Records are
//! read as raw bytes and decoded field by field, so multi-gigabyte Latin-1
//! extracts stream without ever being loaded or transcoded whole.
//!
//! Decoding failures are fatal for the invocation: the extracts are expected
//! to match their declared encoding, and a mismatch means the wrong file.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{EtlError, Result};

/// Text encoding of a source extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8, tolerant of a leading byte-order mark
    Utf8,
    /// Single-byte Western European encoding used by the RFB extracts
    Latin1,
}

impl SourceEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::Latin1 => "Latin-1",
        }
    }
}

/// Fixed file layout for one entity's extract
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Entity name, used in diagnostics
    pub entity: &'static str,
    /// Text encoding of the file
    pub encoding: SourceEncoding,
    /// Ordered column names for headerless files; `None` means the first
    /// row is a header
    pub fieldnames: Option<&'static [&'static str]>,
    /// Columns that must be present before any data row is processed
    pub required: &'static [&'static str],
}

/// Resolved column names for one invocation
#[derive(Debug)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One raw record: field-name to raw-string access over a shared header
#[derive(Debug, Clone)]
pub struct RawRow {
    header: Arc<Header>,
    fields: Vec<String>,
    /// 1-based line number in the source file
    pub line: u64,
}

impl RawRow {
    pub fn new(header: Arc<Header>, fields: Vec<String>, line: u64) -> Self {
        Self {
            header,
            fields,
            line,
        }
    }

    /// Raw value of a named field; empty string when the column is missing
    /// or the row is short.
    pub fn get(&self, name: &str) -> &str {
        self.header
            .index_of(name)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Raw fields joined for diagnostics on row failure
    pub fn raw(&self) -> String {
        self.fields.join(";")
    }
}

/// Lazy, restartable-per-invocation CSV source
#[derive(Debug)]
pub struct CsvSource {
    reader: csv::Reader<File>,
    header: Arc<Header>,
    encoding: SourceEncoding,
    line: u64,
    first_record: bool,
}

impl CsvSource {
    /// Open a source file and resolve its header.
    ///
    /// Fails fast with [`EtlError::MissingColumns`] when a required column is
    /// absent, before any data row is yielded.
    pub fn open(path: &Path, layout: &Layout) -> Result<Self> {
        if !path.exists() {
            return Err(EtlError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .quote(b'"')
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut line = 0u64;
        let header = match layout.fieldnames {
            Some(names) => Header {
                names: names.iter().map(|n| n.to_string()).collect(),
            },
            None => {
                let mut record = csv::ByteRecord::new();
                if !reader.read_byte_record(&mut record)? {
                    Header { names: Vec::new() }
                } else {
                    line = 1;
                    let names = decode_record(&record, layout.encoding, line, true)?;
                    Header { names }
                }
            }
        };

        let missing: Vec<String> = layout
            .required
            .iter()
            .filter(|req| header.index_of(req).is_none())
            .map(|req| req.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EtlError::MissingColumns {
                entity: layout.entity,
                missing,
            });
        }

        Ok(Self {
            reader,
            header: Arc::new(header),
            encoding: layout.encoding,
            first_record: line == 0,
            line,
        })
    }

    /// Resolved column names
    pub fn headers(&self) -> &[String] {
        self.header.names()
    }

    /// Read the next record; `Ok(None)` at end of file.
    pub fn next_row(&mut self) -> Result<Option<RawRow>> {
        let mut record = csv::ByteRecord::new();
        if !self.reader.read_byte_record(&mut record)? {
            return Ok(None);
        }
        self.line += 1;
        let fields = decode_record(&record, self.encoding, self.line, self.first_record)?;
        self.first_record = false;
        Ok(Some(RawRow {
            header: Arc::clone(&self.header),
            fields,
            line: self.line,
        }))
    }
}

/// Decode one byte record into owned strings.
///
/// `strip_bom` applies only to the very first field of the file.
fn decode_record(
    record: &csv::ByteRecord,
    encoding: SourceEncoding,
    line: u64,
    strip_bom: bool,
) -> Result<Vec<String>> {
    let mut fields = Vec::with_capacity(record.len());
    for (i, raw) in record.iter().enumerate() {
        let mut value = match encoding {
            SourceEncoding::Latin1 => encoding_rs::mem::decode_latin1(raw).into_owned(),
            SourceEncoding::Utf8 => std::str::from_utf8(raw)
                .map_err(|_| EtlError::Decode {
                    encoding: encoding.as_str(),
                    line,
                })?
                .to_string(),
        };
        if strip_bom && i == 0 {
            if let Some(stripped) = value.strip_prefix('\u{feff}') {
                value = stripped.to_string();
            }
        }
        fields.push(value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAISES_LAYOUT: Layout = Layout {
        entity: "paises",
        encoding: SourceEncoding::Latin1,
        fieldnames: Some(&["codigo", "descricao"]),
        required: &["codigo", "descricao"],
    };

    fn write_bytes(content: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content).unwrap();
        f
    }

    #[test]
    fn test_headerless_latin1_fields() {
        // "Birmânia" in Latin-1: 0xE2 for 'â'
        let f = write_bytes(b"\"105\";\"BIRM\xC2NIA\"\n\"076\";\"BRASIL\"\n");
        let mut source = CsvSource::open(f.path(), &PAISES_LAYOUT).unwrap();

        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.get("codigo"), "105");
        assert_eq!(row.get("descricao"), "BIRMÂNIA");
        assert_eq!(row.line, 1);

        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.get("codigo"), "076");
        assert_eq!(row.get("descricao"), "BRASIL");
        assert!(source.next_row().unwrap().is_none());
    }

    #[test]
    fn test_missing_column_fails_before_rows() {
        let layout = Layout {
            entity: "paises",
            encoding: SourceEncoding::Utf8,
            fieldnames: None,
            required: &["codigo", "descricao"],
        };
        let f = write_bytes(b"codigo;name\n\"000\";\"COLIS POSTAUX\"\n");
        let err = CsvSource::open(f.path(), &layout).unwrap_err();
        match err {
            EtlError::MissingColumns { entity, missing } => {
                assert_eq!(entity, "paises");
                assert_eq!(missing, vec!["descricao".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_row_with_bom() {
        let layout = Layout {
            entity: "paises",
            encoding: SourceEncoding::Utf8,
            fieldnames: None,
            required: &["codigo", "descricao"],
        };
        let f = write_bytes(b"\xEF\xBB\xBFcodigo;descricao\n000;COLIS POSTAUX\n");
        let mut source = CsvSource::open(f.path(), &layout).unwrap();
        assert_eq!(source.headers(), ["codigo", "descricao"]);
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.get("codigo"), "000");
        // Data rows start after the header line
        assert_eq!(row.line, 2);
    }

    #[test]
    fn test_short_row_yields_empty_fields() {
        let f = write_bytes(b"\"013\"\n");
        let mut source = CsvSource::open(f.path(), &PAISES_LAYOUT).unwrap();
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.get("codigo"), "013");
        assert_eq!(row.get("descricao"), "");
        assert_eq!(row.get("nonexistent"), "");
    }

    #[test]
    fn test_missing_file() {
        let err = CsvSource::open(Path::new("/nonexistent/PAISCSV"), &PAISES_LAYOUT).unwrap_err();
        assert!(matches!(err, EtlError::FileNotFound(_)));
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let layout = Layout {
            entity: "paises",
            encoding: SourceEncoding::Utf8,
            fieldnames: Some(&["codigo", "descricao"]),
            required: &["codigo", "descricao"],
        };
        let f = write_bytes(b"\"105\";\"BIRM\xC2NIA\"\n");
        let mut source = CsvSource::open(f.path(), &layout).unwrap();
        let err = source.next_row().unwrap_err();
        assert!(matches!(err, EtlError::Decode { .. }));
    }
}
