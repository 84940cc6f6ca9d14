//! Integration tests for tabstream

use std::io::Write;
use std::sync::Arc;
use tabstream::{
    Bind, Column, Kind, Layout, Result, TableError, TableReader, TableSettings, Value,
    ValueParser,
};
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_end_to_end_header_and_quoted_fields() {
    let file = write_temp("id,name\r\n1,\"Smith, John\"\r\n2,Lee\r\n");
    let mut reader = TableReader::open(file.path()).unwrap();

    let header = reader.read_header().unwrap();
    assert_eq!(header, vec!["id", "name"]);

    let rows: Vec<Vec<String>> = reader.rows().collect::<Result<_>>().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["1", "Smith, John"]);
    assert_eq!(rows[1], vec!["2", "Lee"]);
}

#[test]
fn test_trailing_delimiter_boundary() {
    let file = write_temp("a,b\r\n");
    let mut reader = TableReader::open(file.path()).unwrap();
    let rows: Vec<Vec<String>> = reader.rows().collect::<Result<_>>().unwrap();
    assert_eq!(rows, vec![vec!["a", "b"]]);

    let file = write_temp("a,b\r\n\r\n");
    let mut reader = TableReader::open(file.path()).unwrap();
    let rows: Vec<Vec<String>> = reader.rows().collect::<Result<_>>().unwrap();
    assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string()], vec![String::new()]]);
}

#[test]
fn test_unterminated_quote_is_an_error() {
    let file = write_temp("a,\"unterminated");
    let mut reader = TableReader::open(file.path()).unwrap();
    let result: Result<Vec<Vec<String>>> = reader.rows().collect();
    assert!(matches!(result, Err(TableError::Malformed(_))));
}

#[test]
fn test_close_is_idempotent_and_final() {
    let file = write_temp("a,b\r\nc,d\r\n");
    let mut reader = TableReader::open(file.path()).unwrap();
    assert_eq!(reader.read_row().unwrap().unwrap(), vec!["a", "b"]);

    reader.close();
    reader.close();
    assert!(matches!(reader.read_row(), Err(TableError::Closed)));
    assert!(matches!(reader.read_header(), Err(TableError::Closed)));
}

// Mirrors a real-world use: a coded enum column parsed via a custom hook.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum UpdateFlag {
    #[default]
    Unchanged,
    Changed,
    Removed,
}

struct UpdateFlagParser;

impl ValueParser for UpdateFlagParser {
    fn parse(&self, raw: &str, _culture: Option<&str>) -> Result<Value> {
        match raw {
            "0" => Ok(Value::U8(0)),
            "1" => Ok(Value::U8(1)),
            "2" => Ok(Value::U8(2)),
            other => Err(TableError::Convert(format!(
                "unknown update flag {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct PostalCode {
    code: String,
    town: String,
    updated: UpdateFlag,
}

impl Bind for PostalCode {
    fn layout() -> Layout<Self> {
        Layout::<Self>::new()
            .column(Column::at(0), Kind::Str, |p, v| {
                p.code = v.into_string()?;
                Ok(())
            })
            .column(Column::at(1), Kind::Str, |p, v| {
                p.town = v.into_string()?;
                Ok(())
            })
            .column(
                Column::at(2).parser(Arc::new(UpdateFlagParser)),
                Kind::U8,
                |p, v| {
                    p.updated = match v.into_u8()? {
                        0 => UpdateFlag::Unchanged,
                        1 => UpdateFlag::Changed,
                        _ => UpdateFlag::Removed,
                    };
                    Ok(())
                },
            )
    }
}

#[test]
fn test_typed_records_with_custom_parser() {
    let file = write_temp("1000001,\"Chiyoda, Tokyo\",0\r\n1000002,Shibuya,1\r\n");
    let mut reader = TableReader::open(file.path()).unwrap();

    let codes: Vec<PostalCode> = reader.rows_as().collect::<Result<_>>().unwrap();
    assert_eq!(
        codes,
        vec![
            PostalCode {
                code: "1000001".to_string(),
                town: "Chiyoda, Tokyo".to_string(),
                updated: UpdateFlag::Unchanged,
            },
            PostalCode {
                code: "1000002".to_string(),
                town: "Shibuya".to_string(),
                updated: UpdateFlag::Changed,
            },
        ]
    );
}

#[test]
fn test_typed_records_with_bad_flag_fail() {
    let file = write_temp("1000001,Chiyoda,9\r\n");
    let mut reader = TableReader::open(file.path()).unwrap();
    let result: Result<Vec<PostalCode>> = reader.rows_as().collect();
    assert!(matches!(result, Err(TableError::Convert(_))));
}

#[test]
fn test_semicolon_separated_file() {
    let file = write_temp("x;y;z\r\n1;2;3\r\n");
    let settings = TableSettings::default().field_separator(";");
    let mut reader = TableReader::open_with(file.path(), settings).unwrap();

    let header = reader.read_header().unwrap();
    assert_eq!(header, vec!["x", "y", "z"]);
    assert_eq!(reader.read_row().unwrap().unwrap(), vec!["1", "2", "3"]);
    assert_eq!(reader.read_row().unwrap(), None);
}

#[test]
fn test_quoted_field_spanning_records() {
    // A record delimiter inside quotes is part of the field.
    let file = write_temp("a,\"line one\r\nline two\"\r\nb,c\r\n");
    let mut reader = TableReader::open(file.path()).unwrap();
    let rows: Vec<Vec<String>> = reader.rows().collect::<Result<_>>().unwrap();
    assert_eq!(rows[0], vec!["a", "line one\r\nline two"]);
    assert_eq!(rows[1], vec!["b", "c"]);
}
