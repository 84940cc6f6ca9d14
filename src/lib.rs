//! Streaming delimited-text reading with typed record binding
//!
//! `tabstream` parses tabular plain text (CSV and friends) one character at a
//! time: a pushback character source feeds a finite-state tokenizer, a record
//! assembler turns fields into records, and a declarative binding layer maps
//! raw records onto caller-defined types.
//!
//! Field separators and record delimiters may be multi-character strings;
//! quoting uses a single quote character with doubled-quote escaping, so a
//! quoted field can contain separators, delimiters and literal quotes.
//!
//! # Reading raw records
//!
//! ```
//! use std::io::Cursor;
//! use tabstream::TableReader;
//!
//! let data = "id,name\r\n1,\"Smith, John\"\r\n2,Lee\r\n";
//! let mut reader = TableReader::from_reader(Cursor::new(data)).unwrap();
//!
//! let header = reader.read_header().unwrap();
//! assert_eq!(header, vec!["id", "name"]);
//!
//! let rows: Vec<Vec<String>> = reader.rows().collect::<Result<_, _>>().unwrap();
//! assert_eq!(rows, vec![
//!     vec!["1".to_string(), "Smith, John".to_string()],
//!     vec!["2".to_string(), "Lee".to_string()],
//! ]);
//! ```
//!
//! # Reading typed records
//!
//! ```
//! use std::io::Cursor;
//! use tabstream::{Bind, Column, Kind, Layout, TableReader};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Bind for Person {
//!     fn layout() -> Layout<Self> {
//!         Layout::<Self>::new()
//!             .column(Column::named("id"), Kind::I64, |p, v| {
//!                 p.id = v.into_i64()?;
//!                 Ok(())
//!             })
//!             .column(Column::named("name"), Kind::Str, |p, v| {
//!                 p.name = v.into_string()?;
//!                 Ok(())
//!             })
//!     }
//! }
//!
//! let data = "id,name\r\n1,Alice\r\n";
//! let mut reader = TableReader::from_reader(Cursor::new(data)).unwrap();
//! reader.read_header().unwrap();
//!
//! let person: Person = reader.read_row_as().unwrap().unwrap();
//! assert_eq!(person, Person { id: 1, name: "Alice".to_string() });
//! ```

pub mod bind;
pub mod error;
pub mod reader;
pub mod scan;
pub mod settings;
pub mod types;

pub use bind::{Bind, Column, ColumnIndex, Layout, LayoutCache, ValueFormatter, ValueParser};
pub use error::{Result, TableError};
pub use reader::{Header, Rows, RowsAs, TableReader};
pub use settings::{Encoding, Newline, TableSettings};
pub use types::{Kind, Value};
