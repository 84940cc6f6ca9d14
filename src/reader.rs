//! Streaming table reader: record assembly over the tokenizer

use crate::bind::{Bind, LayoutCache};
use crate::error::{Result, TableError};
use crate::scan::{PushbackSource, State, Tokenizer};
use crate::settings::TableSettings;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// Column names read from the first record
///
/// Set at most once per reader and immutable afterwards. Keeps the names in
/// order and resolves name-based column lookups; the first occurrence wins
/// when a name repeats.
pub struct Header {
    fields: Vec<String>,
    index: IndexMap<String, usize>,
}

impl Header {
    /// Build a header from a raw record
    pub fn new(fields: &[String]) -> Self {
        let mut index = IndexMap::with_capacity(fields.len());
        for (position, name) in fields.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Header {
            fields: fields.to_vec(),
            index,
        }
    }

    /// The column names in order
    pub fn names(&self) -> &[String] {
        &self.fields
    }

    /// Resolve a name to its field index
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a header with no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Streaming reader for delimited tabular text
///
/// Pulls characters one at a time through a pushback source, assembles fields
/// with the tokenizer state machine and exposes records either raw
/// (`Vec<String>`) or bound onto a typed record via a [`Bind`] layout.
///
/// One reader owns its source, field buffer and current record; it is
/// single-threaded by construction. Dropping the reader (or calling
/// [`close`](TableReader::close)) releases the source exactly once.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use tabstream::reader::TableReader;
///
/// let data = "id,name\r\n1,\"Smith, John\"\r\n2,Lee\r\n";
/// let mut reader = TableReader::from_reader(Cursor::new(data)).unwrap();
///
/// let header = reader.read_header().unwrap();
/// assert_eq!(header, vec!["id", "name"]);
///
/// for row in reader.rows() {
///     let row = row.unwrap();
///     println!("{:?}", row);
/// }
/// ```
pub struct TableReader<R: Read> {
    // None once closed; dropping it releases the underlying source.
    source: Option<PushbackSource<BufReader<R>>>,
    tokenizer: Tokenizer,
    state: State,

    // Assembler state
    field_buffer: String,
    record: Vec<String>,
    header: Option<Header>,
    row_count: u64,

    cache: Arc<LayoutCache>,
}

impl TableReader<File> {
    /// Open a file with default settings
    ///
    /// The reader owns the file and closes it when dropped or closed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, TableSettings::default())
    }

    /// Open a file with explicit settings
    pub fn open_with<P: AsRef<Path>>(path: P, settings: TableSettings) -> Result<Self> {
        let file = File::open(path)?;
        Self::with_settings(file, settings)
    }
}

impl<R: Read> TableReader<R> {
    /// Wrap an externally supplied source with default settings
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::with_settings(reader, TableSettings::default())
    }

    /// Wrap an externally supplied source with explicit settings
    ///
    /// Settings are validated here; an empty separator or delimiter fails
    /// with a configuration error.
    pub fn with_settings(reader: R, settings: TableSettings) -> Result<Self> {
        let tokenizer = Tokenizer::new(&settings)?;
        Ok(TableReader {
            source: Some(PushbackSource::new(
                BufReader::new(reader),
                settings.decoding(),
            )),
            tokenizer,
            state: State::EndOfRecord,
            field_buffer: String::new(),
            record: Vec::new(),
            header: None,
            row_count: 0,
            cache: Arc::new(LayoutCache::new()),
        })
    }

    /// Share a layout cache across readers
    pub fn with_cache(mut self, cache: Arc<LayoutCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Read one field, or `None` once the stream is exhausted
    fn read_field(&mut self) -> Result<Option<String>> {
        if self.state == State::EndOfStream {
            return Ok(None);
        }
        let source = self.source.as_mut().ok_or(TableError::Closed)?;
        self.field_buffer.clear();
        loop {
            self.state = self
                .tokenizer
                .step(self.state, source, &mut self.field_buffer)?;
            if !self.state.mid_field() {
                break;
            }
        }
        Ok(Some(self.field_buffer.clone()))
    }

    /// Assemble the next record into the current-record buffer
    ///
    /// Returns `Ok(false)` when nothing is left. The end sentinel: the stream
    /// ended and exactly one empty field was collected, which is what a
    /// trailing record delimiter leaves behind - it is not a record.
    fn move_next(&mut self) -> Result<bool> {
        if self.source.is_none() {
            return Err(TableError::Closed);
        }
        if self.state == State::EndOfStream {
            return Ok(false);
        }
        self.record.clear();
        loop {
            match self.read_field()? {
                Some(field) => self.record.push(field),
                None => break,
            }
            if self.state != State::EndOfField {
                break;
            }
        }
        let exhausted = self.state == State::EndOfStream
            && self.record.len() == 1
            && self.record[0].is_empty();
        if !exhausted {
            self.row_count += 1;
        }
        Ok(!exhausted)
    }

    /// Read the first record as the header
    ///
    /// May be called at most once; returns a copy of the column names.
    /// Name-based column resolution is available afterwards.
    pub fn read_header(&mut self) -> Result<Vec<String>> {
        if self.header.is_some() {
            return Err(TableError::Config(
                "header has already been read".to_string(),
            ));
        }
        if !self.move_next()? {
            return Err(TableError::Lookup(
                "cannot read a header from an empty stream".to_string(),
            ));
        }
        self.header = Some(Header::new(&self.record));
        Ok(self.record.clone())
    }

    /// The header, if one has been read
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Read one raw record
    ///
    /// Returns `Ok(None)` when no records remain. The returned record is a
    /// copy; the reader reuses its internal buffer.
    pub fn read_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.move_next()? {
            Ok(Some(self.record.clone()))
        } else {
            Ok(None)
        }
    }

    /// Read one record bound onto `T`
    ///
    /// Returns `Ok(None)` when no records remain. The layout for `T` is
    /// built on first use and cached.
    pub fn read_row_as<T: Bind>(&mut self) -> Result<Option<T>> {
        if !self.move_next()? {
            return Ok(None);
        }
        let layout = self.cache.layout_of::<T>();
        layout.bind(&self.record, self.header.as_ref()).map(Some)
    }

    /// Lazy forward-only iterator over raw records
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows { reader: self }
    }

    /// Lazy forward-only iterator over typed records
    pub fn rows_as<T: Bind>(&mut self) -> RowsAs<'_, R, T> {
        RowsAs {
            reader: self,
            _marker: PhantomData,
        }
    }

    /// Number of records read so far (header included)
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Close the reader, releasing the underlying source
    ///
    /// Idempotent; any read after the first close fails with
    /// [`TableError::Closed`].
    pub fn close(&mut self) {
        self.state = State::Closed;
        self.source = None;
    }
}

impl<R: Read> Drop for TableReader<R> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Iterator over raw records; see [`TableReader::rows`]
pub struct Rows<'a, R: Read> {
    reader: &'a mut TableReader<R>,
}

impl<'a, R: Read> Iterator for Rows<'a, R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}

/// Iterator over typed records; see [`TableReader::rows_as`]
pub struct RowsAs<'a, R: Read, T: Bind> {
    reader: &'a mut TableReader<R>,
    _marker: PhantomData<T>,
}

impl<'a, R: Read, T: Bind> Iterator for RowsAs<'a, R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row_as::<T>().transpose()
    }
}
