//! Declarative column binding: raw records onto typed values
//!
//! A [`Layout`] is the explicit, per-type table of [`Column`] descriptors and
//! setter functions that replaces attribute-style member metadata. Layouts are
//! built once per target type via the [`Bind`] trait and cached by type
//! identity in a [`LayoutCache`].

mod convert;

pub use convert::{format_primitive, parse_primitive};

use crate::error::{Result, TableError};
use crate::reader::Header;
use crate::types::{Kind, Value};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Custom field parser hook
///
/// Invoked with the raw field string and the column's culture tag instead of
/// the built-in primitive parser.
pub trait ValueParser: Send + Sync {
    /// Convert a raw field string into a value
    fn parse(&self, raw: &str, culture: Option<&str>) -> Result<Value>;
}

/// Custom field formatter hook, the mirror of [`ValueParser`]
pub trait ValueFormatter: Send + Sync {
    /// Convert a value back into its field-string representation
    fn format(&self, value: &Value, culture: Option<&str>) -> Result<String>;
}

/// How a column locates its field within a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnIndex {
    /// Zero-based position within the record
    Position(usize),
    /// Name resolved against the header
    Name(String),
}

/// Per-member column descriptor
///
/// Carries everything needed to turn one raw field into one member value:
/// the field index (positional or by name), an optional array sub-index, an
/// optional null sentinel, an optional culture tag and optional custom
/// conversion hooks.
///
/// ```
/// use tabstream::bind::Column;
///
/// let col = Column::named("price").null_string("NULL");
/// ```
#[derive(Clone)]
pub struct Column {
    index: ColumnIndex,
    slot: Option<usize>,
    null_string: Option<String>,
    culture: Option<String>,
    parser: Option<Arc<dyn ValueParser>>,
    formatter: Option<Arc<dyn ValueFormatter>>,
}

impl Column {
    /// Describe a column at a fixed position
    pub fn at(index: usize) -> Self {
        Column {
            index: ColumnIndex::Position(index),
            slot: None,
            null_string: None,
            culture: None,
            parser: None,
            formatter: None,
        }
    }

    /// Describe a column resolved by header name
    pub fn named(name: impl Into<String>) -> Self {
        Column {
            index: ColumnIndex::Name(name.into()),
            slot: None,
            null_string: None,
            culture: None,
            parser: None,
            formatter: None,
        }
    }

    /// Target one element of an array-valued member
    pub fn slot(mut self, index: usize) -> Self {
        self.slot = Some(index);
        self
    }

    /// Treat this exact field string as the null value
    pub fn null_string(mut self, sentinel: impl Into<String>) -> Self {
        self.null_string = Some(sentinel.into());
        self
    }

    /// Attach a culture tag, passed through to custom hooks
    pub fn culture(mut self, tag: impl Into<String>) -> Self {
        self.culture = Some(tag.into());
        self
    }

    /// Use a custom parser instead of the built-in primitive parser
    pub fn parser(mut self, parser: Arc<dyn ValueParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Use a custom formatter instead of the built-in primitive formatter
    pub fn formatter(mut self, formatter: Arc<dyn ValueFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// The array sub-index, if this column targets an array element
    pub fn array_slot(&self) -> Option<usize> {
        self.slot
    }

    /// Resolve this column to a field index
    ///
    /// Positional indices are used directly; names are looked up in the
    /// header and fail with a lookup error when no header has been read or
    /// the name is absent.
    pub fn resolve(&self, header: Option<&Header>) -> Result<usize> {
        match &self.index {
            ColumnIndex::Position(index) => Ok(*index),
            ColumnIndex::Name(name) => {
                let header = header.ok_or_else(|| {
                    TableError::Lookup(format!(
                        "column {:?} is name-based but no header has been read",
                        name
                    ))
                })?;
                header.index_of(name).ok_or_else(|| {
                    TableError::Lookup(format!("column {:?} not found in header", name))
                })
            }
        }
    }

    /// Parse a raw field for this column
    ///
    /// The null sentinel is checked first; otherwise the custom parser (if
    /// any) or the built-in parser for `kind` runs. For array or optional
    /// members `kind` is the element/wrapped kind.
    pub fn parse(&self, raw: &str, kind: Kind) -> Result<Value> {
        if let Some(sentinel) = &self.null_string {
            if raw == sentinel {
                return Ok(Value::Null);
            }
        }
        if let Some(parser) = &self.parser {
            return parser.parse(raw, self.culture.as_deref());
        }
        convert::parse_primitive(kind, raw)
    }

    /// Format a value for this column, the mirror of [`Column::parse`]
    ///
    /// `Null` yields the sentinel string, or the empty string if none is
    /// configured.
    pub fn format(&self, value: &Value) -> Result<String> {
        if value.is_null() {
            return Ok(self.null_string.clone().unwrap_or_default());
        }
        if let Some(formatter) = &self.formatter {
            return formatter.format(value, self.culture.as_deref());
        }
        Ok(convert::format_primitive(value))
    }
}

type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<()> + Send + Sync>;
type Getter<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;

/// One member binding: a column descriptor, its kind and accessors
struct Binding<T> {
    column: Column,
    kind: Kind,
    set: Setter<T>,
    get: Option<Getter<T>>,
}

/// Ordered binding table for one target type
///
/// ```
/// use tabstream::bind::{Bind, Column, Layout};
/// use tabstream::types::Kind;
///
/// #[derive(Default)]
/// struct Person {
///     id: i64,
///     name: String,
/// }
///
/// impl Bind for Person {
///     fn layout() -> Layout<Self> {
///         Layout::<Self>::new()
///             .column(Column::at(0), Kind::I64, |p, v| {
///                 p.id = v.into_i64()?;
///                 Ok(())
///             })
///             .column(Column::named("name"), Kind::Str, |p, v| {
///                 p.name = v.into_string()?;
///                 Ok(())
///             })
///     }
/// }
/// ```
pub struct Layout<T> {
    bindings: Vec<Binding<T>>,
}

impl<T: Default> Layout<T> {
    /// Create an empty layout
    pub fn new() -> Self {
        Layout {
            bindings: Vec::new(),
        }
    }

    /// Add a column with a setter
    pub fn column(
        mut self,
        column: Column,
        kind: Kind,
        set: impl Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.bindings.push(Binding {
            column,
            kind,
            set: Box::new(set),
            get: None,
        });
        self
    }

    /// Add a column with a setter and a getter for the formatting mirror
    pub fn column_mirrored(
        mut self,
        column: Column,
        kind: Kind,
        set: impl Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.bindings.push(Binding {
            column,
            kind,
            set: Box::new(set),
            get: Some(Box::new(get)),
        });
        self
    }

    /// Construct a `T` from a raw record
    ///
    /// Resolves each column's index against the header, parses the field and
    /// applies the setter. Members are independent; application order is the
    /// declaration order but nothing may rely on it.
    pub fn bind(&self, record: &[String], header: Option<&Header>) -> Result<T> {
        let mut target = T::default();
        for binding in &self.bindings {
            let index = binding.column.resolve(header)?;
            let raw = record.get(index).ok_or_else(|| {
                TableError::Lookup(format!(
                    "column index {} out of range for record with {} fields",
                    index,
                    record.len()
                ))
            })?;
            let value = binding.column.parse(raw, binding.kind)?;
            (binding.set)(&mut target, value)?;
        }
        Ok(target)
    }

    /// Format a `T` back into field strings, in declaration order
    ///
    /// Every column must have been declared with
    /// [`column_mirrored`](Layout::column_mirrored); a missing getter is a
    /// configuration error.
    pub fn format_record(&self, target: &T) -> Result<Vec<String>> {
        self.bindings
            .iter()
            .map(|binding| {
                let get = binding.get.as_ref().ok_or_else(|| {
                    TableError::Config(
                        "column has no getter; declare it with column_mirrored".to_string(),
                    )
                })?;
                binding.column.format(&get(target))
            })
            .collect()
    }
}

impl<T: Default> Default for Layout<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Types that can be bound from raw records
///
/// The layout is derived once per type and cached; see [`LayoutCache`].
pub trait Bind: Default + Sized + 'static {
    /// Declare the ordered column bindings for this type
    fn layout() -> Layout<Self>;
}

/// Type-identity-keyed cache of layouts
///
/// Building a layout (enumerating members and descriptors) is assumed
/// expensive relative to repeated use, so each type's layout is built at most
/// once. The cache is internally synchronized; wrap it in an `Arc` to share
/// one cache across readers or threads.
#[derive(Default)]
pub struct LayoutCache {
    layouts: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl LayoutCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or build the layout for `T`
    pub fn layout_of<T: Bind>(&self) -> Arc<Layout<T>> {
        let mut layouts = self
            .layouts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = layouts
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(T::layout()) as Arc<dyn Any + Send + Sync>)
            .clone();
        match entry.downcast::<Layout<T>>() {
            Ok(layout) => layout,
            Err(_) => {
                // TypeId keying makes this unreachable; rebuild rather than panic.
                let layout = Arc::new(T::layout());
                layouts.insert(TypeId::of::<T>(), layout.clone());
                layout
            }
        }
    }

    /// Number of cached layouts
    pub fn len(&self) -> usize {
        self.layouts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// True when nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
