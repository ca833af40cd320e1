//! Common types shared by the schema compiler, the store, and the
//! elicitation engine.

use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::path::PathBuf;
use std::sync::Arc;

use serde_yaml::Value;

/// The semantic type of a declared item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
    Text,
    Boolean,
    Sequence,
    /// A declarer-supplied tag. Any non-null value is an instance.
    Opaque(String),
}

impl ValueType {
    /// Runtime type of a concrete value. `None` for null, which has no type.
    pub fn of(value: &Value) -> Option<ValueType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(ValueType::Boolean),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(ValueType::Integer),
            Value::Number(_) => Some(ValueType::Float),
            Value::String(_) => Some(ValueType::Text),
            Value::Sequence(_) => Some(ValueType::Sequence),
            Value::Mapping(_) => Some(ValueType::Opaque("mapping".into())),
            Value::Tagged(tagged) => Some(ValueType::Opaque(tagged.tag.to_string())),
        }
    }

    /// Whether `value` is an instance of this type.
    ///
    /// Integers are instances of `Float` as well, so `0..10` style defaults
    /// work for float items.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ValueType::Float, Value::Number(_)) => true,
            (ValueType::Text, Value::String(_)) => true,
            (ValueType::Boolean, Value::Bool(_)) => true,
            (ValueType::Sequence, Value::Sequence(_)) => true,
            (ValueType::Opaque(_), v) => !v.is_null(),
            _ => false,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Text => "text",
            ValueType::Boolean => "boolean",
            ValueType::Sequence => "sequence",
            ValueType::Opaque(tag) => tag,
        }
    }

    /// The type name with its indefinite article ("an integer", "a float").
    pub fn with_article(&self) -> String {
        let name = self.name();
        let article = match name.chars().next() {
            Some(c) if "aeiouAEIOU".contains(c) => "an",
            _ => "a",
        };
        format!("{article} {name}")
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One endpoint of a [`Bound`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundValue {
    Int(i64),
    Float(f64),
}

impl BoundValue {
    fn as_f64(self) -> f64 {
        match self {
            BoundValue::Int(i) => i as f64,
            BoundValue::Float(f) => f,
        }
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Int(i) => write!(f, "{i}"),
            BoundValue::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A range constraint. The lower end is always inclusive; `inclusive`
/// describes the upper end, like `a..b` versus `a..=b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub low: BoundValue,
    pub high: BoundValue,
    pub inclusive: bool,
}

impl Bound {
    /// The item type a range seeds: taken from the lower end, and an integer
    /// lower end always means an integer item.
    pub fn value_type(&self) -> ValueType {
        match self.low {
            BoundValue::Int(_) => ValueType::Integer,
            BoundValue::Float(_) => ValueType::Float,
        }
    }

    pub fn contains(&self, candidate: i64) -> bool {
        match (self.low, self.high) {
            (BoundValue::Int(low), BoundValue::Int(high)) => {
                candidate >= low && (candidate < high || (self.inclusive && candidate == high))
            }
            (low, high) => {
                let c = candidate as f64;
                let (low, high) = (low.as_f64(), high.as_f64());
                c >= low && (c < high || (self.inclusive && c == high))
            }
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.inclusive { "..=" } else { ".." };
        write!(f, "{}{op}{}", self.low, self.high)
    }
}

macro_rules! bound_from_ranges {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Range<$t>> for Bound {
                fn from(r: Range<$t>) -> Self {
                    Bound {
                        low: BoundValue::$variant(r.start.into()),
                        high: BoundValue::$variant(r.end.into()),
                        inclusive: false,
                    }
                }
            }

            impl From<RangeInclusive<$t>> for Bound {
                fn from(r: RangeInclusive<$t>) -> Self {
                    let (start, end) = r.into_inner();
                    Bound {
                        low: BoundValue::$variant(start.into()),
                        high: BoundValue::$variant(end.into()),
                        inclusive: true,
                    }
                }
            }
        )*
    };
}

bound_from_ranges!(i32 => Int, i64 => Int, f64 => Float);

/// A predicate applied to every candidate answer before it is accepted.
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Validator {
    pub fn new(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Validator(Arc::new(f))
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Where the storage namespace directory lives.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BaseLocation {
    /// `<home-or-appdata>/.<configuration_root>`.
    #[default]
    Platform,
    /// An explicit directory used as-is. Useful for system-wide installs and tests.
    Path(PathBuf),
}

/// Codec for the persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Toml,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Yaml => "yml",
            DocumentFormat::Toml => "toml",
        }
    }
}

/// Per-owner options.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Load (or elicit) on first access.
    pub read_immediately: bool,
    /// Persist after every changed write.
    pub write_immediately: bool,
    /// Storage namespace name. Derived from the owner identity when `None`.
    pub configuration_root: Option<String>,
    /// Never prompt: take defaults, leave items without one unset.
    pub assume_default: bool,
    pub base: BaseLocation,
    pub format: DocumentFormat,
    /// Reject documents containing keys the schema does not declare.
    pub strict: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            read_immediately: true,
            write_immediately: true,
            configuration_root: None,
            assume_default: false,
            base: BaseLocation::Platform,
            format: DocumentFormat::Yaml,
            strict: false,
        }
    }
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    List,
    Get { key: String },
    Set { key: String, value: String },
    Unset { key: String },
    Path,
}

/// Render a value for display: scalars bare, collections as inline JSON.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "~".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, render_value(&tagged.value)),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{other:?}")),
    }
}
