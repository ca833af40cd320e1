//! Schema compilation: declarations in, normalized item descriptors out.
//!
//! A leaf is declared as a short ordered list of [`Decl`] elements, usually
//! written with the [`decl!`](crate::decl) macro:
//!
//! ```ignore
//! let schema = Schema::new()
//!     .item("port", decl![1..65535, "port number"])
//!     .item("color", decl![["red", "green", "blue"], "pick one"])
//!     .item("enabled", decl![true, "enable?"])
//!     .item("user", decl![ValueType::Text])
//!     .section("db", Schema::new().item("host", decl!["localhost"]));
//! ```
//!
//! # Classification rules
//!
//! [`compile_item`] applies these rules in order:
//!
//! 1. The **first** element seeds the item:
//!
//!    | First element       | `value_type`              | Other fields      |
//!    |---------------------|---------------------------|-------------------|
//!    | `Choices(list)`     | runtime type of `list[0]` | `choices = list`  |
//!    | `Range(bound)`      | type of the lower end     | `range = bound`   |
//!    | `Value(Bool(b))`    | `Boolean`                 | `default = b`     |
//!    | `Type(t)`           | `t`                       |                   |
//!    | `Value(v)`          | runtime type of `v`       | `default = v`     |
//!    | `Value(Null)`, `Validator` | rejected           |                   |
//!
//! 2. The **second** element, when it is a string value, is the question.
//!    Any other second element is classified with the rest.
//! 3. **Remaining** elements are classified by their variant; the first of
//!    each category wins and later duplicates are ignored: `Validator` →
//!    validator, `Choices` → choices, `Range` → range, `Value` → default,
//!    `Type` → explicit type (overrides the inferred one).
//! 4. A range with no validator synthesizes one: the candidate, read as an
//!    integer, must lie within the bound.
//! 5. A missing question becomes `"<owner> requests a <type>"`, with `an`
//!    before a vowel (`requests an integer`); a range is appended to the
//!    question in parentheses.
//! 6. A default that is not an instance of the item type is a
//!    [`Schema`](AskfigError::Schema) error.

use std::collections::BTreeMap;
use std::ops::{Range, RangeInclusive};

use serde_yaml::Value;

use crate::coerce;
use crate::error::AskfigError;
use crate::types::{Bound, Validator, ValueType, render_value};

/// One positional element of a leaf declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    Type(ValueType),
    Value(Value),
    Choices(Vec<Value>),
    Range(Bound),
    Validator(Validator),
}

impl Decl {
    /// An explicit value element. Use this for defaults that would otherwise
    /// be read as another shape, e.g. a sequence default.
    pub fn value(v: impl Into<Value>) -> Self {
        Decl::Value(v.into())
    }

    pub fn choices<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Decl::Choices(items.into_iter().map(Into::into).collect())
    }

    pub fn validator(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Decl::Validator(Validator::new(f))
    }
}

macro_rules! decl_from_values {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Decl {
                fn from(v: $t) -> Self {
                    Decl::Value(v.into())
                }
            }
        )*
    };
}

decl_from_values!(bool, i32, i64, u16, u32, f64, &str, String, Value);

macro_rules! decl_from_ranges {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<Range<$t>> for Decl {
                fn from(r: Range<$t>) -> Self {
                    Decl::Range(r.into())
                }
            }

            impl From<RangeInclusive<$t>> for Decl {
                fn from(r: RangeInclusive<$t>) -> Self {
                    Decl::Range(r.into())
                }
            }
        )*
    };
}

decl_from_ranges!(i32, i64, f64);

impl From<ValueType> for Decl {
    fn from(t: ValueType) -> Self {
        Decl::Type(t)
    }
}

impl From<Bound> for Decl {
    fn from(b: Bound) -> Self {
        Decl::Range(b)
    }
}

impl From<Validator> for Decl {
    fn from(v: Validator) -> Self {
        Decl::Validator(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Decl {
    fn from(items: Vec<T>) -> Self {
        Decl::choices(items)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Decl {
    fn from(items: [T; N]) -> Self {
        Decl::choices(items)
    }
}

/// An ordered leaf declaration.
#[derive(Debug, Clone, Default)]
pub struct Declaration(Vec<Decl>);

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn with(mut self, element: impl Into<Decl>) -> Self {
        self.0.push(element.into());
        self
    }

    pub fn elements(&self) -> &[Decl] {
        &self.0
    }
}

impl From<Vec<Decl>> for Declaration {
    fn from(elements: Vec<Decl>) -> Self {
        Declaration(elements)
    }
}

impl From<Decl> for Declaration {
    fn from(element: Decl) -> Self {
        Declaration(vec![element])
    }
}

/// Build a [`Declaration`] from positional elements.
///
/// Each element goes through `Decl::from`, so literals, ranges, arrays,
/// type tags and validators can be mixed freely:
///
/// ```ignore
/// decl![1..=10, "retries", Decl::validator(|v| v.as_i64() != Some(7))]
/// ```
#[macro_export]
macro_rules! decl {
    ($($element:expr),+ $(,)?) => {
        $crate::Declaration::from(vec![$($crate::Decl::from($element)),+])
    };
}

/// A raw schema: keys mapped to leaf declarations or nested schemas.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: BTreeMap<String, SchemaNode>,
}

#[derive(Debug, Clone)]
pub enum SchemaNode {
    Leaf(Declaration),
    Nested(Schema),
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a leaf. A bare element converts to a one-element declaration.
    pub fn item(mut self, key: &str, declaration: impl Into<Declaration>) -> Self {
        self.entries
            .insert(key.to_string(), SchemaNode::Leaf(declaration.into()));
        self
    }

    /// Declare a nested section.
    pub fn section(mut self, key: &str, schema: Schema) -> Self {
        self.entries
            .insert(key.to_string(), SchemaNode::Nested(schema));
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A normalized leaf.
#[derive(Debug, Clone)]
pub struct ItemDescriptor {
    pub value_type: ValueType,
    pub default: Option<Value>,
    pub question: String,
    pub choices: Option<Vec<Value>>,
    pub range: Option<Bound>,
    pub validator: Option<Validator>,
}

impl ItemDescriptor {
    /// Whether the validator (if any) accepts `value`.
    pub fn accepts(&self, value: &Value) -> bool {
        self.validator.as_ref().is_none_or(|v| v.check(value))
    }
}

#[derive(Debug, Clone)]
pub enum ConfigNode {
    Item(ItemDescriptor),
    Tree(ConfigTree),
}

/// Compiled schema: keys mapped to items or nested trees.
pub type ConfigTree = BTreeMap<String, ConfigNode>;

/// Find the item at a dotted key path.
pub fn find_item<'a>(tree: &'a ConfigTree, dotted_key: &str) -> Option<&'a ItemDescriptor> {
    let mut current = tree;
    let mut segments = dotted_key.split('.').peekable();
    while let Some(segment) = segments.next() {
        match (current.get(segment)?, segments.peek()) {
            (ConfigNode::Item(item), None) => return Some(item),
            (ConfigNode::Tree(sub), Some(_)) => current = sub,
            _ => return None,
        }
    }
    None
}

/// Compile a whole schema into a [`ConfigTree`].
///
/// `owner` is used when synthesizing questions. Errors name the dotted key
/// of the offending declaration.
pub fn compile(owner: &str, schema: &Schema) -> Result<ConfigTree, AskfigError> {
    compile_at(owner, schema, "")
}

fn compile_at(owner: &str, schema: &Schema, prefix: &str) -> Result<ConfigTree, AskfigError> {
    let mut tree = ConfigTree::new();
    for (key, node) in schema.entries() {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let compiled = match node {
            SchemaNode::Nested(sub) => ConfigNode::Tree(compile_at(owner, sub, &dotted)?),
            SchemaNode::Leaf(declaration) => {
                ConfigNode::Item(compile_item(owner, &dotted, declaration)?)
            }
        };
        tree.insert(key.clone(), compiled);
    }
    Ok(tree)
}

/// Compile one leaf declaration. See the module docs for the rules.
pub fn compile_item(
    owner: &str,
    key: &str,
    declaration: &Declaration,
) -> Result<ItemDescriptor, AskfigError> {
    let invalid = |reason: String| AskfigError::Schema {
        key: key.to_string(),
        reason,
    };

    let mut elements = declaration.elements().iter().peekable();
    let first = elements
        .next()
        .ok_or_else(|| invalid("empty declaration".into()))?;

    let mut value_type: ValueType;
    let mut default = None;
    let mut choices = None;
    let mut range = None;
    let mut validator = None;

    match first {
        Decl::Choices(list) => {
            let head = list
                .first()
                .ok_or_else(|| invalid("choice list is empty".into()))?;
            value_type = ValueType::of(head)
                .ok_or_else(|| invalid("first choice is null".into()))?;
            choices = Some(list.clone());
        }
        Decl::Range(bound) => {
            value_type = bound.value_type();
            range = Some(*bound);
        }
        Decl::Value(Value::Bool(b)) => {
            value_type = ValueType::Boolean;
            default = Some(Value::Bool(*b));
        }
        Decl::Type(t) => value_type = t.clone(),
        Decl::Value(Value::Null) => {
            return Err(invalid("null cannot start a declaration".into()));
        }
        Decl::Value(v) => {
            value_type = ValueType::of(v).ok_or_else(|| invalid("untyped default".into()))?;
            default = Some(v.clone());
        }
        Decl::Validator(_) => {
            return Err(invalid(
                "a validator cannot start a declaration; put a type, default, choices or range first"
                    .into(),
            ));
        }
    }

    let question = match elements.peek() {
        Some(Decl::Value(Value::String(q))) => {
            let q = q.clone();
            elements.next();
            Some(q)
        }
        _ => None,
    };

    let mut explicit_type = None;
    for element in elements {
        match element {
            Decl::Validator(v) => {
                validator.get_or_insert_with(|| v.clone());
            }
            Decl::Choices(list) if choices.is_none() => {
                if list.is_empty() {
                    return Err(invalid("choice list is empty".into()));
                }
                choices = Some(list.clone());
            }
            Decl::Range(bound) => {
                range.get_or_insert(*bound);
            }
            Decl::Value(v) if !v.is_null() => {
                default.get_or_insert_with(|| v.clone());
            }
            Decl::Type(t) => {
                explicit_type.get_or_insert_with(|| t.clone());
            }
            _ => {}
        }
    }
    if let Some(t) = explicit_type {
        value_type = t;
    }

    if validator.is_none()
        && let Some(bound) = range
    {
        validator = Some(Validator::new(move |candidate| {
            coerce::to_integer(candidate).is_some_and(|n| bound.contains(n))
        }));
    }

    let mut question =
        question.unwrap_or_else(|| format!("{owner} requests {}", value_type.with_article()));
    if let Some(bound) = range {
        question = format!("{question} ({bound})");
    }

    if let Some(d) = &default
        && !value_type.accepts(d)
    {
        return Err(invalid(format!(
            "default {} is not {}",
            render_value(d),
            value_type.with_article()
        )));
    }

    Ok(ItemDescriptor {
        value_type,
        default,
        question,
        choices,
        range,
        validator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(declaration: Declaration) -> ItemDescriptor {
        compile_item("Acme::NetServer", "key", &declaration).unwrap()
    }

    #[test]
    fn choices_seed_type_from_first_element() {
        let it = item(decl![["red", "green", "blue"], "pick one"]);
        assert_eq!(it.value_type, ValueType::Text);
        assert_eq!(
            it.choices,
            Some(vec![
                Value::from("red"),
                Value::from("green"),
                Value::from("blue")
            ])
        );
        assert_eq!(it.question, "pick one");
        assert!(it.default.is_none());
    }

    #[test]
    fn integer_choices() {
        let it = item(decl![vec![1, 2, 4, 8]]);
        assert_eq!(it.value_type, ValueType::Integer);
        assert_eq!(it.choices.unwrap().len(), 4);
    }

    #[test]
    fn range_seeds_integer_type_and_validator() {
        let it = item(decl![1..65535, "port number"]);
        assert_eq!(it.value_type, ValueType::Integer);
        assert_eq!(it.question, "port number (1..65535)");
        let v = it.validator.unwrap();
        assert!(v.check(&Value::from(1)));
        assert!(v.check(&Value::from(8080)));
        assert!(v.check(&Value::from(65534)));
        assert!(!v.check(&Value::from(65535)));
        assert!(!v.check(&Value::from(0)));
        assert!(!v.check(&Value::from(70000)));
    }

    #[test]
    fn synthesized_validator_honours_inclusive_end() {
        let v = item(decl![1..=3]).validator.unwrap();
        for n in -2..=6 {
            assert_eq!(v.check(&Value::from(n)), (1..=3).contains(&n), "n = {n}");
        }
    }

    #[test]
    fn synthesized_validator_rejects_non_integers() {
        let v = item(decl![1..10]).validator.unwrap();
        assert!(v.check(&Value::from("5")));
        assert!(!v.check(&Value::from("five")));
        assert!(!v.check(&Value::Bool(true)));
    }

    #[test]
    fn explicit_validator_wins_over_range() {
        let it = item(decl![
            1..100,
            "even",
            Decl::validator(|v| v.as_i64().is_some_and(|n| n % 2 == 0))
        ]);
        let v = it.validator.unwrap();
        assert!(v.check(&Value::from(200)));
        assert!(!v.check(&Value::from(3)));
    }

    #[test]
    fn boolean_literal_seeds_default() {
        let it = item(decl![true, "enable?"]);
        assert_eq!(it.value_type, ValueType::Boolean);
        assert_eq!(it.default, Some(Value::Bool(true)));
    }

    #[test]
    fn type_tag_has_no_default() {
        let it = item(decl![ValueType::Integer]);
        assert_eq!(it.value_type, ValueType::Integer);
        assert!(it.default.is_none());
        assert_eq!(it.question, "Acme::NetServer requests an integer");
    }

    #[test]
    fn plain_value_is_the_default() {
        let it = item(decl!["localhost", "host name"]);
        assert_eq!(it.value_type, ValueType::Text);
        assert_eq!(it.default, Some(Value::from("localhost")));
        assert_eq!(it.question, "host name");
    }

    #[test]
    fn bare_element_is_a_one_element_declaration() {
        let tree = compile("Owner", &Schema::new().item("retries", Decl::from(3))).unwrap();
        let it = find_item(&tree, "retries").unwrap();
        assert_eq!(it.default, Some(Value::from(3)));
        assert_eq!(it.question, "Owner requests an integer");
    }

    #[test]
    fn trailing_elements_classified_first_match_wins() {
        let it = item(decl![
            ValueType::Integer,
            "workers",
            4,
            8,
            vec![2, 4, 8],
            vec![16],
            1..=16
        ]);
        assert_eq!(it.default, Some(Value::from(4)));
        assert_eq!(it.choices.as_ref().map(Vec::len), Some(3));
        assert_eq!(it.range, Some(Bound::from(1..=16)));
        assert!(it.validator.is_some());
    }

    #[test]
    fn second_element_that_is_not_text_is_classified() {
        let it = item(decl![ValueType::Text, vec!["a", "b"]]);
        assert_eq!(it.choices.map(|c| c.len()), Some(2));
        assert_eq!(it.question, "Acme::NetServer requests a text");
    }

    #[test]
    fn text_after_question_is_default() {
        let it = item(decl![ValueType::Text, "name?", "anonymous"]);
        assert_eq!(it.question, "name?");
        assert_eq!(it.default, Some(Value::from("anonymous")));
    }

    #[test]
    fn trailing_type_overrides_inferred() {
        let it = item(decl![vec!["1", "2"], "q", ValueType::Opaque("id".into())]);
        assert_eq!(it.value_type, ValueType::Opaque("id".into()));
    }

    #[test]
    fn default_must_match_type() {
        let err = compile_item("O", "server.port", &decl![ValueType::Integer, "port", "abc"])
            .unwrap_err();
        match err {
            AskfigError::Schema { key, reason } => {
                assert_eq!(key, "server.port");
                assert!(reason.contains("not an integer"), "{reason}");
            }
            other => panic!("Expected Schema error, got: {other:?}"),
        }
    }

    #[test]
    fn rejected_shapes() {
        assert!(compile_item("O", "k", &Declaration::new()).is_err());
        assert!(compile_item("O", "k", &decl![Value::Null]).is_err());
        assert!(compile_item("O", "k", &decl![Decl::validator(|_| true)]).is_err());
        assert!(compile_item("O", "k", &decl![Vec::<i64>::new()]).is_err());
    }

    #[test]
    fn sequence_default_via_explicit_value() {
        let it = item(Declaration::new().with(Decl::value(vec!["a", "b"])));
        assert_eq!(it.value_type, ValueType::Sequence);
        assert!(it.choices.is_none());
    }

    #[test]
    fn nested_schema_compiles_recursively() {
        let schema = Schema::new()
            .item("name", decl!["app"])
            .section(
                "db",
                Schema::new()
                    .item("host", decl!["localhost"])
                    .section("pool", Schema::new().item("size", decl![1..=64])),
            );
        let tree = compile("Owner", &schema).unwrap();
        assert!(matches!(tree["db"], ConfigNode::Tree(_)));
        assert!(find_item(&tree, "db.host").is_some());
        assert!(find_item(&tree, "db.pool.size").is_some());
        assert!(find_item(&tree, "db").is_none());
        assert!(find_item(&tree, "db.missing").is_none());
        assert!(find_item(&tree, "name.deeper").is_none());
    }

    #[test]
    fn nested_error_reports_dotted_key() {
        let schema = Schema::new().section(
            "db",
            Schema::new().item("port", decl![ValueType::Integer, "port", "x"]),
        );
        match compile("Owner", &schema).unwrap_err() {
            AskfigError::Schema { key, .. } => assert_eq!(key, "db.port"),
            other => panic!("Expected Schema error, got: {other:?}"),
        }
    }
}
