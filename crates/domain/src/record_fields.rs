use fancy_regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A literal field value: a protocol code or a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Number(i64),
    Text(Arc<str>),
}

impl Scalar {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Number(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One value of a record field: either a literal or a regular expression.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Scalar(Scalar),
    Regex(Regex),
}

impl FieldValue {
    pub fn text(value: impl Into<Arc<str>>) -> Self {
        FieldValue::Scalar(Scalar::Text(value.into()))
    }

    pub fn number(value: i64) -> Self {
        FieldValue::Scalar(Scalar::Number(value))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::Regex(_) => None,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Scalar(a), FieldValue::Scalar(b)) => a == b,
            (FieldValue::Regex(a), FieldValue::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(s) => write!(f, "{}", s),
            FieldValue::Regex(r) => write!(f, "/{}/", r.as_str()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::text(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::number(value)
    }
}

impl From<Regex> for FieldValue {
    fn from(value: Regex) -> Self {
        FieldValue::Regex(value)
    }
}

/// A field carries either a single value or an ordered list of alternatives.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEntry {
    One(FieldValue),
    Many(Vec<FieldValue>),
}

impl FieldEntry {
    pub fn values(&self) -> &[FieldValue] {
        match self {
            FieldEntry::One(v) => std::slice::from_ref(v),
            FieldEntry::Many(vs) => vs,
        }
    }

    pub fn into_values(self) -> Vec<FieldValue> {
        match self {
            FieldEntry::One(v) => vec![v],
            FieldEntry::Many(vs) => vs,
        }
    }
}

impl From<FieldValue> for FieldEntry {
    fn from(value: FieldValue) -> Self {
        FieldEntry::One(value)
    }
}

impl From<&str> for FieldEntry {
    fn from(value: &str) -> Self {
        FieldEntry::One(value.into())
    }
}

impl From<String> for FieldEntry {
    fn from(value: String) -> Self {
        FieldEntry::One(value.into())
    }
}

impl From<i64> for FieldEntry {
    fn from(value: i64) -> Self {
        FieldEntry::One(value.into())
    }
}

impl From<Regex> for FieldEntry {
    fn from(value: Regex) -> Self {
        FieldEntry::One(value.into())
    }
}

impl From<Vec<FieldValue>> for FieldEntry {
    fn from(values: Vec<FieldValue>) -> Self {
        FieldEntry::Many(values)
    }
}

/// An ordered, record-like mapping of field name to value(s).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFields {
    entries: Vec<(String, FieldEntry)>,
}

impl RecordFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, entry: impl Into<FieldEntry>) -> Self {
        self.insert(field, entry);
        self
    }

    /// Inserts or replaces `field`, keeping its original position on replace.
    pub fn insert(&mut self, field: impl Into<String>, entry: impl Into<FieldEntry>) {
        let field = field.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((field, entry)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for RecordFields {
    type Item = (String, FieldEntry);
    type IntoIter = std::vec::IntoIter<(String, FieldEntry)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, FieldEntry)> for RecordFields {
    fn from_iter<I: IntoIterator<Item = (String, FieldEntry)>>(iter: I) -> Self {
        let mut fields = RecordFields::new();
        for (name, entry) in iter {
            fields.insert(name, entry);
        }
        fields
    }
}
