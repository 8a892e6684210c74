use crate::dns_request::DnsRequest;
use crate::errors::DomainError;
use crate::record_fields::RecordFields;
use fancy_regex::Regex;
use std::fmt;
use std::sync::Arc;

pub type Predicate = Arc<dyn Fn(&DnsRequest) -> bool + Send + Sync>;

/// User-supplied description of which requests a handler chain applies to.
#[derive(Clone)]
pub enum Pattern {
    /// Exact question name, in the default class.
    Name(String),
    /// Regular expression over the question name, in the default class.
    Regex(Regex),
    /// Matches when any alternative matches.
    AnyOf(Vec<Pattern>),
    /// Matches when every field matches on the same question.
    Fields(RecordFields),
    Predicate(Predicate),
}

impl Pattern {
    pub fn name(name: impl Into<String>) -> Self {
        Pattern::Name(name.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, DomainError> {
        Regex::new(pattern)
            .map(Pattern::Regex)
            .map_err(|e| DomainError::InvalidPattern(format!("{}: {}", pattern, e)))
    }

    pub fn any_of(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::AnyOf(patterns.into_iter().collect())
    }

    pub fn fields(fields: RecordFields) -> Self {
        Pattern::Fields(fields)
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&DnsRequest) -> bool + Send + Sync + 'static,
    {
        Pattern::Predicate(Arc::new(f))
    }

    /// Matches every request.
    pub fn any() -> Self {
        Self::predicate(|_| true)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Pattern::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Pattern::AnyOf(list) => f.debug_tuple("AnyOf").field(list).finish(),
            Pattern::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Pattern::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Pattern {
    fn from(name: &str) -> Self {
        Pattern::name(name)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern::Regex(re)
    }
}

impl From<RecordFields> for Pattern {
    fn from(fields: RecordFields) -> Self {
        Pattern::Fields(fields)
    }
}

impl From<Vec<Pattern>> for Pattern {
    fn from(list: Vec<Pattern>) -> Self {
        Pattern::AnyOf(list)
    }
}
