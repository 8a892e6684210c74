use crate::errors::DomainError;
use crate::pattern::Pattern;
use crate::record_fields::{FieldEntry, FieldValue, RecordFields};
use fancy_regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct AliasConfig {
    pub fake: String,
    pub real: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RouteAction {
    /// Resolve every question upstream.
    #[default]
    Proxy,
    Refuse,
    NxDomain,
    /// Send nothing; the client times out.
    Drop,
}

impl RouteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteAction::Proxy => "proxy",
            RouteAction::Refuse => "refuse",
            RouteAction::NxDomain => "nxdomain",
            RouteAction::Drop => "drop",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub pattern: PatternConfig,

    #[serde(default)]
    pub action: RouteAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexConfig {
    pub regex: String,
}

impl RegexConfig {
    fn compile(&self) -> Result<Regex, DomainError> {
        Regex::new(&self.regex)
            .map_err(|e| DomainError::InvalidPattern(format!("{}: {}", self.regex, e)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldValueConfig {
    Number(i64),
    Text(String),
    Regex(RegexConfig),
}

impl TryFrom<FieldValueConfig> for FieldValue {
    type Error = DomainError;

    fn try_from(value: FieldValueConfig) -> Result<Self, Self::Error> {
        Ok(match value {
            FieldValueConfig::Number(n) => FieldValue::number(n),
            FieldValueConfig::Text(s) => FieldValue::text(s),
            FieldValueConfig::Regex(r) => FieldValue::Regex(r.compile()?),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldConfig {
    One(FieldValueConfig),
    Many(Vec<FieldValueConfig>),
}

impl TryFrom<FieldConfig> for FieldEntry {
    type Error = DomainError;

    fn try_from(value: FieldConfig) -> Result<Self, Self::Error> {
        match value {
            FieldConfig::One(v) => Ok(FieldEntry::One(v.try_into()?)),
            FieldConfig::Many(vs) => vs
                .into_iter()
                .map(FieldValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(FieldEntry::Many),
        }
    }
}

/// Pattern as written in the configuration file.
///
/// A string is an exact name, `{ regex = "..." }` a name expression, an array a
/// list of alternatives and any other table a field object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternConfig {
    Name(String),
    Regex(RegexConfig),
    AnyOf(Vec<PatternConfig>),
    Fields(BTreeMap<String, FieldConfig>),
}

impl TryFrom<PatternConfig> for Pattern {
    type Error = DomainError;

    fn try_from(value: PatternConfig) -> Result<Self, Self::Error> {
        match value {
            PatternConfig::Name(name) => Ok(Pattern::Name(name)),
            PatternConfig::Regex(r) => Ok(Pattern::Regex(r.compile()?)),
            PatternConfig::AnyOf(list) => list
                .into_iter()
                .map(Pattern::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Pattern::AnyOf),
            PatternConfig::Fields(map) => {
                let mut fields = RecordFields::new();
                for (field, entry) in map {
                    fields.insert(field, FieldEntry::try_from(entry)?);
                }
                Ok(Pattern::Fields(fields))
            }
        }
    }
}
