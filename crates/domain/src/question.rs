use crate::dns_record::{RecordClass, RecordType};
use crate::errors::DomainError;
use crate::normalizer::{finalize, normalize, CLASS_FIELD, TYPE_FIELD};
use crate::record_fields::{FieldEntry, FieldValue, RecordFields, Scalar};
use std::fmt;

pub const NAME_FIELD: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub name: String,
    pub record_type: u16,
    pub class: u16,
}

impl Question {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.to_u16(),
            class: RecordClass::IN.to_u16(),
        }
    }

    pub fn with_codes(name: impl Into<String>, record_type: u16, class: u16) -> Self {
        Self {
            name: name.into(),
            record_type,
            class,
        }
    }

    /// Builds a question from a record-like field map.
    ///
    /// `name` is required; `type` defaults to A and `class` to IN.
    pub fn from_fields(fields: RecordFields) -> Result<Self, DomainError> {
        let fields = finalize(normalize(fields)?)?;

        let name = match fields.get(NAME_FIELD) {
            Some(FieldEntry::One(FieldValue::Scalar(Scalar::Text(name)))) => name.to_string(),
            Some(other) => {
                return Err(DomainError::InvalidDomainName(format!(
                    "name must be literal text, got {:?}",
                    other
                )))
            }
            None => return Err(DomainError::MissingField(NAME_FIELD.to_string())),
        };

        let record_type = code_field(&fields, TYPE_FIELD)?.unwrap_or(RecordType::A.to_u16());
        let class = code_field(&fields, CLASS_FIELD)?.unwrap_or(RecordClass::IN.to_u16());

        Ok(Self {
            name: name.trim_end_matches('.').to_string(),
            record_type,
            class,
        })
    }

    pub fn type_name(&self) -> String {
        RecordType::from_u16(self.record_type)
            .map(|t| t.to_string())
            .unwrap_or_else(|| format!("TYPE{}", self.record_type))
    }
}

fn code_field(fields: &RecordFields, field: &str) -> Result<Option<u16>, DomainError> {
    match fields.get(field) {
        None => Ok(None),
        Some(FieldEntry::One(FieldValue::Scalar(Scalar::Number(n)))) => u16::try_from(*n)
            .map(Some)
            .map_err(|_| DomainError::UnknownSymbol {
                field: field.to_string(),
                value: n.to_string(),
            }),
        Some(other) => Err(DomainError::UnknownSymbol {
            field: field.to_string(),
            value: format!("{:?}", other),
        }),
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = RecordClass::from_u16(self.class)
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("CLASS{}", self.class));
        write!(f, "{} {} {}", self.name, class, self.type_name())
    }
}
