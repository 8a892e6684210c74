//! Record normalization: symbolic type/class names to protocol codes.

use crate::dns_record::{RecordClass, RecordType};
use crate::errors::DomainError;
use crate::record_fields::{FieldEntry, FieldValue, RecordFields, Scalar};

pub const TYPE_FIELD: &str = "type";
pub const CLASS_FIELD: &str = "class";

fn lookup_symbol(field: &str, symbol: &str) -> Option<Option<u16>> {
    match field {
        TYPE_FIELD => Some(symbol.parse::<RecordType>().ok().map(|t| t.to_u16())),
        CLASS_FIELD => Some(symbol.parse::<RecordClass>().ok().map(|c| c.to_u16())),
        _ => None,
    }
}

fn normalize_value(field: &str, value: FieldValue) -> Result<FieldValue, DomainError> {
    let FieldValue::Scalar(Scalar::Text(symbol)) = &value else {
        return Ok(value);
    };

    if field != TYPE_FIELD && field != CLASS_FIELD {
        return Ok(value);
    }
    if let Ok(code) = symbol.trim().parse::<i64>() {
        return Ok(FieldValue::number(code));
    }

    match lookup_symbol(field, symbol) {
        None => Ok(value),
        Some(Some(code)) => Ok(FieldValue::number(i64::from(code))),
        Some(None) => Err(DomainError::UnknownSymbol {
            field: field.to_string(),
            value: symbol.to_string(),
        }),
    }
}

/// Converts symbolic values of lookup fields (`type`, `class`) to numeric codes.
///
/// Matching is case-insensitive. Numeric values, numeric strings, regular
/// expressions and unrecognised fields pass through. Lists keep their shape and
/// each element is normalized on its own.
pub fn normalize(fields: RecordFields) -> Result<RecordFields, DomainError> {
    fields
        .into_iter()
        .map(|(field, entry)| {
            let entry = match entry {
                FieldEntry::One(v) => FieldEntry::One(normalize_value(&field, v)?),
                FieldEntry::Many(vs) => FieldEntry::Many(
                    vs.into_iter()
                        .map(|v| normalize_value(&field, v))
                        .collect::<Result<_, _>>()?,
                ),
            };
            Ok((field, entry))
        })
        .collect()
}

/// Collapses list fields so that each field holds at most one concrete value.
///
/// Empty lists drop the field, one-element lists become the element, and
/// longer lists are rejected.
pub fn finalize(fields: RecordFields) -> Result<RecordFields, DomainError> {
    let mut out = RecordFields::new();
    for (field, entry) in fields {
        match entry {
            FieldEntry::One(v) => out.insert(field, v),
            FieldEntry::Many(mut vs) => match vs.len() {
                0 => {}
                1 => out.insert(field, vs.remove(0)),
                _ => return Err(DomainError::IllegalMultivalue { field }),
            },
        }
    }
    Ok(out)
}
