use ferrous_route_domain::{
    normalize, DnsRequest, DomainError, FieldEntry, FieldValue, Pattern, Question, RecordClass,
    RecordFields, Scalar,
};
use ferrous_route_domain::{normalizer::CLASS_FIELD, normalizer::TYPE_FIELD, question::NAME_FIELD};
use std::fmt;
use std::sync::Arc;

type MatchFn = Arc<dyn Fn(&DnsRequest) -> bool + Send + Sync>;

/// A compiled, immutable test over an incoming request.
#[derive(Clone)]
pub struct Matcher {
    test: MatchFn,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matcher(..)")
    }
}

#[derive(Debug, Clone, Copy)]
enum QuestionField {
    Name,
    Type,
    Class,
}

impl QuestionField {
    fn parse(field: &str) -> Result<Self, DomainError> {
        match field {
            NAME_FIELD => Ok(QuestionField::Name),
            TYPE_FIELD => Ok(QuestionField::Type),
            CLASS_FIELD => Ok(QuestionField::Class),
            other => Err(DomainError::InvalidPattern(format!(
                "unknown question field '{}'",
                other
            ))),
        }
    }
}

struct FieldTest {
    field: QuestionField,
    alternatives: Vec<FieldValue>,
}

impl FieldTest {
    fn matches(&self, question: &Question) -> bool {
        self.alternatives
            .iter()
            .any(|value| value_matches(value, self.field, question))
    }
}

fn value_matches(value: &FieldValue, field: QuestionField, question: &Question) -> bool {
    match (value, field) {
        (FieldValue::Scalar(Scalar::Text(text)), QuestionField::Name) => {
            question.name.eq_ignore_ascii_case(text.trim_end_matches('.'))
        }
        (FieldValue::Scalar(Scalar::Number(n)), QuestionField::Type) => {
            *n == i64::from(question.record_type)
        }
        (FieldValue::Scalar(Scalar::Number(n)), QuestionField::Class) => {
            *n == i64::from(question.class)
        }
        (FieldValue::Scalar(scalar), field) => scalar.to_string() == field_text(field, question),
        (FieldValue::Regex(re), field) => re.is_match(&field_text(field, question)).unwrap_or(false),
    }
}

fn field_text(field: QuestionField, question: &Question) -> String {
    match field {
        QuestionField::Name => question.name.clone(),
        QuestionField::Type => question.record_type.to_string(),
        QuestionField::Class => question.class.to_string(),
    }
}

impl Matcher {
    /// Compiles `pattern` once. Symbolic type/class values are resolved here,
    /// so unknown symbols fail at registration instead of at match time.
    pub fn compile(pattern: Pattern) -> Result<Self, DomainError> {
        match pattern {
            Pattern::Predicate(predicate) => Ok(Self { test: predicate }),
            Pattern::Name(name) => Self::compile_name(FieldValue::text(name)),
            Pattern::Regex(re) => Self::compile_name(FieldValue::Regex(re)),
            Pattern::AnyOf(patterns) => {
                let matchers = patterns
                    .into_iter()
                    .map(Self::compile)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self {
                    test: Arc::new(move |request| matchers.iter().any(|m| m.matches(request))),
                })
            }
            Pattern::Fields(fields) => Self::compile_fields(fields),
        }
    }

    /// Shorthand for `{ class: IN, name: value }`.
    fn compile_name(value: FieldValue) -> Result<Self, DomainError> {
        Self::compile_fields(
            RecordFields::new()
                .with(CLASS_FIELD, i64::from(RecordClass::IN.to_u16()))
                .with(NAME_FIELD, value),
        )
    }

    fn compile_fields(fields: RecordFields) -> Result<Self, DomainError> {
        let tests = normalize(fields)?
            .into_iter()
            .map(|(field, entry)| {
                Ok(FieldTest {
                    field: QuestionField::parse(&field)?,
                    alternatives: match entry {
                        FieldEntry::One(value) => vec![value],
                        FieldEntry::Many(values) => values,
                    },
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Self {
            test: Arc::new(move |request| {
                request
                    .questions
                    .iter()
                    .any(|question| tests.iter().all(|test| test.matches(question)))
            }),
        })
    }

    pub fn matches(&self, request: &DnsRequest) -> bool {
        (self.test)(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrous_route_domain::{RecordType, TransportProtocol};

    fn request(questions: Vec<Question>) -> DnsRequest {
        DnsRequest::new(
            1,
            questions,
            "127.0.0.1:53000".parse().unwrap(),
            TransportProtocol::Udp,
        )
    }

    #[test]
    fn test_name_shorthand_requires_default_class() {
        let matcher = Matcher::compile(Pattern::name("printer.lan")).unwrap();

        assert!(matcher.matches(&request(vec![Question::new("printer.lan", RecordType::A)])));
        assert!(matcher.matches(&request(vec![Question::new("PRINTER.lan", RecordType::MX)])));
        assert!(!matcher.matches(&request(vec![Question::with_codes("printer.lan", 1, 3)])));
        assert!(!matcher.matches(&request(vec![Question::new("scanner.lan", RecordType::A)])));
    }

    #[test]
    fn test_regex_matches_numeric_code_as_text() {
        let fields = RecordFields::new().with(TYPE_FIELD, fancy_regex::Regex::new("^2[0-9]$").unwrap());
        let matcher = Matcher::compile(Pattern::fields(fields)).unwrap();

        assert!(matcher.matches(&request(vec![Question::new("a.lan", RecordType::AAAA)])));
        assert!(!matcher.matches(&request(vec![Question::new("a.lan", RecordType::A)])));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = Matcher::compile(Pattern::fields(RecordFields::new().with("ttl", 30i64)))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPattern(_)));
    }

    #[test]
    fn test_empty_request_never_matches_fields() {
        let matcher = Matcher::compile(Pattern::name("a.lan")).unwrap();
        assert!(!matcher.matches(&request(vec![])));
    }
}
