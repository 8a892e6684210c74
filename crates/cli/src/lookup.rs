use anyhow::anyhow;
use ferrous_route_application::services::UpstreamResolver;
use ferrous_route_domain::{
    FieldEntry, FieldValue, Question, RecordClass, RecordFields, RecordType, ResourceRecord,
};
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::info;

/// Resolves one question built from `field=value` arguments and prints the merged sections.
pub async fn run(resolver: &UpstreamResolver, args: &[String]) -> anyhow::Result<()> {
    let question = Question::from_fields(parse_fields(args)?)?;
    info!(domain = %question.name, question = %question, "Looking up");

    let partial = resolver.lookup(&question).await?;

    println!(";; {} -> {}", question, partial.rcode);
    for (label, records) in [
        ("ANSWER", &partial.sections.answer),
        ("AUTHORITY", &partial.sections.authority),
        ("ADDITIONAL", &partial.sections.additional),
    ] {
        if records.is_empty() {
            continue;
        }
        println!(";; {}", label);
        for record in records {
            println!("{}", format_record(record));
        }
    }
    Ok(())
}

/// Repeating a field collects its values into a list, e.g. `type=A type=AAAA`.
pub fn parse_fields(args: &[String]) -> anyhow::Result<RecordFields> {
    let mut grouped: Vec<(String, Vec<FieldValue>)> = Vec::new();

    for arg in args {
        let (field, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("expected FIELD=VALUE, got {:?}", arg))?;
        let value = FieldValue::text(value);
        match grouped.iter_mut().find(|(name, _)| name == field) {
            Some((_, values)) => values.push(value),
            None => grouped.push((field.to_string(), vec![value])),
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(field, mut values)| {
            let entry = if values.len() == 1 {
                FieldEntry::One(values.remove(0))
            } else {
                FieldEntry::Many(values)
            };
            (field, entry)
        })
        .collect())
}

fn format_record(record: &ResourceRecord) -> String {
    let record_type = RecordType::from_u16(record.record_type)
        .map(|t| t.as_str().to_string())
        .unwrap_or_else(|| format!("TYPE{}", record.record_type));
    let class = RecordClass::from_u16(record.class)
        .map(|c| c.as_str().to_string())
        .unwrap_or_else(|| format!("CLASS{}", record.class));

    let bytes = record.data.as_bytes();
    let data = if record.record_type == RecordType::A.to_u16() && bytes.len() == 4 {
        Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]).to_string()
    } else if let (true, Ok(octets)) = (
        record.record_type == RecordType::AAAA.to_u16(),
        <[u8; 16]>::try_from(bytes),
    ) {
        Ipv6Addr::from(octets).to_string()
    } else {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    };

    format!("{}\t{}\t{}\t{}\t{}", record.name, record.ttl, class, record_type, data)
}
