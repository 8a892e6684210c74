use ferrous_route_domain::{PartialResponse, RecordSections};

/// One argument to [`merge`]: a single partial response or an ordered run of them.
#[derive(Debug, Clone, Copy)]
pub enum MergeSource<'a> {
    One(&'a PartialResponse),
    Many(&'a [PartialResponse]),
}

impl<'a> MergeSource<'a> {
    fn partials(self) -> &'a [PartialResponse] {
        match self {
            MergeSource::One(partial) => std::slice::from_ref(partial),
            MergeSource::Many(partials) => partials,
        }
    }
}

impl<'a> From<&'a PartialResponse> for MergeSource<'a> {
    fn from(partial: &'a PartialResponse) -> Self {
        MergeSource::One(partial)
    }
}

impl<'a> From<&'a [PartialResponse]> for MergeSource<'a> {
    fn from(partials: &'a [PartialResponse]) -> Self {
        MergeSource::Many(partials)
    }
}

impl<'a> From<&'a Vec<PartialResponse>> for MergeSource<'a> {
    fn from(partials: &'a Vec<PartialResponse>) -> Self {
        MergeSource::Many(partials)
    }
}

/// Appends every record of every source to `target`, section by section,
/// in source order. Records are never reordered or deduplicated.
pub fn merge<'a, I>(target: &mut RecordSections, sources: I)
where
    I: IntoIterator,
    I::Item: Into<MergeSource<'a>>,
{
    for source in sources {
        for partial in source.into().partials() {
            let sections = &partial.sections;
            target.answer.extend(sections.answer.iter().cloned());
            target.authority.extend(sections.authority.iter().cloned());
            target.additional.extend(sections.additional.iter().cloned());
        }
    }
}
