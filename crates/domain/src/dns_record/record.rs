use crate::response_code::ResponseCode;
use std::sync::Arc;

/// RDATA in uncompressed wire form. Opaque to routing; only the owner name is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RecordData(Arc<[u8]>);

impl RecordData {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub record_type: u16,
    pub class: u16,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(
        name: impl Into<String>,
        record_type: u16,
        class: u16,
        ttl: u32,
        data: RecordData,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            class,
            ttl,
            data,
        }
    }
}

/// The three record sections of a DNS message, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSections {
    pub answer: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl RecordSections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.answer.is_empty() && self.authority.is_empty() && self.additional.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.answer.len() + self.authority.len() + self.additional.len()
    }

    pub fn clear(&mut self) {
        self.answer.clear();
        self.authority.clear();
        self.additional.clear();
    }
}

/// Records collected for a single question from one upstream branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialResponse {
    pub rcode: ResponseCode,
    pub sections: RecordSections,
}

impl PartialResponse {
    pub fn new(rcode: ResponseCode, sections: RecordSections) -> Self {
        Self { rcode, sections }
    }

    /// Keeps the first non-NOERROR code seen.
    pub fn absorb_rcode(&mut self, rcode: ResponseCode) {
        if self.rcode == ResponseCode::NoError {
            self.rcode = rcode;
        }
    }
}
