use ferrous_route_domain::{
    DnsRequest, DomainError, PartialResponse, Question, RecordSections, ResponseCode,
};
use tokio::sync::oneshot;
use tracing::debug;

/// What a listener receives once a handler sends the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentResponse {
    pub id: u16,
    pub questions: Vec<Question>,
    pub recursion_desired: bool,
    pub rcode: ResponseCode,
    pub sections: RecordSections,
}

/// Per-request response under construction.
///
/// The question section is captured from the request at creation time, so
/// handlers that rewrite the request never change what the client sees
/// echoed back.
#[derive(Debug)]
pub struct Response {
    id: u16,
    questions: Vec<Question>,
    recursion_desired: bool,
    pub rcode: ResponseCode,
    pub sections: RecordSections,
    sink: Option<oneshot::Sender<SentResponse>>,
}

impl Response {
    /// Creates a response for `request` and the receiver the listener awaits.
    pub fn channel(request: &DnsRequest) -> (Self, oneshot::Receiver<SentResponse>) {
        let (tx, rx) = oneshot::channel();
        let response = Self {
            id: request.id,
            questions: request.questions.clone(),
            recursion_desired: request.recursion_desired,
            rcode: ResponseCode::NoError,
            sections: RecordSections::new(),
            sink: Some(tx),
        };
        (response, rx)
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn is_sent(&self) -> bool {
        self.sink.is_none()
    }

    /// Keeps the first non-NOERROR rcode reported by a partial response.
    pub fn absorb_rcode(&mut self, partial: &PartialResponse) {
        if self.rcode == ResponseCode::NoError {
            self.rcode = partial.rcode;
        }
    }

    /// Emits the response. Fails with `ResponseAlreadySent` on a second call.
    pub fn send(&mut self) -> Result<(), DomainError> {
        let sink = self.sink.take().ok_or(DomainError::ResponseAlreadySent)?;
        let sent = SentResponse {
            id: self.id,
            questions: self.questions.clone(),
            recursion_desired: self.recursion_desired,
            rcode: self.rcode,
            sections: self.sections.clone(),
        };
        if sink.send(sent).is_err() {
            debug!(id = self.id, "Response receiver dropped before send");
        }
        Ok(())
    }

    /// Discards any collected records and sends an empty response with `rcode`.
    pub fn fail(&mut self, rcode: ResponseCode) -> Result<(), DomainError> {
        self.sections.clear();
        self.rcode = rcode;
        self.send()
    }
}
