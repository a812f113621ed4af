use crate::id::ElementId;
use crate::value::Value;

/// One outbound commit, addressed to a leaf's identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub id: ElementId,
    pub value: Value,
}

/// Transport capability carrying commits back to the authority.
///
/// Fire-and-forget: no acknowledgement contract is assumed here.
pub trait Link {
    fn send(&mut self, request: Request);
}

impl Link for Vec<Request> {
    fn send(&mut self, request: Request) {
        self.push(request);
    }
}

/// Commit queue filled by widgets during a render pass and drained into a
/// [`Link`] once the pass is over, so sends never interleave with tree
/// mutation.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: Vec<Request>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ElementId, value: Value) {
        log::debug!("commit {} <- {:?}", id, value);
        self.queue.push(Request { id, value });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn flush(&mut self, link: &mut dyn Link) {
        for request in self.queue.drain(..) {
            link.send(request);
        }
    }

    pub fn drain(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_preserves_order() {
        let mut outbox = Outbox::new();
        outbox.push(ElementId::rooted("a"), Value::Int(1));
        outbox.push(ElementId::rooted("b"), Value::Int(2));

        let mut sent: Vec<Request> = Vec::new();
        outbox.flush(&mut sent);
        assert!(outbox.is_empty());
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].id, ElementId::rooted("a"));
        assert_eq!(sent[1].value, Value::Int(2));
    }
}
