//! Per-session request sequencing.
//!
//! A game tab is a session. Starting a new request cancels whatever that session
//! still has in flight, and only the most recent request may publish its result:
//! last request wins.

use std::sync::Arc;

use dashmap::DashMap;
use promptplay_domain::RequestId;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::ports::RandomPort;

/// Handle for one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub session: String,
    pub id: RequestId,
    pub token: CancellationToken,
}

impl RequestTicket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

pub struct RequestSequencer {
    inflight: DashMap<String, (RequestId, CancellationToken)>,
    random: Arc<dyn RandomPort>,
}

impl RequestSequencer {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self {
            inflight: DashMap::new(),
            random,
        }
    }

    /// Register a new request, cancelling the session's previous one.
    pub fn begin(&self, session: &str) -> RequestTicket {
        let id = RequestId::from_uuid(self.random.gen_uuid());
        let token = CancellationToken::new();

        if let Some((previous, previous_token)) = self
            .inflight
            .insert(session.to_string(), (id, token.clone()))
        {
            previous_token.cancel();
            tracing::debug!(
                session,
                superseded = %previous,
                request_id = %id,
                "Cancelled superseded request"
            );
        }

        RequestTicket {
            session: session.to_string(),
            id,
            token,
        }
    }

    /// Whether `ticket` is still the session's latest request.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.inflight
            .get(&ticket.session)
            .is_some_and(|entry| entry.0 == ticket.id)
    }

    /// Forget the ticket if it is still current. A newer request is left alone.
    pub fn finish(&self, ticket: &RequestTicket) {
        self.inflight
            .remove_if(&ticket.session, |_, (id, _)| *id == ticket.id);
    }

    /// Number of sessions with a request in flight.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemRandom;

    fn sequencer() -> RequestSequencer {
        RequestSequencer::new(Arc::new(SystemRandom))
    }

    #[test]
    fn new_request_cancels_previous() {
        let sequencer = sequencer();
        let first = sequencer.begin("tab-1");
        let second = sequencer.begin("tab-1");

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!sequencer.is_current(&first));
        assert!(sequencer.is_current(&second));
    }

    #[test]
    fn sessions_are_independent() {
        let sequencer = sequencer();
        let a = sequencer.begin("tab-1");
        let b = sequencer.begin("tab-2");

        assert!(!a.is_cancelled());
        assert!(sequencer.is_current(&a));
        assert!(sequencer.is_current(&b));
        assert_eq!(sequencer.in_flight(), 2);
    }

    #[test]
    fn stale_finish_keeps_newer_request() {
        let sequencer = sequencer();
        let first = sequencer.begin("tab-1");
        let second = sequencer.begin("tab-1");

        sequencer.finish(&first);
        assert!(sequencer.is_current(&second));

        sequencer.finish(&second);
        assert!(!sequencer.is_current(&second));
        assert_eq!(sequencer.in_flight(), 0);
    }
}
