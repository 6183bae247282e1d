/// Conversation state for a single tutoring session.
///
/// Holds only the most recent tutor reply. The gate treats a non-empty slot
/// as an in-progress conversation and admits follow-up queries without
/// re-scoring them. Nothing ever clears the slot, so once a session has one
/// successful exchange its gate stays open for the session's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    last_reply: Option<String>,
}

impl SessionContext {
    /// Creates a fresh session with no prior exchange.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once at least one reply has been generated in this session.
    pub fn in_progress(&self) -> bool {
        self.last_reply.as_deref().is_some_and(|reply| !reply.is_empty())
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.last_reply.as_deref()
    }

    /// Records a generated reply as the session's trailing message.
    pub fn record_reply(&mut self, reply: impl Into<String>) {
        self.last_reply = Some(reply.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_not_in_progress() {
        let session = SessionContext::new();
        assert!(!session.in_progress());
        assert_eq!(session.last_reply(), None);
    }

    #[test]
    fn test_recording_a_reply_opens_the_session() {
        let mut session = SessionContext::new();
        session.record_reply("Tables use the <table> tag.");
        assert!(session.in_progress());
        assert_eq!(session.last_reply(), Some("Tables use the <table> tag."));
    }

    #[test]
    fn test_recording_overwrites_previous_reply() {
        let mut session = SessionContext::new();
        session.record_reply("first");
        session.record_reply("second");
        assert_eq!(session.last_reply(), Some("second"));
    }

    #[test]
    fn test_empty_reply_does_not_open_the_session() {
        let mut session = SessionContext::new();
        session.record_reply("");
        assert!(!session.in_progress());
    }
}
