//! Contact Submission Flow.
//!
//! `Editing → Submitting → Sent | Failed`. `Failed` goes back to `Editing` on
//! the next edit, or straight to `Submitting` on a retry. `Sent` is terminal:
//! edits are ignored and further submissions are refused.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{is_success, ContentSource, CONTACT_PATH};
use crate::errors::ClientError;
use crate::models::{ContactField, ContactMessage};

pub const CONFIRMATION: &str = "Danke! Nachricht gesendet.";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("valid email regex")
});

const REQUIRED: [ContactField; 3] = [
    ContactField::Name,
    ContactField::Email,
    ContactField::Message,
];

#[derive(Debug, Clone, PartialEq)]
pub enum ContactStatus {
    Editing,
    Submitting,
    Sent,
    Failed { error: String },
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Invalid or missing fields: {}", join_fields(.0))]
    Validation(Vec<ContactField>),

    #[error("Message already sent")]
    AlreadySent,

    #[error("Message was rejected (status {status})")]
    Rejected { status: u16 },

    #[error("Could not send message: {0}")]
    Transport(#[from] ClientError),
}

fn join_fields(fields: &[ContactField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the fields that block submission, in form order.
pub fn validate(message: &ContactMessage) -> Vec<ContactField> {
    let message = message.trimmed();
    REQUIRED
        .into_iter()
        .filter(|&field| {
            let value = message.get(field);
            value.is_empty() || (field == ContactField::Email && !EMAIL_RE.is_match(value))
        })
        .collect()
}

pub struct ContactFlow {
    source: Arc<dyn ContentSource>,
    fields: ContactMessage,
    status: watch::Sender<ContactStatus>,
}

impl ContactFlow {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        let (status, _) = watch::channel(ContactStatus::Editing);
        Self {
            source,
            fields: ContactMessage::default(),
            status,
        }
    }

    pub fn fields(&self) -> &ContactMessage {
        &self.fields
    }

    pub fn status(&self) -> ContactStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ContactStatus> {
        self.status.subscribe()
    }

    /// Error text to display, present only while `Failed`.
    pub fn error(&self) -> Option<String> {
        match &*self.status.borrow() {
            ContactStatus::Failed { error } => Some(error.clone()),
            _ => None,
        }
    }

    /// Confirmation text to display in place of the form once sent.
    pub fn confirmation(&self) -> Option<&'static str> {
        (self.status() == ContactStatus::Sent).then_some(CONFIRMATION)
    }

    /// Replaces one field. Returns `false` when the edit was ignored because
    /// the message has already been sent.
    pub fn edit(&mut self, field: ContactField, value: impl Into<String>) -> bool {
        if self.status() == ContactStatus::Sent {
            debug!(field = %field, "Ignoring edit after message was sent");
            return false;
        }
        self.fields = self.fields.with(field, value);
        self.status.send_if_modified(|status| {
            if matches!(status, ContactStatus::Failed { .. }) {
                *status = ContactStatus::Editing;
                true
            } else {
                false
            }
        });
        true
    }

    /// Validates and sends the current fields.
    ///
    /// Validation failures never reach the network and leave the status
    /// untouched. Any other failure moves the flow to `Failed` with the
    /// fields kept for another attempt.
    pub async fn submit(&mut self) -> Result<(), ContactError> {
        if self.status() == ContactStatus::Sent {
            return Err(ContactError::AlreadySent);
        }

        let invalid = validate(&self.fields);
        if !invalid.is_empty() {
            debug!(fields = %join_fields(&invalid), "Contact submission blocked by validation");
            return Err(ContactError::Validation(invalid));
        }

        self.status.send_replace(ContactStatus::Submitting);

        match self.send().await {
            Ok(()) => {
                info!("Contact message sent");
                self.fields = ContactMessage::default();
                self.status.send_replace(ContactStatus::Sent);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Contact submission failed");
                self.status.send_replace(ContactStatus::Failed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn send(&self) -> Result<(), ContactError> {
        let body = serde_json::to_value(self.fields.trimmed()).map_err(ClientError::from)?;
        let status = self.source.post(CONTACT_PATH, Some(&body)).await?;
        if is_success(status) {
            Ok(())
        } else {
            Err(ContactError::Rejected { status })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSource;
    use crate::api::ContentClient;
    use httpmock::prelude::*;
    use serde_json::json;

    fn fill(flow: &mut ContactFlow) {
        flow.edit(ContactField::Name, "Ada");
        flow.edit(ContactField::Email, "ada@example.com");
        flow.edit(ContactField::Subject, "Hi");
        flow.edit(ContactField::Message, "Hello");
    }

    fn client_for(server: &MockServer) -> Arc<dyn ContentSource> {
        Arc::new(ContentClient::new(server.base_url()).unwrap())
    }

    #[test]
    fn test_validate_accepts_complete_message() {
        let msg = ContactMessage {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: String::new(),
            message: "Hello".into(),
        };
        assert!(validate(&msg).is_empty());
    }

    #[test]
    fn test_validate_reports_missing_fields_in_order() {
        let msg = ContactMessage {
            name: "  ".into(),
            email: String::new(),
            subject: String::new(),
            message: String::new(),
        };
        assert_eq!(
            validate(&msg),
            vec![ContactField::Name, ContactField::Email, ContactField::Message]
        );
    }

    #[test]
    fn test_validate_email_shape() {
        let base = ContactMessage {
            name: "Ada".into(),
            email: String::new(),
            subject: String::new(),
            message: "Hello".into(),
        };
        for bad in ["ada", "ada@", "@example.com", "ada@example", "ada @example.com"] {
            assert_eq!(
                validate(&base.with(ContactField::Email, bad)),
                vec![ContactField::Email],
                "{bad} should be rejected"
            );
        }
        for good in ["ada@example.com", "a.b+c@mail.example.de", "x_y@sub-domain.io"] {
            assert!(validate(&base.with(ContactField::Email, good)).is_empty());
        }
    }

    #[test]
    fn test_validation_error_message() {
        let err = ContactError::Validation(vec![ContactField::Email, ContactField::Message]);
        assert_eq!(err.to_string(), "Invalid or missing fields: email, message");
    }

    #[test]
    fn test_edit_replaces_single_field() {
        let mut flow = ContactFlow::new(FakeSource::new());
        fill(&mut flow);
        assert!(flow.edit(ContactField::Name, "Grace"));
        assert_eq!(flow.fields().name, "Grace");
        assert_eq!(flow.fields().email, "ada@example.com");
        assert_eq!(flow.fields().subject, "Hi");
        assert_eq!(flow.fields().message, "Hello");
        assert_eq!(flow.status(), ContactStatus::Editing);
    }

    #[tokio::test]
    async fn test_submit_success_ends_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/contact").json_body(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "subject": "Hi",
                "message": "Hello"
            }));
            then.status(200);
        });

        let mut flow = ContactFlow::new(client_for(&server));
        fill(&mut flow);
        flow.submit().await.unwrap();

        assert_eq!(mock.calls(), 1);
        assert_eq!(flow.status(), ContactStatus::Sent);
        assert_eq!(flow.confirmation(), Some(CONFIRMATION));
        assert_eq!(flow.fields(), &ContactMessage::default());
    }

    #[tokio::test]
    async fn test_submit_server_error_ends_failed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/contact");
            then.status(500);
        });

        let mut flow = ContactFlow::new(client_for(&server));
        fill(&mut flow);
        let err = flow.submit().await.unwrap_err();

        assert!(matches!(err, ContactError::Rejected { status: 500 }));
        assert_eq!(mock.calls(), 1);
        let error = flow.error().expect("failed state carries an error");
        assert!(!error.is_empty());
        assert_eq!(flow.fields().name, "Ada");
        assert_eq!(flow.fields().email, "ada@example.com");
        assert_eq!(flow.fields().subject, "Hi");
        assert_eq!(flow.fields().message, "Hello");
        assert!(flow.confirmation().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_ends_failed() {
        let client = ContentClient::new("http://127.0.0.1:9").unwrap();
        let mut flow = ContactFlow::new(Arc::new(client));
        fill(&mut flow);
        let err = flow.submit().await.unwrap_err();

        assert!(matches!(err, ContactError::Transport(_)));
        assert!(matches!(flow.status(), ContactStatus::Failed { .. }));
        assert_eq!(flow.fields().message, "Hello");
    }

    #[tokio::test]
    async fn test_missing_email_never_calls_network() {
        let source = FakeSource::new();
        let mut flow = ContactFlow::new(source.clone());
        flow.edit(ContactField::Name, "Ada");
        flow.edit(ContactField::Subject, "Hi");
        flow.edit(ContactField::Message, "Hello");

        let err = flow.submit().await.unwrap_err();

        assert!(matches!(err, ContactError::Validation(ref f) if f == &vec![ContactField::Email]));
        assert!(source.posts().is_empty());
        assert_eq!(flow.status(), ContactStatus::Editing);
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let source = FakeSource::new();
        source.post_status("/contact", 503);

        let mut flow = ContactFlow::new(source.clone());
        fill(&mut flow);
        assert!(flow.submit().await.is_err());
        assert!(matches!(flow.status(), ContactStatus::Failed { .. }));

        source.post_status("/contact", 200);
        flow.submit().await.unwrap();
        assert_eq!(flow.status(), ContactStatus::Sent);
        assert_eq!(source.posts().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_after_failure_returns_to_editing() {
        let source = FakeSource::new();
        source.post_status("/contact", 400);

        let mut flow = ContactFlow::new(source);
        fill(&mut flow);
        let _ = flow.submit().await;
        assert!(flow.error().is_some());

        flow.edit(ContactField::Message, "Hello again");
        assert_eq!(flow.status(), ContactStatus::Editing);
        assert!(flow.error().is_none());
        assert_eq!(flow.fields().message, "Hello again");
    }

    #[tokio::test]
    async fn test_sent_is_terminal() {
        let source = FakeSource::new();
        let mut flow = ContactFlow::new(source.clone());
        fill(&mut flow);
        flow.submit().await.unwrap();

        assert!(!flow.edit(ContactField::Name, "Mallory"));
        assert_eq!(flow.fields().name, "");
        assert!(matches!(flow.submit().await, Err(ContactError::AlreadySent)));
        assert_eq!(source.posts().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_notified_of_outcome() {
        let source = FakeSource::new();
        let mut flow = ContactFlow::new(source);
        fill(&mut flow);
        let mut rx = flow.subscribe();

        flow.submit().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ContactStatus::Sent);
    }

    #[tokio::test]
    async fn test_sends_exactly_what_was_validated() {
        let source = FakeSource::new();
        let mut flow = ContactFlow::new(source.clone());
        flow.edit(ContactField::Name, "  Ada ");
        flow.edit(ContactField::Email, " ada@example.com ");
        flow.edit(ContactField::Subject, " ");
        flow.edit(ContactField::Message, "Hello\n");
        flow.submit().await.unwrap();

        let (_, body) = source.posts().remove(0);
        assert_eq!(
            body,
            Some(json!({"name": "Ada", "email": "ada@example.com", "message": "Hello"}))
        );
    }

    #[tokio::test]
    async fn test_empty_subject_not_sent() {
        let source = FakeSource::new();
        let mut flow = ContactFlow::new(source.clone());
        flow.edit(ContactField::Name, "Ada");
        flow.edit(ContactField::Email, "ada@example.com");
        flow.edit(ContactField::Message, "Hello");
        flow.submit().await.unwrap();

        let (path, body) = source.posts().remove(0);
        assert_eq!(path, "/contact");
        assert_eq!(
            body,
            Some(json!({"name": "Ada", "email": "ada@example.com", "message": "Hello"}))
        );
    }
}
