use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;
use uuid::Uuid;

use super::*;
use crate::error::{AppError, AppResult, ValidationKind};
use crate::models::{
    ChannelAddress, ChannelMessage, ContactRecord, DeliveryErrorKind, DeliveryOutcome,
    DigestConfiguration, DigestSchedule, NotificationRequest, SkipReason, UserStatus,
};
use crate::repositories::{
    ContactDirectory, InMemoryContactDirectory, InMemoryDigestConfigurationStore,
    InMemoryUserDirectory, Repositories,
};

const DEFAULT_SENDER: &str = "noreply@example.org";

#[derive(Debug, Clone, PartialEq)]
struct Sent {
    from: String,
    to: String,
    message: ChannelMessage,
}

struct RecordingHandler {
    name: &'static str,
    default_sender: Option<String>,
    fail: bool,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingHandler {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            default_sender: None,
            fail: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            default_sender: None,
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn with_sender(name: &'static str, sender: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            default_sender: Some(sender.to_string()),
            fail: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelHandler for RecordingHandler {
    fn channel_name(&self) -> &'static str {
        self.name
    }

    fn default_sender(&self) -> Option<&str> {
        self.default_sender.as_deref()
    }

    async fn deliver(
        &self,
        from: &str,
        to: &str,
        message: &ChannelMessage,
    ) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(Sent {
            from: from.to_string(),
            to: to.to_string(),
            message: message.clone(),
        });
        if self.fail {
            return Err(DeliveryError::transport("relay unavailable"));
        }
        Ok(())
    }
}

/// Contact directory spy counting lookups
struct CountingContacts {
    inner: InMemoryContactDirectory,
    lookups: AtomicUsize,
}

#[async_trait]
impl ContactDirectory for CountingContacts {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<ContactRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_user_id(user_id).await
    }
}

#[derive(Default)]
struct RecordingQueue {
    entries: Mutex<Vec<DigestEntry>>,
    fail: bool,
}

#[async_trait]
impl DigestQueue for RecordingQueue {
    async fn enqueue(&self, entry: DigestEntry) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Internal {
                source: anyhow::anyhow!("queue full"),
            });
        }
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

struct Fixture {
    user_id: Uuid,
    contacts: Arc<CountingContacts>,
    users: Arc<InMemoryUserDirectory>,
    digests: Arc<InMemoryDigestConfigurationStore>,
    email: Arc<RecordingHandler>,
    sms: Arc<RecordingHandler>,
}

impl Fixture {
    /// Active user with a verified email and a verified phone number
    fn new() -> Self {
        Self::with_handlers(RecordingHandler::new("email"), RecordingHandler::new("sms"))
    }

    fn with_handlers(email: Arc<RecordingHandler>, sms: Arc<RecordingHandler>) -> Self {
        let user_id = Uuid::new_v4();
        let contacts = InMemoryContactDirectory::new();
        contacts
            .upsert(
                ContactRecord::new(user_id)
                    .with_channel("email", ChannelAddress::verified("a@example.org"))
                    .with_channel("sms", ChannelAddress::verified("+15550100199")),
            )
            .unwrap();
        let users = InMemoryUserDirectory::new();
        users.upsert(UserStatus::active(user_id));

        Self {
            user_id,
            contacts: Arc::new(CountingContacts {
                inner: contacts,
                lookups: AtomicUsize::new(0),
            }),
            users: Arc::new(users),
            digests: Arc::new(InMemoryDigestConfigurationStore::new()),
            email,
            sms,
        }
    }

    fn replace_contact(&self, contact: ContactRecord) {
        self.contacts.inner.upsert(contact).unwrap();
    }

    fn dispatcher(&self) -> NotificationDispatcher {
        let mut registry = ChannelHandlerRegistry::new();
        registry
            .register_arc(self.email.clone())
            .register_arc(self.sms.clone());

        NotificationDispatcher::new(
            Arc::new(registry),
            Repositories {
                contacts: self.contacts.clone(),
                users: self.users.clone(),
                digests: self.digests.clone(),
            },
            DEFAULT_SENDER,
        )
    }

    fn email_request(&self) -> NotificationRequest {
        NotificationRequest::new(self.user_id)
            .with_message("email", ChannelMessage::new("subject", "content"))
    }

    fn lookups(&self) -> usize {
        self.contacts.lookups.load(Ordering::SeqCst)
    }
}

fn assert_all_skipped(report: &crate::models::DeliveryReport, reason: SkipReason) {
    assert!(!report.is_empty());
    for outcome in report.values() {
        assert_eq!(outcome, &DeliveryOutcome::skipped(reason));
    }
}

#[tokio::test]
async fn test_default_sender_used_without_override() {
    let fixture = Fixture::new();
    let report = fixture
        .dispatcher()
        .dispatch(&fixture.email_request())
        .await
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report["email"], DeliveryOutcome::Delivered);
    assert_eq!(
        fixture.email.sent(),
        vec![Sent {
            from: DEFAULT_SENDER.to_string(),
            to: "a@example.org".to_string(),
            message: ChannelMessage::new("subject", "content"),
        }]
    );
}

#[tokio::test]
async fn test_explicit_sender_overrides_default() {
    let fixture = Fixture::new();
    let request = fixture.email_request().with_from("example@test.org");

    let report = fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_eq!(report["email"], DeliveryOutcome::Delivered);
    assert_eq!(fixture.email.sent()[0].from, "example@test.org");
}

#[tokio::test]
async fn test_blank_sender_falls_back_to_default() {
    let fixture = Fixture::new();
    let request = fixture.email_request().with_from("   ");

    fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_eq!(fixture.email.sent()[0].from, DEFAULT_SENDER);
}

#[tokio::test]
async fn test_handler_sender_preferred_over_dispatcher_default() {
    let fixture = Fixture::with_handlers(
        RecordingHandler::new("email"),
        RecordingHandler::with_sender("sms", "FUSION"),
    );
    let request = NotificationRequest::new(fixture.user_id)
        .with_message("sms", ChannelMessage::text("code 1234"));

    fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_eq!(fixture.sms.sent()[0].from, "FUSION");
}

#[tokio::test]
async fn test_empty_content_rejected_without_lookup() {
    let fixture = Fixture::new();
    let request = NotificationRequest::new(fixture.user_id)
        .with_message("email", ChannelMessage::new("subject", "  "))
        .with_message("sms", ChannelMessage::text(""));

    let err = fixture.dispatcher().dispatch(&request).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::InvalidRequest {
            kind: ValidationKind::ContentRequired
        }
    ));
    assert_eq!(fixture.lookups(), 0);
    assert!(fixture.email.sent().is_empty());
}

#[tokio::test]
async fn test_request_without_messages_rejected() {
    let fixture = Fixture::new();
    let err = fixture
        .dispatcher()
        .dispatch(&NotificationRequest::new(fixture.user_id))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "CONTENT_REQUIRED");
    assert_eq!(fixture.lookups(), 0);
}

#[tokio::test]
async fn test_unsupported_channel_blocks_all_delivery() {
    let fixture = Fixture::new();
    let request = fixture
        .email_request()
        .with_message("pager", ChannelMessage::text("beep"));

    let err = fixture.dispatcher().dispatch(&request).await.unwrap_err();

    match err {
        AppError::InvalidRequest {
            kind: ValidationKind::UnsupportedChannel { channel },
        } => assert_eq!(channel, "pager"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(fixture.email.sent().is_empty());
    assert!(fixture.sms.sent().is_empty());
}

#[tokio::test]
async fn test_missing_contact_skips_every_channel() {
    let fixture = Fixture::new();
    let request = NotificationRequest::new(Uuid::new_v4())
        .with_message("email", ChannelMessage::new("subject", "content"))
        .with_message("sms", ChannelMessage::text("content"));

    let report = fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_eq!(report.len(), 2);
    assert_all_skipped(&report, SkipReason::ContactNotFound);
    assert!(fixture.email.sent().is_empty());
    assert!(fixture.sms.sent().is_empty());
}

#[tokio::test]
async fn test_unverified_email_does_not_block_sms() {
    let fixture = Fixture::new();
    fixture.replace_contact(
        ContactRecord::new(fixture.user_id)
            .with_channel("email", ChannelAddress::unverified("a@example.org"))
            .with_channel("sms", ChannelAddress::verified("+15550100199")),
    );
    let request = fixture
        .email_request()
        .with_message("sms", ChannelMessage::text("content"));

    let report = fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_eq!(report["email"], DeliveryOutcome::skipped(SkipReason::Unverified));
    assert_eq!(report["sms"], DeliveryOutcome::Delivered);
    assert!(fixture.email.sent().is_empty());
    assert_eq!(fixture.sms.sent()[0].to, "+15550100199");
}

#[tokio::test]
async fn test_missing_address_skipped() {
    let fixture = Fixture::new();
    fixture.replace_contact(
        ContactRecord::new(fixture.user_id)
            .with_channel("email", ChannelAddress::verified("a@example.org")),
    );
    let request = NotificationRequest::new(fixture.user_id)
        .with_message("sms", ChannelMessage::text("content"));

    let report = fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_eq!(report["sms"], DeliveryOutcome::skipped(SkipReason::MissingAddress));
}

#[tokio::test]
async fn test_inactive_user_skips_every_channel() {
    let fixture = Fixture::new();
    fixture.users.upsert(UserStatus::inactive(fixture.user_id));
    let request = fixture
        .email_request()
        .with_message("sms", ChannelMessage::text("content"))
        .important();

    let report = fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_all_skipped(&report, SkipReason::UserInactive);
    assert!(fixture.email.sent().is_empty());
    assert!(fixture.sms.sent().is_empty());
}

#[tokio::test]
async fn test_opted_out_user_skipped() {
    let fixture = Fixture::new();
    fixture.replace_contact(
        ContactRecord::new(fixture.user_id)
            .with_allow_notifications(false)
            .with_channel("email", ChannelAddress::verified("a@example.org")),
    );

    let report = fixture
        .dispatcher()
        .dispatch(&fixture.email_request())
        .await
        .unwrap();

    assert_all_skipped(&report, SkipReason::NotificationsDisabled);
    assert!(fixture.email.sent().is_empty());
}

#[tokio::test]
async fn test_important_notification_ignores_opt_out() {
    let fixture = Fixture::new();
    fixture.replace_contact(
        ContactRecord::new(fixture.user_id)
            .with_allow_notifications(false)
            .with_channel("email", ChannelAddress::verified("a@example.org")),
    );

    let report = fixture
        .dispatcher()
        .dispatch(&fixture.email_request().important())
        .await
        .unwrap();

    assert_eq!(report["email"], DeliveryOutcome::Delivered);
}

#[tokio::test]
async fn test_transport_failure_isolated_to_channel() {
    let fixture = Fixture::with_handlers(
        RecordingHandler::failing("email"),
        RecordingHandler::new("sms"),
    );
    let request = fixture
        .email_request()
        .with_message("sms", ChannelMessage::text("content"));

    let report = fixture.dispatcher().dispatch(&request).await.unwrap();

    match &report["email"] {
        DeliveryOutcome::Failed { error, detail } => {
            assert_eq!(*error, DeliveryErrorKind::TransportFailure);
            assert!(detail.contains("relay unavailable"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report["sms"], DeliveryOutcome::Delivered);
}

#[tokio::test]
async fn test_blank_message_skipped_when_others_have_content() {
    let fixture = Fixture::new();
    let request = fixture
        .email_request()
        .with_message("sms", ChannelMessage::text(" "));

    let report = fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_eq!(report["email"], DeliveryOutcome::Delivered);
    assert_eq!(report["sms"], DeliveryOutcome::skipped(SkipReason::EmptyContent));
    assert!(fixture.sms.sent().is_empty());
}

#[tokio::test]
async fn test_dispatch_twice_same_classification() {
    let fixture = Fixture::new();
    fixture.replace_contact(
        ContactRecord::new(fixture.user_id)
            .with_channel("email", ChannelAddress::verified("a@example.org"))
            .with_channel("sms", ChannelAddress::unverified("+15550100199")),
    );
    let dispatcher = fixture.dispatcher();
    let request = fixture
        .email_request()
        .with_message("sms", ChannelMessage::text("content"));

    let first = dispatcher.dispatch(&request).await.unwrap();
    let second = dispatcher.dispatch(&request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.email.sent().len(), 2);
}

#[tokio::test]
async fn test_list_registered_channels() {
    let fixture = Fixture::new();
    let channels: Vec<String> = fixture
        .dispatcher()
        .list_registered_channels()
        .into_iter()
        .collect();
    assert_eq!(channels, vec!["email".to_string(), "sms".to_string()]);
}

#[tokio::test]
async fn test_batched_tag_is_digested() {
    let fixture = Fixture::new();
    fixture
        .digests
        .insert(DigestConfiguration::new(
            "weekly-report",
            DigestSchedule::Batched { every_minutes: 60 },
            "digest/weekly",
        ))
        .unwrap();
    let queue = Arc::new(RecordingQueue::default());
    let dispatcher = fixture.dispatcher().with_digest_queue(queue.clone());
    let request = NotificationRequest::new(fixture.user_id).with_message(
        "email",
        ChannelMessage::new("subject", "content").with_digest_tag("weekly-report"),
    );

    let report = dispatcher.dispatch(&request).await.unwrap();

    assert_eq!(
        report["email"],
        DeliveryOutcome::Digested {
            tag: "weekly-report".to_string()
        }
    );
    assert!(fixture.email.sent().is_empty());
    let entries = queue.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].to, "a@example.org");
    assert_eq!(entries[0].from, DEFAULT_SENDER);
    assert_eq!(entries[0].tag(), "weekly-report");
}

#[tokio::test]
async fn test_unknown_tag_sent_immediately() {
    let fixture = Fixture::new();
    let queue = Arc::new(RecordingQueue::default());
    let dispatcher = fixture.dispatcher().with_digest_queue(queue.clone());
    let request = NotificationRequest::new(fixture.user_id).with_message(
        "email",
        ChannelMessage::new("subject", "content").with_digest_tag("Weekly-Report"),
    );

    let report = dispatcher.dispatch(&request).await.unwrap();

    assert_eq!(report["email"], DeliveryOutcome::Delivered);
    assert!(queue.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_padded_tag_does_not_match_configuration() {
    let fixture = Fixture::new();
    fixture
        .digests
        .insert(DigestConfiguration::new(
            "weekly-report",
            DigestSchedule::Batched { every_minutes: 60 },
            "digest/weekly",
        ))
        .unwrap();
    let queue = Arc::new(RecordingQueue::default());
    let dispatcher = fixture.dispatcher().with_digest_queue(queue.clone());
    let request = NotificationRequest::new(fixture.user_id).with_message(
        "email",
        ChannelMessage::new("subject", "content").with_digest_tag(" weekly-report "),
    );

    let report = dispatcher.dispatch(&request).await.unwrap();

    assert_eq!(report["email"], DeliveryOutcome::Delivered);
    assert!(queue.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_immediate_and_malformed_configurations_sent_now() {
    let fixture = Fixture::new();
    fixture
        .digests
        .insert(DigestConfiguration::new("alerts", DigestSchedule::Immediate, ""))
        .unwrap();
    fixture
        .digests
        .insert(DigestConfiguration::new(
            "broken",
            DigestSchedule::Batched { every_minutes: 0 },
            "digest/broken",
        ))
        .unwrap();
    let queue = Arc::new(RecordingQueue::default());
    let dispatcher = fixture.dispatcher().with_digest_queue(queue.clone());

    for tag in ["alerts", "broken"] {
        let request = NotificationRequest::new(fixture.user_id)
            .with_message("email", ChannelMessage::text("content").with_digest_tag(tag));
        let report = dispatcher.dispatch(&request).await.unwrap();
        assert_eq!(report["email"], DeliveryOutcome::Delivered, "tag {tag}");
    }
    assert!(queue.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_important_bypasses_digest() {
    let fixture = Fixture::new();
    fixture
        .digests
        .insert(DigestConfiguration::new(
            "weekly-report",
            DigestSchedule::Batched { every_minutes: 60 },
            "digest/weekly",
        ))
        .unwrap();
    let queue = Arc::new(RecordingQueue::default());
    let dispatcher = fixture.dispatcher().with_digest_queue(queue.clone());
    let request = NotificationRequest::new(fixture.user_id)
        .with_message(
            "email",
            ChannelMessage::text("content").with_digest_tag("weekly-report"),
        )
        .important();

    let report = dispatcher.dispatch(&request).await.unwrap();

    assert_eq!(report["email"], DeliveryOutcome::Delivered);
    assert!(queue.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_digest_enqueue_failure_reported() {
    let fixture = Fixture::new();
    fixture
        .digests
        .insert(DigestConfiguration::new(
            "weekly-report",
            DigestSchedule::Batched { every_minutes: 60 },
            "digest/weekly",
        ))
        .unwrap();
    let queue = Arc::new(RecordingQueue {
        fail: true,
        ..Default::default()
    });
    let dispatcher = fixture.dispatcher().with_digest_queue(queue);
    let request = fixture
        .email_request()
        .with_message(
            "sms",
            ChannelMessage::text("content").with_digest_tag("weekly-report"),
        );

    let report = dispatcher.dispatch(&request).await.unwrap();

    assert!(matches!(
        report["sms"],
        DeliveryOutcome::Failed {
            error: DeliveryErrorKind::TransportFailure,
            ..
        }
    ));
    assert_eq!(report["email"], DeliveryOutcome::Delivered);
}

#[tokio::test]
async fn test_digest_tag_ignored_without_queue() {
    let fixture = Fixture::new();
    fixture
        .digests
        .insert(DigestConfiguration::new(
            "weekly-report",
            DigestSchedule::Batched { every_minutes: 60 },
            "digest/weekly",
        ))
        .unwrap();
    let request = NotificationRequest::new(fixture.user_id).with_message(
        "email",
        ChannelMessage::text("content").with_digest_tag("weekly-report"),
    );

    let report = fixture.dispatcher().dispatch(&request).await.unwrap();

    assert_eq!(report["email"], DeliveryOutcome::Delivered);
}

proptest! {
    #[test]
    fn prop_blank_bodies_always_rejected(
        bodies in proptest::collection::vec("[ \t\r\n]{0,8}", 1..4)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let fixture = Fixture::new();
        let mut request = NotificationRequest::new(fixture.user_id);
        for (channel, body) in ["email", "sms", "pager"].iter().zip(bodies) {
            request = request.with_message(*channel, ChannelMessage::new("subject", body));
        }

        let result = runtime.block_on(fixture.dispatcher().dispatch(&request));

        let content_required = matches!(
            result,
            Err(AppError::InvalidRequest { kind: ValidationKind::ContentRequired })
        );
        prop_assert!(content_required, "blank bodies must be rejected");
        prop_assert_eq!(fixture.lookups(), 0);
    }
}
