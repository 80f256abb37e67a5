//! End-to-end monitor cycle tests over in-memory adapters.
//!
//! These tests run the full fetch, reconcile, evaluate, dispatch pipeline
//! with an in-memory indicator store that applies the same per-row planner
//! as the Diesel adapter, so the pipeline-level behaviour holds without a
//! database.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use uuid::Uuid;

use backend::domain::ports::{
    FeedSourceError, FixtureUserDirectory, IndicatorFeedSource, IndicatorRepository,
    IndicatorRepositoryError, MailSendError, MailSender, NotificationRepository,
    NotificationRepositoryError, RecipientRepository, RecipientRepositoryError,
    TemplateName, TemplateStore, TemplateStoreError, ThresholdRepository,
    ThresholdRepositoryError,
};
use backend::domain::{
    reconcile_decision, Indicator, IndicatorReading, MonitorPorts, MonitorService,
    NewNotificationRecord, PeriodTag, ReconcileDecision, ReconciliationOutcome, Recipient,
    RepeatNotificationPolicy, SenderIdentity, SeriesCatalog, SeriesId, ThresholdDefinition,
};

/// Feed source replaying a fixed batch on every cycle.
struct ReplayFeedSource {
    readings: BTreeMap<SeriesId, IndicatorReading>,
}

#[async_trait]
impl IndicatorFeedSource for ReplayFeedSource {
    async fn fetch_latest(
        &self,
        _series: &[SeriesId],
    ) -> Result<BTreeMap<SeriesId, IndicatorReading>, FeedSourceError> {
        Ok(self.readings.clone())
    }
}

/// In-memory indicator store applying the shared reconcile planner.
struct MemoryIndicatorRepository {
    catalog: SeriesCatalog,
    rows: Mutex<HashMap<Uuid, Indicator>>,
}

impl MemoryIndicatorRepository {
    fn seeded(catalog: SeriesCatalog, rows: Vec<Indicator>) -> Self {
        Self {
            catalog,
            rows: Mutex::new(rows.into_iter().map(|row| (row.id, row)).collect()),
        }
    }

    fn row(&self, id: Uuid) -> Option<Indicator> {
        self.rows.lock().expect("rows lock").get(&id).cloned()
    }
}

#[async_trait]
impl IndicatorRepository for MemoryIndicatorRepository {
    async fn reconcile(
        &self,
        readings: &BTreeMap<SeriesId, IndicatorReading>,
    ) -> Result<ReconciliationOutcome, IndicatorRepositoryError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let mut outcome = ReconciliationOutcome::default();

        for reading in readings.values() {
            let stored = rows
                .values()
                .find(|row| row.series_id == reading.series_id)
                .cloned();
            match reconcile_decision(stored.as_ref(), reading, &self.catalog) {
                ReconcileDecision::Insert { name, unit, value } => {
                    let id = Uuid::new_v4();
                    rows.insert(
                        id,
                        Indicator {
                            id,
                            name,
                            series_id: reading.series_id.clone(),
                            unit,
                            previous_value: value,
                            latest_value: value,
                            period: reading.period,
                            last_updated: Utc::now(),
                        },
                    );
                    outcome.inserted += 1;
                }
                ReconcileDecision::Update {
                    previous_value,
                    latest_value,
                } => {
                    let stored = stored.as_ref().expect("update implies a stored row");
                    if let Some(row) = rows.get_mut(&stored.id) {
                        row.previous_value = previous_value;
                        row.latest_value = latest_value;
                        row.period = reading.period;
                        row.last_updated = Utc::now();
                    }
                    outcome.updated += 1;
                }
                ReconcileDecision::SkipUntracked | ReconcileDecision::SkipStale => {
                    outcome.skipped += 1;
                }
            }
        }
        Ok(outcome)
    }

    async fn find_by_id(
        &self,
        indicator_id: Uuid,
    ) -> Result<Option<Indicator>, IndicatorRepositoryError> {
        Ok(self.row(indicator_id))
    }
}

/// Static threshold listing.
struct StaticThresholds {
    definitions: Vec<ThresholdDefinition>,
}

#[async_trait]
impl ThresholdRepository for StaticThresholds {
    async fn list_all(&self) -> Result<Vec<ThresholdDefinition>, ThresholdRepositoryError> {
        Ok(self.definitions.clone())
    }
}

/// Static recipient roster shared by every threshold.
struct StaticRecipients {
    roster: Vec<Recipient>,
}

#[async_trait]
impl RecipientRepository for StaticRecipients {
    async fn list_for_threshold(
        &self,
        _threshold_id: Uuid,
    ) -> Result<Vec<Recipient>, RecipientRepositoryError> {
        Ok(self.roster.clone())
    }
}

/// Audit store remembering every record in order.
#[derive(Default)]
struct MemoryNotifications {
    records: Mutex<Vec<NewNotificationRecord>>,
}

#[async_trait]
impl NotificationRepository for MemoryNotifications {
    async fn record(
        &self,
        record: &NewNotificationRecord,
    ) -> Result<(), NotificationRepositoryError> {
        self.records.lock().expect("records lock").push(record.clone());
        Ok(())
    }

    async fn latest_sent_at(
        &self,
        threshold_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, NotificationRepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("records lock")
            .iter()
            .filter(|record| record.threshold_id == threshold_id)
            .map(|record| record.sent_at)
            .max())
    }
}

/// Delivery channel capturing accepted messages.
#[derive(Default)]
struct RecordingMailSender {
    messages: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl MailSender for RecordingMailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailSendError> {
        self.messages
            .lock()
            .expect("messages lock")
            .push((to.to_owned(), subject.to_owned(), body.to_owned()));
        Ok(())
    }
}

/// Template store with inlined bodies, no filesystem.
struct InlineTemplates;

#[async_trait]
impl TemplateStore for InlineTemplates {
    async fn read(&self, name: TemplateName) -> Result<String, TemplateStoreError> {
        Ok(match name {
            TemplateName::RecipientAdverse => {
                "Dear [Recipient Name], [Threshold Name] rose [Change Percentage]%.".to_owned()
            }
            TemplateName::RecipientFavorable => {
                "Dear [Recipient Name], [Threshold Name] moved [Change Percentage]%.".to_owned()
            }
            TemplateName::OwnerSummary => {
                "[Threshold Name] moved [Change Percentage]%. Notified:\n[Recipient List]"
                    .to_owned()
            }
        })
    }
}

fn eggs_id() -> SeriesId {
    SeriesId::new("APU0000708111").expect("valid id")
}

fn eggs_reading(value: f64, year: i32, code: &str) -> BTreeMap<SeriesId, IndicatorReading> {
    BTreeMap::from([(
        eggs_id(),
        IndicatorReading {
            series_id: eggs_id(),
            value,
            period: PeriodTag::from_parts(year, code).expect("valid tag"),
        },
    )])
}

fn seeded_eggs_row(id: Uuid) -> Indicator {
    Indicator {
        id,
        name: "Eggs, grade A, large".to_owned(),
        series_id: eggs_id(),
        unit: "per doz.".to_owned(),
        previous_value: 3.25,
        latest_value: 3.25,
        period: PeriodTag::from_parts(2024, "M11").expect("valid tag"),
        last_updated: Utc::now(),
    }
}

struct Harness {
    monitor: MonitorService,
    indicators: Arc<MemoryIndicatorRepository>,
    notifications: Arc<MemoryNotifications>,
    mailer: Arc<RecordingMailSender>,
}

fn harness(
    readings: BTreeMap<SeriesId, IndicatorReading>,
    seeded: Vec<Indicator>,
    definitions: Vec<ThresholdDefinition>,
    roster: Vec<Recipient>,
    policy: RepeatNotificationPolicy,
) -> Harness {
    let catalog = SeriesCatalog::consumer_prices();
    let indicators = Arc::new(MemoryIndicatorRepository::seeded(catalog.clone(), seeded));
    let notifications = Arc::new(MemoryNotifications::default());
    let mailer = Arc::new(RecordingMailSender::default());

    let ports = MonitorPorts {
        feed: Arc::new(ReplayFeedSource { readings }),
        indicators: indicators.clone(),
        thresholds: Arc::new(StaticThresholds { definitions }),
        recipients: Arc::new(StaticRecipients { roster }),
        users: Arc::new(FixtureUserDirectory),
        notifications: notifications.clone(),
        templates: Arc::new(InlineTemplates),
        mailer: mailer.clone(),
    };

    let monitor = MonitorService::new(
        ports,
        catalog,
        SenderIdentity {
            first_name: "Avery".to_owned(),
            last_name: "Quinn".to_owned(),
            email: "alerts@example.net".to_owned(),
        },
        policy,
        Arc::new(DefaultClock),
    );

    Harness {
        monitor,
        indicators,
        notifications,
        mailer,
    }
}

fn recipient(email: &str) -> Recipient {
    Recipient {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        first_name: "Jordan".to_owned(),
        last_name: "Reyes".to_owned(),
        designation: "Representative".to_owned(),
    }
}

fn definition(indicator_id: Uuid, magnitude: f64) -> ThresholdDefinition {
    ThresholdDefinition {
        id: Uuid::new_v4(),
        owner_user_id: Uuid::new_v4(),
        indicator_id,
        magnitude_percent: magnitude,
        notify_owner: false,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn a_newer_reading_shifts_values_and_fans_out_alerts() {
    let row_id = Uuid::new_v4();
    let harness = harness(
        eggs_reading(3.90, 2024, "M12"),
        vec![seeded_eggs_row(row_id)],
        vec![definition(row_id, 15.0)],
        vec![
            recipient("reyes@example.gov"),
            recipient("okafor@example.gov"),
        ],
        RepeatNotificationPolicy::OncePerUpdate,
    );

    let report = harness.monitor.run_cycle().await.expect("cycle succeeds");

    assert_eq!(report.reconciliation.updated, 1);
    assert_eq!(report.breaches, 1);
    assert_eq!(report.messages_sent, 2);

    let row = harness.indicators.row(row_id).expect("eggs row present");
    assert_eq!(row.previous_value, 3.25);
    assert_eq!(row.latest_value, 3.90);
    assert_eq!(
        row.period,
        PeriodTag::from_parts(2024, "M12").expect("valid tag")
    );

    let messages = harness.mailer.messages.lock().expect("messages lock");
    assert_eq!(messages.len(), 2);
    for (_, subject, body) in messages.iter() {
        assert_eq!(subject, "Urgent: Eggs, grade A, large Economic Data Alert");
        assert!(body.contains("20.00"), "movement should render as 20.00%");
    }

    let records = harness.notifications.records.lock().expect("records lock");
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|record| record.recipient_id.is_some()));
}

#[tokio::test]
async fn replaying_the_same_period_writes_nothing_and_stays_quiet() {
    let row_id = Uuid::new_v4();
    let harness = harness(
        eggs_reading(3.90, 2024, "M12"),
        vec![seeded_eggs_row(row_id)],
        vec![definition(row_id, 15.0)],
        vec![recipient("reyes@example.gov")],
        RepeatNotificationPolicy::OncePerUpdate,
    );

    let first = harness.monitor.run_cycle().await.expect("first cycle");
    assert_eq!(first.reconciliation.updated, 1);
    assert_eq!(first.messages_sent, 1);

    let row_after_first = harness.indicators.row(row_id).expect("row present");

    // The feed replays the same period; the second cycle must change no
    // stored state and must not re-announce the still-breached threshold.
    let second = harness.monitor.run_cycle().await.expect("second cycle");
    assert_eq!(second.reconciliation.updated, 0);
    assert_eq!(second.reconciliation.inserted, 0);
    assert_eq!(second.reconciliation.skipped, 1);
    assert_eq!(second.breaches, 1, "the movement still classifies as a breach");
    assert_eq!(second.messages_sent, 0, "but dispatch is suppressed");

    let row_after_second = harness.indicators.row(row_id).expect("row present");
    assert_eq!(row_after_first, row_after_second);

    let messages = harness.mailer.messages.lock().expect("messages lock");
    assert_eq!(messages.len(), 1, "only the first cycle delivered");
}

#[tokio::test]
async fn every_tick_policy_reannounces_a_persistent_breach() {
    let row_id = Uuid::new_v4();
    let harness = harness(
        eggs_reading(3.90, 2024, "M12"),
        vec![seeded_eggs_row(row_id)],
        vec![definition(row_id, 15.0)],
        vec![recipient("reyes@example.gov")],
        RepeatNotificationPolicy::EveryTick,
    );

    let first = harness.monitor.run_cycle().await.expect("first cycle");
    let second = harness.monitor.run_cycle().await.expect("second cycle");
    assert_eq!(first.messages_sent, 1);
    assert_eq!(second.messages_sent, 1);

    let messages = harness.mailer.messages.lock().expect("messages lock");
    assert_eq!(messages.len(), 2);
}

#[tokio::test]
async fn first_sighting_inserts_without_alerting() {
    let harness = harness(
        eggs_reading(3.25, 2024, "M11"),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        RepeatNotificationPolicy::OncePerUpdate,
    );

    let report = harness.monitor.run_cycle().await.expect("cycle succeeds");
    assert_eq!(report.reconciliation.inserted, 1);
    assert_eq!(report.breaches, 0);
    assert_eq!(report.messages_sent, 0);
}
