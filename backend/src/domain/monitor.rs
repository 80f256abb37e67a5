//! Cycle orchestration: fetch, reconcile, evaluate, dispatch.
//!
//! One monitor cycle runs the whole pipeline in order. Reconciliation fully
//! commits before evaluation reads indicator state, and evaluation completes
//! before any message is composed. A cycle lock serialises manual triggers
//! against the scheduled loop so cycles never overlap.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::notification::{format_roster, render_template, NewNotificationRecord};
use crate::domain::ports::{
    FeedSourceError, IndicatorFeedSource, IndicatorRepository, IndicatorRepositoryError,
    MailSender, NotificationRepository, RecipientRepository, RecipientRepositoryError,
    TemplateName, TemplateStore, ThresholdRepository, UserDirectory,
};
use crate::domain::reconcile::ReconciliationOutcome;
use crate::domain::recipient::Recipient;
use crate::domain::series::SeriesCatalog;
use crate::domain::threshold::{Breach, BreachDirection, ThresholdDefinition};

/// Port bundle required by the monitor.
pub struct MonitorPorts {
    /// Outbound feed adapter.
    pub feed: Arc<dyn IndicatorFeedSource>,
    /// Indicator persistence adapter.
    pub indicators: Arc<dyn IndicatorRepository>,
    /// Threshold definition read adapter.
    pub thresholds: Arc<dyn ThresholdRepository>,
    /// Recipient roster read adapter.
    pub recipients: Arc<dyn RecipientRepository>,
    /// Owner contact lookup adapter.
    pub users: Arc<dyn UserDirectory>,
    /// Notification audit adapter.
    pub notifications: Arc<dyn NotificationRepository>,
    /// Template body adapter.
    pub templates: Arc<dyn TemplateStore>,
    /// Delivery channel adapter.
    pub mailer: Arc<dyn MailSender>,
}

/// Whether a breach that persists across cycles is announced repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatNotificationPolicy {
    /// Re-send on every cycle while the threshold remains breached.
    EveryTick,
    /// Notify once per applied indicator update: suppress dispatch while the
    /// newest audit row is at least as recent as the indicator's
    /// `last_updated`.
    #[default]
    OncePerUpdate,
}

/// Identity substituted into the sender placeholders of templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    /// Sender given name.
    pub first_name: String,
    /// Sender family name.
    pub last_name: String,
    /// Sender reply address.
    pub email: String,
}

/// What one completed cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Outcome of the reconcile stage.
    pub reconciliation: ReconciliationOutcome,
    /// Number of definitions that breached.
    pub breaches: usize,
    /// Messages accepted by the delivery channel.
    pub messages_sent: usize,
}

/// Failures that abort a cycle. Everything downstream of reconciliation
/// degrades per definition or per message instead of failing the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// The feed was unavailable; the cycle stopped before any write.
    #[error("feed fetch failed: {0}")]
    Feed(#[from] FeedSourceError),
    /// The reconcile transaction failed and rolled back.
    #[error("reconciliation failed: {0}")]
    Reconcile(#[from] IndicatorRepositoryError),
}

/// Orchestrates the fetch, reconcile, evaluate, and dispatch stages.
pub struct MonitorService {
    ports: MonitorPorts,
    catalog: SeriesCatalog,
    sender: SenderIdentity,
    repeat_policy: RepeatNotificationPolicy,
    clock: Arc<dyn Clock>,
    cycle_lock: Mutex<()>,
}

impl MonitorService {
    /// Build a monitor over the given adapters and catalog.
    pub fn new(
        ports: MonitorPorts,
        catalog: SeriesCatalog,
        sender: SenderIdentity,
        repeat_policy: RepeatNotificationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ports,
            catalog,
            sender,
            repeat_policy,
            clock,
            cycle_lock: Mutex::new(()),
        }
    }

    /// Run one full cycle. Invoked by the interval loop and by the manual
    /// trigger endpoint; concurrent invocations queue on the cycle lock.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let _tick = self.cycle_lock.lock().await;
        info!(tracked = self.catalog.len(), "starting monitor cycle");

        let series = self.catalog.series_ids();
        let readings = self.ports.feed.fetch_latest(&series).await?;
        info!(fetched = readings.len(), "fetched latest readings");

        let reconciliation = self.ports.indicators.reconcile(&readings).await?;
        if reconciliation.changed() {
            info!(
                inserted = reconciliation.inserted,
                updated = reconciliation.updated,
                skipped = reconciliation.skipped,
                "reconciliation committed"
            );
        } else {
            info!(
                skipped = reconciliation.skipped,
                "no newer readings; reconciliation rolled back"
            );
        }

        let breaches = self.evaluate_all().await;
        let mut messages_sent = 0;
        for breach in &breaches {
            messages_sent += self.dispatch(breach).await;
        }

        info!(
            breaches = breaches.len(),
            messages_sent, "monitor cycle finished"
        );
        Ok(CycleReport {
            reconciliation,
            breaches: breaches.len(),
            messages_sent,
        })
    }

    /// Evaluate every stored definition against post-reconciliation state.
    ///
    /// Failures loading one definition's indicator are logged and skip that
    /// definition only. Definitions whose indicator series is no longer in
    /// the catalog are skipped as stale.
    pub async fn evaluate_all(&self) -> Vec<Breach> {
        let definitions = match self.ports.thresholds.list_all().await {
            Ok(definitions) => definitions,
            Err(error) => {
                warn!(error = %error, "failed to load threshold definitions");
                return Vec::new();
            }
        };

        let mut breaches = Vec::new();
        for definition in definitions {
            let indicator = match self.ports.indicators.find_by_id(definition.indicator_id).await
            {
                Ok(Some(indicator)) => indicator,
                Ok(None) => {
                    warn!(
                        threshold = %definition.id,
                        "definition references a missing indicator; skipping"
                    );
                    continue;
                }
                Err(error) => {
                    warn!(
                        threshold = %definition.id,
                        error = %error,
                        "failed to load indicator for definition; skipping"
                    );
                    continue;
                }
            };

            if !self.catalog.contains(&indicator.series_id) {
                continue;
            }

            let movement = indicator.movement_percent();
            if definition.is_breached_by(movement) {
                info!(
                    threshold = %definition.id,
                    indicator = %indicator.name,
                    change = movement,
                    "threshold breached"
                );
                breaches.push(Breach {
                    definition,
                    indicator,
                    percent_change: movement,
                });
            }
        }
        breaches
    }

    /// Resolve the fan-out targets of one definition: the recipient roster
    /// plus, only when owner notification is enabled, the owner's address.
    pub async fn resolve_targets(
        &self,
        definition: &ThresholdDefinition,
    ) -> Result<(Vec<Recipient>, Option<String>), RecipientRepositoryError> {
        let recipients = self
            .ports
            .recipients
            .list_for_threshold(definition.id)
            .await?;

        let owner_email = if definition.notify_owner {
            match self.ports.users.email_of(definition.owner_user_id).await {
                Ok(email) => email,
                Err(error) => {
                    warn!(
                        threshold = %definition.id,
                        error = %error,
                        "failed to resolve owner address; sending recipient messages only"
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok((recipients, owner_email))
    }

    /// Compose and send the messages for one breach. Returns how many
    /// messages the delivery channel accepted; per-message failures are
    /// logged and never abort the loop.
    pub async fn dispatch(&self, breach: &Breach) -> usize {
        let definition = &breach.definition;

        if self.repeat_policy == RepeatNotificationPolicy::OncePerUpdate {
            match self.ports.notifications.latest_sent_at(definition.id).await {
                Ok(Some(sent_at)) if sent_at >= breach.indicator.last_updated => {
                    info!(
                        threshold = %definition.id,
                        "already announced for this update; suppressing dispatch"
                    );
                    return 0;
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(
                        threshold = %definition.id,
                        error = %error,
                        "failed to read notification history; dispatching anyway"
                    );
                }
            }
        }

        let (recipients, owner_email) = match self.resolve_targets(definition).await {
            Ok(targets) => targets,
            Err(error) => {
                warn!(
                    threshold = %definition.id,
                    error = %error,
                    "failed to resolve recipients; skipping breach"
                );
                return 0;
            }
        };

        let change = format!("{:.2}", breach.percent_change);
        let mut messages_sent = 0;

        let template_name = match breach.direction() {
            BreachDirection::Adverse => TemplateName::RecipientAdverse,
            BreachDirection::Favorable => TemplateName::RecipientFavorable,
        };
        let subject = format!("Urgent: {} Economic Data Alert", breach.indicator.name);

        for recipient in &recipients {
            let template = match self.ports.templates.read(template_name).await {
                Ok(template) => template,
                Err(error) => {
                    warn!(
                        recipient = %recipient.email,
                        error = %error,
                        "template unavailable; skipping this message"
                    );
                    continue;
                }
            };

            let body = render_template(
                &template,
                &[
                    ("Recipient Name", recipient.full_name()),
                    ("Threshold Name", breach.indicator.name.clone()),
                    ("Change Percentage", change.clone()),
                    ("Sender First Name", self.sender.first_name.clone()),
                    ("Sender Last Name", self.sender.last_name.clone()),
                    ("Sender Email", self.sender.email.clone()),
                ],
            );

            match self.ports.mailer.send(&recipient.email, &subject, &body).await {
                Ok(()) => {
                    info!(recipient = %recipient.email, subject = %subject, "alert sent");
                    messages_sent += 1;
                }
                Err(error) => {
                    warn!(
                        recipient = %recipient.email,
                        error = %error,
                        "alert delivery failed"
                    );
                }
            }

            // The audit row is written whether or not delivery succeeded.
            let record = NewNotificationRecord {
                user_id: definition.owner_user_id,
                recipient_id: Some(recipient.id),
                threshold_id: definition.id,
                sent_at: self.clock.utc(),
                user_message: String::new(),
                recipient_message: body,
            };
            if let Err(error) = self.ports.notifications.record(&record).await {
                warn!(
                    threshold = %definition.id,
                    error = %error,
                    "failed to record notification audit row"
                );
            }
        }

        if let Some(owner_email) = owner_email {
            messages_sent += self.send_owner_summary(breach, &recipients, &owner_email).await;
        }

        messages_sent
    }

    async fn send_owner_summary(
        &self,
        breach: &Breach,
        recipients: &[Recipient],
        owner_email: &str,
    ) -> usize {
        let definition = &breach.definition;
        let template = match self.ports.templates.read(TemplateName::OwnerSummary).await {
            Ok(template) => template,
            Err(error) => {
                warn!(
                    threshold = %definition.id,
                    error = %error,
                    "owner summary template unavailable"
                );
                return 0;
            }
        };

        let direction = match breach.direction() {
            BreachDirection::Adverse => "bad",
            BreachDirection::Favorable => "good",
        };
        let body = render_template(
            &template,
            &[
                ("Threshold Name", breach.indicator.name.clone()),
                ("Change Percentage", format!("{:.2}", breach.percent_change)),
                ("New Value", format!("{:.2}", breach.indicator.latest_value)),
                (
                    "Threshold Value",
                    format!("{:.2}", definition.magnitude_percent),
                ),
                ("Direction", direction.to_owned()),
                ("Recipient List", format_roster(recipients)),
            ],
        );
        let subject = format!("Your {} alert threshold was hit", breach.indicator.name);

        let mut messages_sent = 0;
        match self.ports.mailer.send(owner_email, &subject, &body).await {
            Ok(()) => {
                info!(owner = %owner_email, "owner summary sent");
                messages_sent = 1;
            }
            Err(error) => {
                warn!(owner = %owner_email, error = %error, "owner summary delivery failed");
            }
        }

        let record = NewNotificationRecord {
            user_id: definition.owner_user_id,
            recipient_id: None,
            threshold_id: definition.id,
            sent_at: self.clock.utc(),
            user_message: body,
            recipient_message: String::new(),
        };
        if let Err(error) = self.ports.notifications.record(&record).await {
            warn!(
                threshold = %definition.id,
                error = %error,
                "failed to record owner summary audit row"
            );
        }

        messages_sent
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
