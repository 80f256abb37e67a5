//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the external feed, the database, the delivery channel, the template
//! store). Each trait exposes strongly typed errors so adapters map their
//! failures into predictable variants, and each ships a `Fixture*`
//! implementation for tests that do not exercise that edge.

mod feed_source;
mod indicator_repository;
mod mail_sender;
mod notification_repository;
mod recipient_repository;
mod template_store;
mod threshold_repository;
mod user_directory;

#[cfg(test)]
pub use feed_source::MockIndicatorFeedSource;
pub use feed_source::{FeedSourceError, FixtureIndicatorFeedSource, IndicatorFeedSource};
#[cfg(test)]
pub use indicator_repository::MockIndicatorRepository;
pub use indicator_repository::{
    FixtureIndicatorRepository, IndicatorRepository, IndicatorRepositoryError,
};
#[cfg(test)]
pub use mail_sender::MockMailSender;
pub use mail_sender::{FixtureMailSender, MailSendError, MailSender};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use recipient_repository::MockRecipientRepository;
pub use recipient_repository::{
    FixtureRecipientRepository, RecipientRepository, RecipientRepositoryError,
};
#[cfg(test)]
pub use template_store::MockTemplateStore;
pub use template_store::{
    FixtureTemplateStore, TemplateName, TemplateStore, TemplateStoreError,
};
#[cfg(test)]
pub use threshold_repository::MockThresholdRepository;
pub use threshold_repository::{
    FixtureThresholdRepository, ThresholdRepository, ThresholdRepositoryError,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
