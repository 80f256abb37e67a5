//! Service entry-point: wires the adapters, the scheduler, and the HTTP
//! surface.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use mockable::DefaultClock;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::ports::MailSender;
use backend::domain::{MonitorPorts, MonitorService, SeriesCatalog};
use backend::inbound::http::health::{live, ready};
use backend::inbound::http::monitor::run_monitor_cycle;
use backend::inbound::http::HealthState;
use backend::outbound::feed::FeedHttpSource;
use backend::outbound::mail::{HttpMailSender, LoggingMailSender};
use backend::outbound::persistence::{
    DbPool, DieselIndicatorRepository, DieselNotificationRepository, DieselRecipientRepository,
    DieselThresholdRepository, DieselUserDirectory, PoolConfig,
};
use backend::outbound::templates::FsTemplateStore;
use backend::server::{spawn_cycle_loop, AppConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(config.database_url.clone()))
        .await
        .map_err(std::io::Error::other)?;

    let catalog = SeriesCatalog::consumer_prices();

    let feed = FeedHttpSource::new(config.feed_api_url.clone(), config.feed_api_key.clone())
        .map_err(std::io::Error::other)?;

    let mailer: Arc<dyn MailSender> = match &config.mail {
        Some(mail) => Arc::new(
            HttpMailSender::new(
                mail.endpoint.clone(),
                mail.api_key.clone(),
                mail.namespace.clone(),
            )
            .map_err(std::io::Error::other)?,
        ),
        None => {
            warn!("MAIL_API_URL not set; messages will be logged, not delivered");
            Arc::new(LoggingMailSender)
        }
    };

    let ports = MonitorPorts {
        feed: Arc::new(feed),
        indicators: Arc::new(DieselIndicatorRepository::new(
            pool.clone(),
            catalog.clone(),
        )),
        thresholds: Arc::new(DieselThresholdRepository::new(pool.clone())),
        recipients: Arc::new(DieselRecipientRepository::new(pool.clone())),
        users: Arc::new(DieselUserDirectory::new(pool.clone())),
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        templates: Arc::new(FsTemplateStore::new(config.template_dir.clone())),
        mailer,
    };

    let monitor = Arc::new(MonitorService::new(
        ports,
        catalog,
        config.sender.clone(),
        config.repeat_policy,
        Arc::new(DefaultClock),
    ));

    let _scheduler = spawn_cycle_loop(monitor.clone(), config.sync_interval);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let monitor_data = web::Data::from(monitor);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_health_state.clone())
            .app_data(monitor_data.clone())
            .service(run_monitor_cycle)
            .service(ready)
            .service(live)
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
