use anyhow::Result;
use tracing::dispatcher::set_global_default;
use tracing::{Dispatch, Subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

pub mod config;
pub use self::config::{Config, LogsFormat};

pub fn get_subscriber(cfg: &Config) -> Box<dyn Subscriber + Send + Sync> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let reg = Registry::default().with(env_filter);

    match cfg.format {
        LogsFormat::Full => Box::new(reg.with(fmt::layer())),
        LogsFormat::Compact => Box::new(reg.with(fmt::layer().compact())),
        LogsFormat::Pretty => Box::new(reg.with(fmt::layer().pretty())),
        LogsFormat::Json => Box::new(reg.with(fmt::layer().json())),
    }
}

/// Installs `subscriber` for the whole process and returns a handle to it
/// for components that take their logger explicitly.
pub fn init_subscriber(subscriber: Box<dyn Subscriber + Send + Sync>) -> Result<Dispatch> {
    LogTracer::init()?;
    let dispatch = Dispatch::new(subscriber);
    set_global_default(dispatch.clone())?;
    Ok(dispatch)
}
