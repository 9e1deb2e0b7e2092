use anyhow::Context;

use crate::consumer::{ConsumerService, KafkaConnector};
use crate::decoder::JsonDecoder;
use crate::model::Order;

mod config;
mod consumer;
mod decoder;
mod error;
mod model;
mod shutdown;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = crate::config::Config::load().context("can't read config")?;

    let subscriber = telemetry::get_subscriber(&cfg.telemetry);
    let log = telemetry::init_subscriber(subscriber).context("can't init telemetry")?;

    tracing::info!("starting {}", cfg.telemetry.svc_name);
    tracing::info!("config loaded; config={:?}", &cfg);

    let service = ConsumerService::<Option<Order>, _>::new(
        cfg.kafka,
        Box::new(KafkaConnector),
        JsonDecoder::<Order>::new(),
        log,
    );

    let (trigger, shutdown) = shutdown::channel();
    let consumer_fut = tokio::spawn(async move { service.run(shutdown).await });

    shutdown::signal()
        .await
        .context("can't listen for shutdown signal")?;

    tracing::info!("shutdown requested");
    trigger.cancel();

    let stop = consumer_fut.await?;
    tracing::info!("consumer stopped; reason={:?}", stop);

    Ok(())
}
