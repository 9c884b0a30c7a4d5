use std::sync::Arc;

use anyhow::Context;
use clinic_app::{BookingStore, MemoryBookingStore, MySqlBookingStore};
use clinic_kernel::{
    settings::{DatabaseDriver, Settings},
    InitCtx, ModuleRegistry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load clinic settings")?;
    clinic_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        driver = ?settings.database.driver,
        "clinic-app bootstrap starting"
    );

    let pool = match settings.database.driver {
        DatabaseDriver::Mysql => Some(clinic_db::connect(&settings.database).await?),
        DatabaseDriver::Memory => {
            tracing::warn!("using in-memory booking store; data is lost on restart");
            None
        }
    };

    let store: Arc<dyn BookingStore> = match &pool {
        Some(pool) => Arc::new(MySqlBookingStore::new(pool.clone())),
        None => Arc::new(MemoryBookingStore::new()),
    };

    let mut registry = ModuleRegistry::new();
    clinic_app::register_all(&mut registry, &settings, store);

    if let Some(pool) = &pool {
        let applied = clinic_db::run_migrations(pool, &registry.collect_migrations())
            .await
            .with_context(|| "failed to apply migrations")?;
        tracing::info!(applied, "migrations complete");
    }

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("clinic-app bootstrap complete");

    let served = clinic_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_all().await?;
    if let Some(pool) = pool {
        pool.close().await;
    }

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
