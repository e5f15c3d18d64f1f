//! Application lifecycle: register modules, run them, serve HTTP, shut down.

use std::future::Future;

use anyhow::Context;
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::{library::Library, modules};

/// Registry holding every application module, all sharing `library`
pub fn build_registry(library: &Library) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, library);
    registry
}

/// Run the service until Ctrl-C.
///
/// A server failure is returned even when stopping modules afterwards also
/// fails; stop failures are logged.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let library = Library::new();
    let registry = build_registry(&library);
    let ctx = InitCtx {
        settings: &settings,
    };

    tracing::info!(
        core = registry.core_module_count(),
        custom = registry.custom_module_count(),
        "starting modules"
    );

    registry.init_core_modules(&ctx).await?;
    registry.init_custom_modules(&ctx).await?;
    registry.start_core_modules(&ctx).await?;
    registry.start_custom_modules(&ctx).await?;

    let served = libris_http::start_server(
        &registry,
        &settings,
        shutdown_on(tokio::signal::ctrl_c()),
    )
    .await
    .context("server terminated with an error");

    stop_modules(&registry).await;

    served
}

/// Stop custom then core modules, logging failures instead of returning them.
async fn stop_modules(registry: &ModuleRegistry) {
    if let Err(err) = registry.stop_custom_modules().await {
        tracing::error!(error = ?err, "failed to stop custom modules");
    }
    if let Err(err) = registry.stop_core_modules().await {
        tracing::error!(error = ?err, "failed to stop core modules");
    }
}

/// Resolve once `signal` fires. If the signal cannot be listened for, never
/// resolve, so the server keeps running.
async fn shutdown_on(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for shutdown signal; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
