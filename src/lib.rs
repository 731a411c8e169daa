//! Owl Bookstore catalog service.
//!
//! Wires the books module into the module registry and runs the HTTP server.

#![recursion_limit = "256"]

pub mod modules;

use anyhow::Context;
use owl_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Build a registry holding every module, each with fresh in-memory state
pub fn registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry).context("failed to register modules")?;
    Ok(registry)
}

/// Run the service until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry()?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = owl_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    served
}
