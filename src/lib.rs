//! Bookshelf application library
//!
//! Wires the books and auth modules into the module registry and runs the
//! HTTP server around them.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::register_all;

/// Registry holding every application module, configured from `settings`
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, settings);
    registry
}

/// Run the service until Ctrl-C: init and start modules, serve HTTP, then
/// stop modules in reverse order.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_all(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_all(&ctx)
        .await
        .context("module startup failed")?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry
        .stop_all()
        .await
        .context("module shutdown failed")?;

    served
}
