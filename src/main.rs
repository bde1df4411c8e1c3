use anyhow::Context;
use bookshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;

    bookshelf_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        host = %settings.server.host,
        port = settings.server.port,
        "bookshelf bootstrap starting"
    );

    bookshelf_app::run(settings).await
}
