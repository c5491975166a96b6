use anyhow::Context;
use dining::{
    config::SessionConfig,
    log::{LogSink, StdoutSink},
    session,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig::default();
    let sink = StdoutSink::stdout();

    sink.write_line("Dinner started!");
    let report = session::run(&config, &sink).context("dinner could not be served")?;
    sink.write_line("Dinner done!");

    for diner in &report.diners {
        tracing::info!(name = %diner.name, meals = diner.meals, "diner summary");
    }
    Ok(())
}
