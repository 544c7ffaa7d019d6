use std::io::{stdin, stdout};

use chrono::Datelike;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use car_stock::{
    Config, Schema, Store,
    cli::{controller::start_session, input::LineInput, output::TableOutput},
};

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(false)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = Config::default();
    let schema = Schema::used_cars(i64::from(chrono::Local::now().year()));

    let store = Store::open(&config, schema)?;
    let session = start_session(
        &store,
        &config,
        LineInput::new(stdin().lock(), stdout()),
        TableOutput::new(stdout().lock()),
    );
    store.close()?;
    Ok(session?)
}
