use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes tracing from `RUST_LOG`. Defaults to warnings only: the
/// alternate screen owns stdout/stderr while the viewer runs, so anything
/// chattier should be opted into explicitly.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logtail=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
