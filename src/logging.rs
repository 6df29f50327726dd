use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// stderr subscriber; `RUST_LOG` wins over the `-v` default.
pub fn init(verbose: bool) {
    let default = if verbose { "clanstats=debug" } else { "clanstats=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
