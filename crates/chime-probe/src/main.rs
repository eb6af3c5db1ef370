use std::io::Write;

use anyhow::Context;
use anyhow::Result;
use chime_probe::cache::MetricCache;
use chime_probe::config::Cli;
use chime_probe::config::ConfigError;
use chime_probe::config::LABEL_ENV;
use chime_probe::fetcher::SessionFetcher;
use chime_probe::metrics::encoders::create_encoder;
use chime_probe::metrics::graph;
use chime_probe::probe::Probe;
use utils::version;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

fn main() -> Result<()> {
    utils::logging::init();
    setup_global_hooks();

    let cli = match Cli::parse_with_env_file(std::env::args_os()) {
        Ok(cli) => cli,
        Err(ConfigError::Args(e)) => e.exit(),
        Err(e) => return Err(e).context("failed to load configuration"),
    };

    let label = std::env::var(LABEL_ENV).ok();
    let prefix = cli.metric_key_prefix(label.as_deref());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if graph::meta_requested(std::env::var(graph::META_ENV).ok().as_deref()) {
        graph::write_definition(&mut out, &graph::graph_definition(&prefix))
            .context("failed to write graph definition")?;
        return Ok(());
    }

    tracing::debug!("Starting chime-probe {}", &**version::VERSION);

    let fetcher_config = cli.fetcher_config().context("invalid configuration")?;
    let fetcher = SessionFetcher::new(fetcher_config).context("failed to build fetcher")?;
    tracing::debug!(url = fetcher.url(), prefix = %prefix, "polling sessions");

    let mut probe = Probe::new(fetcher, create_encoder(&cli.metrics_format), prefix);
    if let Some(path) = &cli.tempfile {
        probe = probe.with_cache(MetricCache::new(path));
    }

    let timestamp = chrono::Utc::now().timestamp();
    probe
        .run_once(&mut out, timestamp)
        .context("failed to write metrics")?;
    out.flush().context("failed to flush stdout")?;

    Ok(())
}
