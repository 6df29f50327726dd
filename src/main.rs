use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tracing::info;

use clanstats::aggregator::{compute_donation_ranking, StatsOptions};
use clanstats::cli::{self, Command};
use clanstats::config::{self, Config};
use clanstats::logging;
use clanstats::output::{render, write_report, RenderOptions};
use clanstats::remote::{self, ApiSettings};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = cli::parse();
    if args.help {
        cli::print_help();
        return Ok(());
    }
    logging::init(args.verbose);

    // CLI > env > config.toml > defaults
    let mut cfg = Config::load();
    if let Some(tag) = args.clan.clone() {
        cfg.clan_tag = Some(tag);
    }
    if let Some(url) = args.api_url.clone() {
        cfg.api_url = url;
    }
    if let Some(order) = args.season_order.as_deref() {
        cfg.season_order = order.parse()?;
    }

    let settings = ApiSettings {
        base_url: cfg.api_url.clone(),
        clan_tag: cfg.clan_tag()?,
        token: config::api_token()?,
        timeout: Duration::from_secs(cfg.timeout_secs),
    };
    let render_opts = RenderOptions {
        envelope: args.envelope,
        compact: args.compact,
    };

    let start_iso = Utc::now().to_rfc3339();
    info!("{:?} for #{} started {}", args.command, settings.clan_tag, start_iso);

    let rendered = match args.command {
        Command::Members => {
            let mut clan = remote::fetch_clan_async(settings)
                .await
                .context("fetching clan roster")?;
            clan.members = compute_donation_ranking(&clan.members);
            render(&clan, render_opts)?
        }
        Command::WarStats => {
            let opts = StatsOptions {
                weights: cfg.weights,
                season_order: cfg.season_order,
            };
            let stats = remote::collect_clan_war_stats_async(settings, opts)
                .await
                .context("building clan war stats")?;
            info!(
                "{} members ranked, {} seasons",
                stats.donations_ranking.len(),
                stats.war_ranking.len()
            );
            render(&stats, render_opts)?
        }
    };

    write_report(&rendered, args.out.as_deref()).context("writing report")?;
    info!("finished {}", Utc::now().to_rfc3339());
    Ok(())
}
