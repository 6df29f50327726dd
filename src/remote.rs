use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tokio::task;
use tracing::{debug, info};

use crate::aggregator::{compute_clan_war_stats, StatsOptions};
use crate::errors::FetchError;
use crate::model::{ClanInfo, ClanWarStats, Member, RawClan, RawWarRecord, WarRecord};

/// Where roster and war log come from.
pub trait ClanSource {
    fn fetch_roster(&self) -> Result<Vec<Member>, FetchError>;
    fn fetch_war_log(&self) -> Result<Vec<WarRecord>, FetchError>;
}

/// Connection settings. The blocking client is built from these on the
/// worker thread, never on the async runtime.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub clan_tag: String, // normalized, no '#'
    pub token: String,
    pub timeout: Duration,
}

pub struct ClanApi {
    client: Client,
    settings: ApiSettings,
}

impl ClanApi {
    pub fn new(settings: ApiSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|source| FetchError::Network {
                url: settings.base_url.clone(),
                source,
            })?;
        Ok(Self { client, settings })
    }

    /// The clan payload with its clan-level fields, roster in payload order.
    pub fn fetch_clan(&self) -> Result<ClanInfo, FetchError> {
        let url = self.roster_url();
        let body = self.get_text(&url)?;
        decode_clan(&url, &body)
    }

    pub fn roster_url(&self) -> String {
        format!(
            "{}/clan/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.clan_tag
        )
    }

    pub fn war_log_url(&self) -> String {
        format!("{}/warlog", self.roster_url())
    }

    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("remote: GET {}", url);
        let t0 = Instant::now();
        let network = |source| FetchError::Network {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .get(url)
            .header("auth", &self.settings.token)
            .send()
            .map_err(network)?;

        let status = resp.status();
        let body = resp.text().map_err(network)?;
        debug!(
            "remote: {} -> {} ({} bytes) in {:.3}s",
            url,
            status,
            body.len(),
            t0.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body: truncate(&body, 200),
            });
        }
        Ok(body)
    }
}

impl ClanSource for ClanApi {
    fn fetch_roster(&self) -> Result<Vec<Member>, FetchError> {
        Ok(self.fetch_clan()?.members)
    }

    fn fetch_war_log(&self) -> Result<Vec<WarRecord>, FetchError> {
        let url = self.war_log_url();
        let body = self.get_text(&url)?;
        decode_war_log(&url, &body)
    }
}

fn decode_json<T>(url: &str, body: &str) -> Result<T, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Clan payload -> validated clan info.
pub fn decode_clan(url: &str, body: &str) -> Result<ClanInfo, FetchError> {
    let clan: RawClan = decode_json(url, body)?;
    Ok(clan.validate()?)
}

/// Clan payload -> validated roster.
pub fn decode_roster(url: &str, body: &str) -> Result<Vec<Member>, FetchError> {
    Ok(decode_clan(url, body)?.members)
}

/// War-log payload (a JSON array) -> validated war records, in payload order.
pub fn decode_war_log(url: &str, body: &str) -> Result<Vec<WarRecord>, FetchError> {
    let raw: Vec<RawWarRecord> = decode_json(url, body)?;
    let wars = raw
        .into_iter()
        .enumerate()
        .map(|(index, war)| war.validate(index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(wars)
}

/// Roster then war log, then the stats. The first failure ends the run.
pub fn collect_clan_war_stats<S: ClanSource>(
    source: &S,
    opts: &StatsOptions,
) -> Result<ClanWarStats, FetchError> {
    let roster = source.fetch_roster()?;
    info!("roster: {} members", roster.len());
    let wars = source.fetch_war_log()?;
    info!("war log: {} wars", wars.len());
    Ok(compute_clan_war_stats(&roster, &wars, opts))
}

/// Fetch just the clan payload on a blocking worker.
pub async fn fetch_clan_async(settings: ApiSettings) -> anyhow::Result<ClanInfo> {
    let clan = task::spawn_blocking(move || -> anyhow::Result<ClanInfo> {
        let api = ClanApi::new(settings)?;
        Ok(api.fetch_clan()?)
    })
    .await??;
    Ok(clan)
}

/// Fetch both payloads and compute the stats on a blocking worker.
pub async fn collect_clan_war_stats_async(
    settings: ApiSettings,
    opts: StatsOptions,
) -> anyhow::Result<ClanWarStats> {
    let stats = task::spawn_blocking(move || -> anyhow::Result<ClanWarStats> {
        let t0 = Instant::now();
        let api = ClanApi::new(settings)?;
        let stats = collect_clan_war_stats(&api, &opts)?;
        debug!("remote: fetch + aggregate took {:.3}s", t0.elapsed().as_secs_f64());
        Ok(stats)
    })
    .await??;
    Ok(stats)
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
