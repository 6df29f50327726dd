//! Clan donation and war rankings built from a game API's roster and war log.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod model;
pub mod output;
pub mod remote;

pub use aggregator::{
    compute_clan_war_stats, compute_donation_ranking, compute_war_ranking, ScoreWeights,
    SeasonOrder, StatsOptions,
};
pub use errors::{ConfigError, FetchError, MalformedRecord};
pub use model::{
    ClanInfo, ClanWarStats, Member, ParticipantResult, ParticipantSeasonStats, Role, SeasonRanking,
    WarRecord,
};
pub use remote::{ApiSettings, ClanApi, ClanSource};
