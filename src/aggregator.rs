use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::errors::ConfigError;
use crate::model::{
    ClanWarStats, Member, ParticipantSeasonStats, SeasonAccumulator, SeasonRanking, WarRecord,
};

/// Points per unit of each counter. Penalties are subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub cards_earned: i64,
    pub wins: i64,
    pub war_day_not_played: i64,
    pub collection_battle_not_played: i64,
    pub war_not_played: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cards_earned: 1,
            wins: 500,
            war_day_not_played: 1500,
            collection_battle_not_played: 250,
            war_not_played: 100,
        }
    }
}

/// Order of seasons in `war_ranking`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonOrder {
    /// As first met in the war log.
    #[default]
    FirstSeen,
    NewestFirst,
    OldestFirst,
}

impl FromStr for SeasonOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_seen" | "first-seen" => Ok(Self::FirstSeen),
            "newest_first" | "newest-first" | "newest" => Ok(Self::NewestFirst),
            "oldest_first" | "oldest-first" | "oldest" => Ok(Self::OldestFirst),
            other => Err(ConfigError::UnknownSeasonOrder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsOptions {
    pub weights: ScoreWeights,
    pub season_order: SeasonOrder,
}

/// Bucket war records by season, keeping input order both across seasons
/// (first occurrence) and within each season.
pub fn group_by_season(wars: &[WarRecord]) -> Vec<SeasonAccumulator> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut seasons: Vec<SeasonAccumulator> = Vec::new();

    for war in wars {
        let idx = *index.entry(war.season_number).or_insert_with(|| {
            seasons.push(SeasonAccumulator::new(war.season_number));
            seasons.len() - 1
        });
        seasons[idx].wars.push(war.clone());
    }
    seasons
}

/// Fold every participant result of the season's wars, in war order.
///
/// Roster members with no result in any of these wars get no entry.
pub fn accumulate(season: &mut SeasonAccumulator) {
    let wars = std::mem::take(&mut season.wars);
    for war in &wars {
        for result in &war.participants {
            season.member_mut(&result.tag, &result.name).add_result(result);
        }
    }
    season.wars = wars;
}

/// Weighted sum of the counters, saturating at the `i64` bounds.
pub fn score(stats: &ParticipantSeasonStats, weights: &ScoreWeights) -> i64 {
    let bonus = stats
        .cards_earned
        .saturating_mul(weights.cards_earned)
        .saturating_add(stats.wins.saturating_mul(weights.wins));
    let penalty = stats
        .war_day_not_played
        .saturating_mul(weights.war_day_not_played)
        .saturating_add(
            stats
                .collection_battle_not_played
                .saturating_mul(weights.collection_battle_not_played),
        )
        .saturating_add(stats.war_not_played.saturating_mul(weights.war_not_played));
    bonus.saturating_sub(penalty)
}

/// Score an accumulated season and sort it, best first. Equal scores keep
/// first-seen order.
pub fn rank_season(season: SeasonAccumulator, weights: &ScoreWeights) -> SeasonRanking {
    let mut ranking = season.members;
    for stats in &mut ranking {
        stats.score = score(stats, weights);
    }
    ranking.sort_by(|a, b| b.score.cmp(&a.score));

    SeasonRanking {
        season: season.season_number,
        ranking,
    }
}

/// Roster copy sorted by donations, highest first, stable on ties.
pub fn compute_donation_ranking(members: &[Member]) -> Vec<Member> {
    let mut sorted = members.to_vec();
    sorted.sort_by(|a, b| b.donations.cmp(&a.donations));
    sorted
}

pub fn compute_war_ranking(wars: &[WarRecord], opts: &StatsOptions) -> Vec<SeasonRanking> {
    let mut rankings: Vec<SeasonRanking> = group_by_season(wars)
        .into_iter()
        .map(|mut season| {
            accumulate(&mut season);
            debug!(
                "season {}: {} wars, {} participants",
                season.season_number,
                season.wars.len(),
                season.members.len()
            );
            rank_season(season, &opts.weights)
        })
        .collect();

    match opts.season_order {
        SeasonOrder::FirstSeen => {}
        SeasonOrder::NewestFirst => rankings.sort_by(|a, b| b.season.cmp(&a.season)),
        SeasonOrder::OldestFirst => rankings.sort_by_key(|r| r.season),
    }
    rankings
}

pub fn compute_clan_war_stats(
    members: &[Member],
    wars: &[WarRecord],
    opts: &StatsOptions,
) -> ClanWarStats {
    ClanWarStats {
        donations_ranking: compute_donation_ranking(members),
        war_ranking: compute_war_ranking(wars, opts),
    }
}
