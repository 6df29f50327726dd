use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::MalformedRecord;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Member,
    Elder,
    CoLeader,
    Leader,
    /// Any other role string, kept as sent.
    #[serde(untagged)]
    Other(String),
}

/// One roster entry as of the fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub tag: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub donations: u32,
}

/// One war event; several can share a season.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarRecord {
    pub season_number: i64,
    pub participants: Vec<ParticipantResult>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResult {
    pub tag: String,
    pub name: String,
    pub cards_earned: i64,
    pub battles_played: i64,
    pub wins: i64,
}

/// Running totals for one participant over one season.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSeasonStats {
    pub name: String,
    pub tag: String,
    pub cards_earned: i64,
    pub battles_played: i64,
    pub wins: i64,
    pub war_day_not_played: i64,
    // Nothing in the war log feeds these two yet; they stay 0.
    pub collection_battle_not_played: i64,
    pub war_not_played: i64,
    pub score: i64,
}

impl ParticipantSeasonStats {
    pub fn new(tag: &str, name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add one war's result. A war with no battle played counts once
    /// towards `war_day_not_played`. Totals saturate instead of overflowing.
    pub fn add_result(&mut self, result: &ParticipantResult) {
        self.cards_earned = self.cards_earned.saturating_add(result.cards_earned);
        self.battles_played = self.battles_played.saturating_add(result.battles_played);
        self.wins = self.wins.saturating_add(result.wins);
        if result.battles_played == 0 {
            self.war_day_not_played = self.war_day_not_played.saturating_add(1);
        }
    }
}

/// All wars of one season, plus the per-tag totals folded from them.
#[derive(Clone, Debug, Default)]
pub struct SeasonAccumulator {
    pub season_number: i64,
    pub wars: Vec<WarRecord>,
    // First-seen order; `members_index` maps tag -> position in `members`.
    pub members: Vec<ParticipantSeasonStats>,
    pub members_index: HashMap<String, usize>,
}

impl SeasonAccumulator {
    pub fn new(season_number: i64) -> Self {
        Self {
            season_number,
            ..Self::default()
        }
    }

    pub fn member_mut(&mut self, tag: &str, name: &str) -> &mut ParticipantSeasonStats {
        let idx = match self.members_index.get(tag) {
            Some(&idx) => idx,
            None => {
                self.members.push(ParticipantSeasonStats::new(tag, name));
                let idx = self.members.len() - 1;
                self.members_index.insert(tag.to_string(), idx);
                idx
            }
        };
        &mut self.members[idx]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRanking {
    pub season: i64,
    pub ranking: Vec<ParticipantSeasonStats>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanWarStats {
    pub donations_ranking: Vec<Member>,
    pub war_ranking: Vec<SeasonRanking>,
}

/// The clan payload as reported: a few clan-level fields plus the roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub members: Vec<Member>,
}

// ---------------------------------------------------------------------------
// Wire payloads. Every field is optional here so that a missing one can be
// reported by name instead of failing inside serde with a generic message.
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RawClan {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub score: Option<i64>,
    pub members: Option<Vec<RawMember>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMember {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub donations: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWarRecord {
    pub season_number: Option<i64>,
    pub participants: Option<Vec<RawParticipant>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParticipant {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub cards_earned: Option<i64>,
    #[serde(alias = "battleCount")]
    pub battles_played: Option<i64>,
    pub wins: Option<i64>,
}

impl RawClan {
    /// Only `members` is required; the clan-level fields pass through as-is.
    pub fn validate(self) -> Result<ClanInfo, MalformedRecord> {
        let members = self
            .members
            .ok_or(MalformedRecord::Roster { field: "members" })?
            .into_iter()
            .enumerate()
            .map(|(index, m)| m.validate(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ClanInfo {
            tag: self.tag,
            name: self.name,
            score: self.score,
            members,
        })
    }
}

impl RawMember {
    /// `role` may be absent; tag, name and donations may not.
    pub fn validate(self, index: usize) -> Result<Member, MalformedRecord> {
        let missing = |field| MalformedRecord::Member { index, field };
        Ok(Member {
            tag: self.tag.ok_or_else(|| missing("tag"))?,
            name: self.name.ok_or_else(|| missing("name"))?,
            role: self.role,
            donations: self.donations.ok_or_else(|| missing("donations"))?,
        })
    }
}

impl RawWarRecord {
    pub fn validate(self, index: usize) -> Result<WarRecord, MalformedRecord> {
        let season_number = self.season_number.ok_or(MalformedRecord::War {
            index,
            field: "seasonNumber",
        })?;
        let participants = self.participants.ok_or(MalformedRecord::War {
            index,
            field: "participants",
        })?;

        let participants = participants
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.validate(season_number, i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WarRecord {
            season_number,
            participants,
        })
    }
}

impl RawParticipant {
    /// A participant without a name is shown under its tag. Counts must be
    /// present and non-negative.
    pub fn validate(
        self,
        season: i64,
        position: usize,
    ) -> Result<ParticipantResult, MalformedRecord> {
        let label = self
            .tag
            .clone()
            .unwrap_or_else(|| format!("at position {position}"));
        let count = |field: &'static str, value: Option<i64>| match value {
            None => Err(MalformedRecord::Participant {
                season,
                participant: label.clone(),
                field,
            }),
            Some(value) if value < 0 => Err(MalformedRecord::Negative {
                season,
                participant: label.clone(),
                field,
                value,
            }),
            Some(value) => Ok(value),
        };

        let tag = self.tag.ok_or_else(|| MalformedRecord::Participant {
            season,
            participant: label.clone(),
            field: "tag",
        })?;
        Ok(ParticipantResult {
            name: self.name.unwrap_or_else(|| tag.clone()),
            cards_earned: count("cardsEarned", self.cards_earned)?,
            battles_played: count("battlesPlayed", self.battles_played)?,
            wins: count("wins", self.wins)?,
            tag,
        })
    }
}
