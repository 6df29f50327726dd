use std::collections::HashMap;

use clanstats::output::{render, RenderOptions};
use clanstats::remote::{decode_clan, decode_roster, decode_war_log};
use clanstats::{
    compute_clan_war_stats, compute_donation_ranking, compute_war_ranking, ParticipantResult,
    SeasonOrder, StatsOptions, WarRecord,
};
use rstest::rstest;
use serde_json::Value;

const CLAN: &str = include_str!("fixtures/clan.json");
const WAR_LOG: &str = include_str!("fixtures/warlog.json");

/// Deterministic spread of wars: several seasons, repeated tags, zero-battle days.
fn mixed_war_log() -> Vec<WarRecord> {
    let tags = ["A", "B", "C", "D", "E"];
    (0..12)
        .map(|i: i64| WarRecord {
            season_number: [3, 1, 3, 2][(i % 4) as usize],
            participants: tags
                .iter()
                .enumerate()
                .filter(|(j, _)| (i + *j as i64) % 3 != 0)
                .map(|(j, tag)| {
                    let battles = ((i + j as i64) % 3 - 1).max(0);
                    ParticipantResult {
                        tag: tag.to_string(),
                        name: tag.to_lowercase(),
                        cards_earned: 100 * (j as i64 + 1) + i,
                        battles_played: battles,
                        wins: if battles > 0 { (i % 2) * battles } else { 0 },
                    }
                })
                .collect(),
        })
        .collect()
}

#[test]
fn each_season_holds_every_tag_once_with_summed_totals() {
    let wars = mixed_war_log();
    let ranking = compute_war_ranking(&wars, &StatsOptions::default());

    for season in &ranking {
        let mut expected: HashMap<&str, (i64, i64, i64)> = HashMap::new();
        for war in wars.iter().filter(|w| w.season_number == season.season) {
            for p in &war.participants {
                let e = expected.entry(p.tag.as_str()).or_default();
                e.0 += p.cards_earned;
                e.1 += p.battles_played;
                e.2 += p.wins;
            }
        }

        assert_eq!(season.ranking.len(), expected.len(), "season {}", season.season);
        for stats in &season.ranking {
            let (cards, battles, wins) = expected[stats.tag.as_str()];
            assert_eq!(
                (stats.cards_earned, stats.battles_played, stats.wins),
                (cards, battles, wins),
                "season {} tag {}",
                season.season,
                stats.tag
            );
        }
        assert!(season.ranking.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn missed_war_days_count_each_zero_battle_war() {
    let wars = mixed_war_log();
    let ranking = compute_war_ranking(&wars, &StatsOptions::default());

    for season in &ranking {
        for stats in &season.ranking {
            let expected = wars
                .iter()
                .filter(|w| w.season_number == season.season)
                .flat_map(|w| &w.participants)
                .filter(|p| p.tag == stats.tag && p.battles_played == 0)
                .count() as i64;
            assert_eq!(stats.war_day_not_played, expected);
        }
    }
}

#[rstest]
#[case(SeasonOrder::FirstSeen, vec![3, 1, 2])]
#[case(SeasonOrder::NewestFirst, vec![3, 2, 1])]
#[case(SeasonOrder::OldestFirst, vec![1, 2, 3])]
fn season_order_over_mixed_log(#[case] order: SeasonOrder, #[case] expected: Vec<i64>) {
    let opts = StatsOptions {
        season_order: order,
        ..StatsOptions::default()
    };
    let seasons: Vec<_> = compute_war_ranking(&mixed_war_log(), &opts)
        .into_iter()
        .map(|s| s.season)
        .collect();
    assert_eq!(seasons, expected);
}

#[test]
fn donation_ranking_is_a_sorted_permutation() {
    let roster = decode_roster("fixture", CLAN).unwrap();
    let ranked = compute_donation_ranking(&roster);

    assert_eq!(ranked.len(), roster.len());
    for m in &roster {
        assert!(ranked.contains(m));
    }
    assert!(ranked.windows(2).all(|w| w[0].donations >= w[1].donations));
    // Alice and Carol tie on 120; roster order is kept.
    let tied: Vec<_> = ranked
        .iter()
        .filter(|m| m.donations == 120)
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(tied, vec!["Alice", "Carol"]);
}

#[test]
fn members_report_keeps_clan_fields_and_sorts_roster() {
    let mut clan = decode_clan("fixture", CLAN).unwrap();
    clan.members = compute_donation_ranking(&clan.members);

    let v: Value = serde_json::from_str(&render(&clan, RenderOptions::default()).unwrap()).unwrap();
    assert_eq!(v["name"], "Les Barbares");
    assert_eq!(v["score"], 48211);
    let names: Vec<_> = v["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bob", "Alice", "Carol", "Dave"]);
}

#[test]
fn stats_json_keeps_payload_field_names() {
    let roster = decode_roster("fixture", CLAN).unwrap();
    let wars = decode_war_log("fixture", WAR_LOG).unwrap();
    let stats = compute_clan_war_stats(&roster, &wars, &StatsOptions::default());

    let rendered = render(&stats, RenderOptions::default()).unwrap();
    let v: Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(v["donations_ranking"][0]["name"], "Bob");
    assert_eq!(v["donations_ranking"][0]["role"], "coLeader");
    assert_eq!(v["war_ranking"][0]["season"], 12);
    let top = &v["war_ranking"][0]["ranking"][0];
    assert_eq!(top["tag"], "P2Y");
    assert_eq!(top["cardsEarned"], 2200);
    assert_eq!(top["battlesPlayed"], 2);
    assert_eq!(top["warDayNotPlayed"], 0);
    assert_eq!(top["collectionBattleNotPlayed"], 0);
    assert_eq!(top["warNotPlayed"], 0);
    assert_eq!(top["score"], 2700);
}
