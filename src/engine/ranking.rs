//! Stat search: species filter, threshold filter, then weighted ranking.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::data::{Stat, StatRecord};
use crate::engine::error::{QueryError, QueryResult};
use crate::engine::filter::SpeciesFilter;
use crate::engine::QueryEngine;

pub const STAT_WEIGHT_PRIMARY: f64 = 0.7;
pub const STAT_WEIGHT_SECONDARY: f64 = 0.3;

/// Parameters of a ranked stat search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatQuery {
    pub primary_stat: String,
    pub secondary_stat: String,
    pub min_primary: u32,
    /// Unset means the median of `secondary_stat`.
    pub min_secondary: Option<u32>,
    /// Unset means no speed filter.
    pub min_speed: Option<u32>,
    pub filter: SpeciesFilter,
}

impl StatQuery {
    pub fn new(primary_stat: impl Into<String>, secondary_stat: impl Into<String>) -> Self {
        Self {
            primary_stat: primary_stat.into(),
            secondary_stat: secondary_stat.into(),
            min_primary: 0,
            min_secondary: None,
            min_speed: None,
            filter: SpeciesFilter::default(),
        }
    }

    pub fn min_primary(mut self, value: u32) -> Self {
        self.min_primary = value;
        self
    }

    pub fn min_secondary(mut self, value: u32) -> Self {
        self.min_secondary = Some(value);
        self
    }

    pub fn min_speed(mut self, value: u32) -> Self {
        self.min_speed = Some(value);
        self
    }

    pub fn filter(mut self, filter: SpeciesFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub name: String,
    #[serde(flatten)]
    pub stats: StatRecord,
    pub score: f64,
}

/// Ranked results. Serializes as an object keyed by name, best first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedCandidates(pub Vec<RankedCandidate>);

#[derive(Serialize)]
struct ScoredStats<'a> {
    #[serde(flatten)]
    stats: &'a StatRecord,
    score: f64,
}

impl Serialize for RankedCandidates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for candidate in &self.0 {
            let entry = ScoredStats {
                stats: &candidate.stats,
                score: candidate.score,
            };
            map.serialize_entry(&candidate.name, &entry)?;
        }
        map.end()
    }
}

pub fn composite_score(stats: &StatRecord, primary: Stat, secondary: Stat) -> f64 {
    STAT_WEIGHT_PRIMARY * f64::from(stats.get(primary))
        + STAT_WEIGHT_SECONDARY * f64::from(stats.get(secondary))
}

/// Best first. The sort is stable, so equal scores keep their input order.
pub fn rank_candidates<'a, I>(candidates: I, primary: Stat, secondary: Stat) -> Vec<RankedCandidate>
where
    I: IntoIterator<Item = (&'a String, &'a StatRecord)>,
{
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|(name, stats)| RankedCandidate {
            name: name.clone(),
            stats: *stats,
            score: composite_score(stats, primary, secondary),
        })
        .collect();

    ranked.sort_by(|left, right| right.score.total_cmp(&left.score));
    ranked
}

fn parse_stat(field: &str, raw: &str) -> QueryResult<Stat> {
    if raw.is_empty() {
        return Err(QueryError::InvalidArgument(format!("{field} cannot be empty")));
    }
    raw.parse().map_err(|_| {
        QueryError::InvalidArgument(format!(
            "Invalid {field}: '{raw}'. Valid stats: {:?}",
            Stat::valid_names()
        ))
    })
}

impl QueryEngine {
    /// Pokémon meeting every threshold, ranked by `0.7 * primary + 0.3 * secondary`.
    pub fn find_by_stats(&self, query: &StatQuery) -> QueryResult<Vec<RankedCandidate>> {
        debug!(
            primary_stat = %query.primary_stat,
            secondary_stat = %query.secondary_stat,
            min_primary = query.min_primary,
            min_secondary = ?query.min_secondary,
            min_speed = ?query.min_speed,
            filter = ?query.filter,
            "searching pokemon by stats"
        );

        let primary = parse_stat("primary_stat", &query.primary_stat)?;
        let secondary = parse_stat("secondary_stat", &query.secondary_stat)?;

        let min_primary = query.min_primary;
        let min_secondary = match query.min_secondary {
            Some(value) => value,
            None => self.indexes.stat_spread.median(secondary).unwrap_or_else(|| {
                warn!(stat = %secondary, "no median for stat, defaulting threshold to 0");
                0
            }),
        };

        let candidates = self.indexes.stats.iter().filter(|(name, stats)| {
            self.indexes
                .pokemon
                .get(name.as_str())
                .is_some_and(|record| query.filter.admits(record))
                && stats.get(primary) >= min_primary
                && stats.get(secondary) >= min_secondary
                && query.min_speed.map_or(true, |min| stats.speed >= min)
        });

        let ranked = rank_candidates(candidates, primary, secondary);
        if ranked.is_empty() {
            return Err(QueryError::NotFound(format!(
                "No Pokemon found with {primary} >= {min_primary} and {secondary} >= {min_secondary}"
            )));
        }

        info!(
            primary_stat = %primary,
            secondary_stat = %secondary,
            min_primary,
            min_secondary,
            min_speed = ?query.min_speed,
            count = ranked.len(),
            "found pokemon by stats"
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(attack: u32, speed: u32) -> StatRecord {
        StatRecord {
            hp: 50,
            attack,
            defense: 50,
            special_attack: 50,
            special_defense: 50,
            speed,
        }
    }

    #[test]
    fn score_weights_primary_over_secondary() {
        let s = stats(100, 50);
        let score = composite_score(&s, Stat::Attack, Stat::Speed);
        assert!((score - 85.0).abs() < 1e-9);
    }

    #[test]
    fn ranking_is_descending_and_stable_on_ties() {
        let names = ["a".to_string(), "b".to_string(), "c".to_string()];
        let records = [stats(100, 100), stats(150, 50), stats(100, 100)];
        let ranked = rank_candidates(names.iter().zip(records.iter()), Stat::Attack, Stat::Speed);

        let order: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn ranked_candidates_serialize_in_rank_order() {
        let names = ["slow".to_string(), "fast".to_string()];
        let records = [stats(80, 40), stats(90, 120)];
        let ranked = RankedCandidates(rank_candidates(
            names.iter().zip(records.iter()),
            Stat::Attack,
            Stat::Speed,
        ));

        let json = serde_json::to_string(&ranked).expect("serializes");
        let fast = json.find("\"fast\"").expect("fast present");
        let slow = json.find("\"slow\"").expect("slow present");
        assert!(fast < slow);
        assert!(json.contains("\"score\":"));
        assert!(json.contains("\"speed\":120"));
    }

    #[test]
    fn stat_names_are_validated() {
        assert!(matches!(
            parse_stat("primary_stat", ""),
            Err(QueryError::InvalidArgument(msg)) if msg.contains("cannot be empty")
        ));
        assert!(matches!(
            parse_stat("primary_stat", "special-attack"),
            Err(QueryError::InvalidArgument(msg)) if msg.contains("special_attack")
        ));
    }
}
