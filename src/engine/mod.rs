//! In-memory query engine over a loaded [`IndexSet`].
//!
//! The engine owns its indexes and never mutates them, so a single instance
//! can be shared across threads behind an `Arc` with no locking.

pub mod error;
pub mod filter;
pub mod matchup;
pub mod ranking;
pub mod request;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::data::{IndexSet, LearnMethods, PokemonRecord, Stat, StatRecord, StatTier};

pub use error::{EngineInitError, QueryError, QueryResult};
pub use filter::SpeciesFilter;
pub use matchup::{EffectivenessBucket, TypeEffectiveness};
pub use ranking::{RankedCandidate, RankedCandidates, StatQuery};
pub use request::{MoveLearners, PokemonInfo, QueryOutcome, QueryRequest, TypeMembers};

pub const MAX_TYPES: usize = 2;

/// Split a hyphenated combo such as `fire-flying` into its type names.
/// A blank combo yields no types; empty segments inside a combo are kept
/// so type validation reports them.
pub fn split_type_combo(combo: &str) -> Vec<String> {
    if combo.trim().is_empty() {
        return Vec::new();
    }
    combo
        .split('-')
        .map(|t| t.trim().to_lowercase())
        .collect()
}

/// Shared checks for the one-or-two type operations: count first, then membership.
pub(crate) fn check_type_list<V>(types: &[&str], known: &HashMap<String, V>) -> QueryResult<()> {
    if types.is_empty() {
        return Err(QueryError::InvalidArgument(
            "At least one Pokemon type must be provided".to_string(),
        ));
    }
    if types.len() > MAX_TYPES {
        return Err(QueryError::TooManyTypes(
            types.iter().map(|t| t.to_string()).collect(),
        ));
    }

    let invalid: Vec<String> = types
        .iter()
        .filter(|t| !known.contains_key(**t))
        .map(|t| t.to_string())
        .collect();
    if !invalid.is_empty() {
        let mut valid: Vec<String> = known.keys().cloned().collect();
        valid.sort();
        return Err(QueryError::InvalidType { invalid, valid });
    }
    Ok(())
}

/// One stat value with its quintile tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TieredStat {
    pub value: u32,
    pub tier: Option<StatTier>,
}

/// Base stats of one Pokémon placed against the population quintiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatProfile {
    pub name: String,
    pub total: u32,
    pub stats: BTreeMap<Stat, TieredStat>,
}

#[derive(Debug, Clone)]
pub struct QueryEngine {
    indexes: IndexSet,
}

impl QueryEngine {
    /// Take ownership of a loaded index set. Any empty required index is a load failure.
    pub fn new(indexes: IndexSet) -> Result<Self, EngineInitError> {
        if let Some(kind) = indexes.first_empty() {
            error!(index = %kind, "repository returned empty index");
            return Err(EngineInitError::EmptyIndex(kind));
        }
        info!(
            pokemon = indexes.pokemon.len(),
            moves = indexes.moves.len(),
            types = indexes.types.len(),
            "query engine ready"
        );
        Ok(Self { indexes })
    }

    pub fn indexes(&self) -> &IndexSet {
        &self.indexes
    }

    pub fn lookup_by_name(&self, name: &str) -> QueryResult<&PokemonRecord> {
        debug!(name, "looking up pokemon");
        if name.is_empty() {
            return Err(QueryError::InvalidArgument(
                "Pokemon name must be provided".to_string(),
            ));
        }
        self.indexes
            .pokemon
            .get(name)
            .ok_or_else(|| QueryError::NotFound(format!("Pokemon '{name}' not found")))
    }

    /// Learners of `move_name` admitted by `filter`. An empty map is a valid result.
    pub fn find_by_move(
        &self,
        move_name: &str,
        filter: SpeciesFilter,
    ) -> QueryResult<BTreeMap<&str, &LearnMethods>> {
        debug!(move_name, filter = ?filter, "searching pokemon by move");
        if move_name.is_empty() {
            return Err(QueryError::InvalidArgument(
                "Move name must be provided".to_string(),
            ));
        }
        let learners = self
            .indexes
            .moves
            .get(move_name)
            .ok_or_else(|| QueryError::InvalidMove(move_name.to_string()))?;

        let found: BTreeMap<&str, &LearnMethods> = learners
            .iter()
            .filter(|(name, _)| self.admits(name, filter))
            .map(|(name, methods)| (name.as_str(), methods))
            .collect();

        info!(move_name, filter = ?filter, count = found.len(), "found pokemon by move");
        Ok(found)
    }

    /// Pokémon carrying every listed type, admitted by `filter`.
    /// Unlike move search, an empty result at either stage is `NotFound`.
    pub fn find_by_type<S: AsRef<str>>(
        &self,
        types: &[S],
        filter: SpeciesFilter,
    ) -> QueryResult<BTreeSet<&str>> {
        let types: Vec<&str> = types.iter().map(AsRef::as_ref).collect();
        debug!(types = ?types, filter = ?filter, "searching pokemon by type");
        check_type_list(&types, &self.indexes.types)?;

        let sets: Vec<&HashSet<String>> = types
            .iter()
            .filter_map(|t| self.indexes.types.get(*t))
            .collect();
        let intersection: Vec<&str> = match sets.split_first() {
            Some((first, rest)) => first
                .iter()
                .filter(|name| rest.iter().all(|set| set.contains(*name)))
                .map(String::as_str)
                .collect(),
            None => Vec::new(),
        };

        if intersection.is_empty() {
            return Err(QueryError::NotFound(format!(
                "No Pokemon found with type(s): {types:?}"
            )));
        }

        let filtered: BTreeSet<&str> = intersection
            .into_iter()
            .filter(|name| self.admits(name, filter))
            .collect();

        if filtered.is_empty() {
            return Err(QueryError::NotFound(format!(
                "No Pokemon found with type(s) {types:?} after filtering legendary/mythical"
            )));
        }

        info!(types = ?types, filter = ?filter, count = filtered.len(), "found pokemon by type");
        Ok(filtered)
    }

    /// TM/HM id teaching `move_name`, if the dataset ships machine data for it.
    pub fn machine_for_move(&self, move_name: &str) -> Option<&str> {
        self.indexes.machine_moves.get(move_name).map(String::as_str)
    }

    pub fn stat_profile(&self, name: &str) -> QueryResult<StatProfile> {
        debug!(name, "building stat profile");
        let record = self.lookup_by_name(name)?;
        let stats: &StatRecord = self
            .indexes
            .stats
            .get(&record.name)
            .ok_or_else(|| QueryError::NotFound(format!("No stats recorded for '{name}'")))?;

        let tiered = Stat::ALL
            .into_iter()
            .map(|stat| {
                let value = stats.get(stat);
                let tier = self.indexes.stat_spread.tier(stat, value);
                (stat, TieredStat { value, tier })
            })
            .collect();
        let total = Stat::ALL.into_iter().map(|stat| stats.get(stat)).sum();

        Ok(StatProfile {
            name: record.name.clone(),
            total,
            stats: tiered,
        })
    }

    /// Species filter over a name. Names with no info record are excluded.
    fn admits(&self, name: &str, filter: SpeciesFilter) -> bool {
        match self.indexes.pokemon.get(name) {
            Some(record) => filter.admits(record),
            None => {
                warn!(name, "pokemon missing from info index, skipping");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_combo_splits_on_hyphen() {
        assert_eq!(split_type_combo("fire-flying"), vec!["fire", "flying"]);
        assert_eq!(split_type_combo("Water"), vec!["water"]);
        assert!(split_type_combo("").is_empty());
        assert!(split_type_combo("  ").is_empty());
        assert_eq!(split_type_combo("a-b-c").len(), 3);
        assert_eq!(split_type_combo("fire-"), vec!["fire", ""]);
        assert_eq!(split_type_combo("-fire"), vec!["", "fire"]);
    }

    #[test]
    fn type_list_checks_count_before_membership() {
        let mut known: HashMap<String, ()> = HashMap::new();
        known.insert("fire".to_string(), ());
        known.insert("water".to_string(), ());

        assert!(matches!(
            check_type_list(&[], &known),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            check_type_list(&["x", "y", "z"], &known),
            Err(QueryError::TooManyTypes(types)) if types.len() == 3
        ));
        match check_type_list(&["fire", "ice"], &known) {
            Err(QueryError::InvalidType { invalid, valid }) => {
                assert_eq!(invalid, vec!["ice".to_string()]);
                assert_eq!(valid, vec!["fire".to_string(), "water".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(check_type_list(&["water", "fire"], &known).is_ok());
    }

    #[test]
    fn empty_index_set_is_rejected() {
        let err = QueryEngine::new(IndexSet::default()).expect_err("empty set");
        assert_eq!(err.to_string(), "Repository returned empty pokemon index");
    }
}
