//! Read-only index set loaded once at startup.
//! Built by the loader (or by hand in tests) and moved into the query engine.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::data::model::{LearnMethods, PokemonRecord, StatRecord, StatSpreadSummary, TypeMatchup};

/// Pokémon name -> info record.
pub type PokemonIndex = HashMap<String, PokemonRecord>;
/// Move name -> (Pokémon name -> learn methods).
pub type MoveIndex = HashMap<String, BTreeMap<String, LearnMethods>>;
/// Pokémon name -> base stats. Ordered so ranking ties resolve the same way every run.
pub type StatIndex = BTreeMap<String, StatRecord>;
/// Type name -> names of Pokémon with that type.
pub type TypeIndex = HashMap<String, HashSet<String>>;
/// Defending type -> damage categories.
pub type TypeMatchupIndex = HashMap<String, TypeMatchup>;
/// Move name -> TM/HM id.
pub type MachineMoveIndex = HashMap<String, String>;

/// The six required indexes, named for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Pokemon,
    Move,
    Stat,
    StatSpread,
    Type,
    TypeMatchup,
}

impl IndexKind {
    pub const REQUIRED: [IndexKind; 6] = [
        IndexKind::Pokemon,
        IndexKind::Move,
        IndexKind::Stat,
        IndexKind::StatSpread,
        IndexKind::Type,
        IndexKind::TypeMatchup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pokemon => "pokemon",
            Self::Move => "move",
            Self::Stat => "stat",
            Self::StatSpread => "stat spread",
            Self::Type => "type",
            Self::TypeMatchup => "type matchup",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexSet {
    pub pokemon: PokemonIndex,
    pub moves: MoveIndex,
    pub stats: StatIndex,
    pub stat_spread: StatSpreadSummary,
    pub types: TypeIndex,
    pub type_matchups: TypeMatchupIndex,
    /// Optional; an empty map only means no machine data was shipped.
    pub machine_moves: MachineMoveIndex,
}

impl IndexSet {
    pub fn pokemon_index(&self) -> &PokemonIndex {
        &self.pokemon
    }

    pub fn move_index(&self) -> &MoveIndex {
        &self.moves
    }

    pub fn stat_index(&self) -> &StatIndex {
        &self.stats
    }

    pub fn stat_spread_index(&self) -> &StatSpreadSummary {
        &self.stat_spread
    }

    pub fn type_index(&self) -> &TypeIndex {
        &self.types
    }

    pub fn type_matchup_index(&self) -> &TypeMatchupIndex {
        &self.type_matchups
    }

    pub fn machine_moves_index(&self) -> &MachineMoveIndex {
        &self.machine_moves
    }

    pub fn is_empty(&self, kind: IndexKind) -> bool {
        match kind {
            IndexKind::Pokemon => self.pokemon.is_empty(),
            IndexKind::Move => self.moves.is_empty(),
            IndexKind::Stat => self.stats.is_empty(),
            IndexKind::StatSpread => self.stat_spread.is_empty(),
            IndexKind::Type => self.types.is_empty(),
            IndexKind::TypeMatchup => self.type_matchups.is_empty(),
        }
    }

    /// First required index that is empty, in load order.
    pub fn first_empty(&self) -> Option<IndexKind> {
        IndexKind::REQUIRED
            .into_iter()
            .find(|kind| self.is_empty(*kind))
    }

    pub fn len(&self, kind: IndexKind) -> usize {
        match kind {
            IndexKind::Pokemon => self.pokemon.len(),
            IndexKind::Move => self.moves.len(),
            IndexKind::Stat => self.stats.len(),
            IndexKind::StatSpread => self.stat_spread.medians.len(),
            IndexKind::Type => self.types.len(),
            IndexKind::TypeMatchup => self.type_matchups.len(),
        }
    }
}
