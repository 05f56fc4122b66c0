//! Record types held by the indexes. Built once by the loader, never mutated.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Species info keyed by lowercase name in the pokemon-info index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub name: String,
    pub display_name: String,
    pub number: u32,
    /// Meters.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub sprite_url: String,
    pub description: String,
    pub genus: String,
    /// Slash-separated, e.g. `fire/flying`.
    pub type_display: String,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    #[serde(default)]
    pub is_ultra_beast: bool,
}

impl PokemonRecord {
    pub fn types(&self) -> Vec<String> {
        self.type_display
            .split('/')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// How a Pokémon acquires a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LearnMethod {
    LevelUp(u32),
    Machine,
    Egg,
    Tutor,
}

impl LearnMethod {
    pub const LEVEL_UP: &'static str = "level-up";
    pub const MACHINE: &'static str = "machine";
    pub const EGG: &'static str = "egg";
    pub const TUTOR: &'static str = "tutor";

    pub fn method_name(&self) -> &'static str {
        match self {
            Self::LevelUp(_) => Self::LEVEL_UP,
            Self::Machine => Self::MACHINE,
            Self::Egg => Self::EGG,
            Self::Tutor => Self::TUTOR,
        }
    }

    /// Flag-style methods carry no payload; `level-up` needs its level.
    pub fn from_parts(method: &str, level: Option<u32>) -> Option<Self> {
        match method {
            Self::LEVEL_UP => level.map(Self::LevelUp),
            Self::MACHINE => Some(Self::Machine),
            Self::EGG => Some(Self::Egg),
            Self::TUTOR => Some(Self::Tutor),
            _ => None,
        }
    }
}

/// Every way one Pokémon learns one move.
///
/// Serializes as `{"level-up": 36, "machine": true}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearnMethods(Vec<LearnMethod>);

impl LearnMethods {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second level-up entry replaces the first; flags are deduplicated.
    pub fn push(&mut self, method: LearnMethod) {
        if let Some(existing) = self
            .0
            .iter_mut()
            .find(|m| m.method_name() == method.method_name())
        {
            *existing = method;
        } else {
            self.0.push(method);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LearnMethod> {
        self.0.iter()
    }

    pub fn level(&self) -> Option<u32> {
        self.0.iter().find_map(|m| match m {
            LearnMethod::LevelUp(level) => Some(*level),
            _ => None,
        })
    }

    pub fn contains(&self, method: LearnMethod) -> bool {
        self.0.contains(&method)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<LearnMethod> for LearnMethods {
    fn from_iter<I: IntoIterator<Item = LearnMethod>>(iter: I) -> Self {
        let mut methods = Self::new();
        for method in iter {
            methods.push(method);
        }
        methods
    }
}

impl Serialize for LearnMethods {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for method in &self.0 {
            match method {
                LearnMethod::LevelUp(level) => map.serialize_entry(method.method_name(), level)?,
                _ => map.serialize_entry(method.method_name(), &true)?,
            }
        }
        map.end()
    }
}

/// The six base stats, named as they appear in queries and fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
        Stat::Speed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::SpecialAttack => "special_attack",
            Self::SpecialDefense => "special_defense",
            Self::Speed => "speed",
        }
    }

    /// Valid names in sorted order, for error messages.
    pub fn valid_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::ALL.iter().map(Stat::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stat::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl StatRecord {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpecialAttack => self.special_attack,
            Stat::SpecialDefense => self.special_defense,
            Stat::Speed => self.speed,
        }
    }
}

/// Percentile boundaries for one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quintiles {
    #[serde(rename = "20th")]
    pub p20: u32,
    #[serde(rename = "40th")]
    pub p40: u32,
    #[serde(rename = "60th")]
    pub p60: u32,
    #[serde(rename = "80th")]
    pub p80: u32,
    #[serde(rename = "100th")]
    pub p100: u32,
}

impl Quintiles {
    pub fn boundaries(&self) -> [u32; 5] {
        [self.p20, self.p40, self.p60, self.p80, self.p100]
    }

    pub fn is_ordered(&self) -> bool {
        self.boundaries().windows(2).all(|w| w[0] <= w[1])
    }
}

/// Quintile bucket a stat value falls into. 20th percentile boundary = D, up to 100th = S.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StatTier {
    D,
    C,
    B,
    A,
    S,
}

impl StatTier {
    const ORDER: [StatTier; 5] = [StatTier::D, StatTier::C, StatTier::B, StatTier::A, StatTier::S];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatSpreadSummary {
    pub medians: BTreeMap<Stat, u32>,
    pub quintiles: BTreeMap<Stat, Quintiles>,
}

impl StatSpreadSummary {
    pub fn median(&self, stat: Stat) -> Option<u32> {
        self.medians.get(&stat).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.medians.is_empty() && self.quintiles.is_empty()
    }

    pub fn tier(&self, stat: Stat, value: u32) -> Option<StatTier> {
        let quintiles = self.quintiles.get(&stat)?;
        let tier = quintiles
            .boundaries()
            .iter()
            .zip(StatTier::ORDER)
            .find(|(boundary, _)| value <= **boundary)
            .map(|(_, tier)| tier)
            .unwrap_or(StatTier::S);
        Some(tier)
    }
}

/// Attacking types grouped by how hard they hit one defending type.
/// Attackers in none of the sets are neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMatchup {
    #[serde(default)]
    pub double_damage_from: HashSet<String>,
    #[serde(default)]
    pub half_damage_from: HashSet<String>,
    #[serde(default)]
    pub no_damage_from: HashSet<String>,
}

impl TypeMatchup {
    /// Attacking types appearing in more than one category.
    pub fn overlapping(&self) -> Vec<String> {
        let mut overlaps: Vec<String> = self
            .double_damage_from
            .iter()
            .filter(|t| self.half_damage_from.contains(*t) || self.no_damage_from.contains(*t))
            .chain(
                self.half_damage_from
                    .iter()
                    .filter(|t| self.no_damage_from.contains(*t)),
            )
            .cloned()
            .collect();
        overlaps.sort();
        overlaps.dedup();
        overlaps
    }
}
