use crate::data::PokemonRecord;

/// Which special species a query may return. Everything defaults to excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeciesFilter {
    pub include_legendary: bool,
    pub include_mythical: bool,
    pub include_ultra_beast: bool,
}

impl SpeciesFilter {
    pub fn new(include_legendary: bool, include_mythical: bool, include_ultra_beast: bool) -> Self {
        Self {
            include_legendary,
            include_mythical,
            include_ultra_beast,
        }
    }

    pub fn include_all() -> Self {
        Self::new(true, true, true)
    }

    /// Each flag independently lifts the exclusion of its species class.
    pub fn admits_flags(&self, is_legendary: bool, is_mythical: bool, is_ultra_beast: bool) -> bool {
        (self.include_legendary || !is_legendary)
            && (self.include_mythical || !is_mythical)
            && (self.include_ultra_beast || !is_ultra_beast)
    }

    pub fn admits(&self, record: &PokemonRecord) -> bool {
        self.admits_flags(record.is_legendary, record.is_mythical, record.is_ultra_beast)
    }
}
