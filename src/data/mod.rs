pub mod indexes;
pub mod loader;
pub mod model;
pub mod validate;

pub use indexes::{
    IndexKind, IndexSet, MachineMoveIndex, MoveIndex, PokemonIndex, StatIndex, TypeIndex,
    TypeMatchupIndex,
};
pub use loader::{load_configured, load_dataset, LoadError};
pub use model::{
    LearnMethod, LearnMethods, PokemonRecord, Quintiles, Stat, StatRecord, StatSpreadSummary,
    StatTier, TypeMatchup,
};
pub use validate::{validate_indexes, ValidationReport, ValidationSeverity};
