pub mod cli;
pub mod config;
pub mod data;
pub mod engine;
pub mod logging;
pub mod server;

pub use config::Settings;
pub use data::{load_dataset, IndexSet, LoadError};
pub use engine::{EngineInitError, QueryEngine, QueryError, QueryRequest, SpeciesFilter, StatQuery};
