//! Recipe status engine: snapshot fetching, the shared status store and the
//! background refresh runner.
mod engine;
mod fetch;
mod store;
mod types;

pub use engine::EngineHandle;
pub use fetch::{FetchSettings, ReqwestFetcher, SnapshotFetcher, DEFAULT_SNAPSHOT_URL};
pub use store::StatusStore;
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, Published, RefreshOutcome,
};
