//! Traits the engine uses to talk to the outside world.

mod entities;
pub use entities::{EntityInfo, EntityProvider};

mod labels;
pub use labels::{CachedEntries, Entries, EntriesRef, LabelCache};

mod query;
pub use query::{Chunk, QueryProvider};
