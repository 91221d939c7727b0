pub mod category;
pub mod cave;
pub mod entry;
pub mod object_info;
pub mod spawn;

pub use category::Category;
pub use cave::{Cave, CaveKind, MusicType, RawGateEntry, RawObjectEntry, Sublevel, SublevelInfo};
pub use entry::{Aggregates, CategoryTotals, DerivedEntry, EntryId, EntrySource, MaxSpawns};
pub use object_info::{Burial, ObjectFlags, ObjectInfo, ObjectKind};
pub use spawn::{SpawnLocation, SpawnMethod};
