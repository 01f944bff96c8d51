pub mod field;
pub mod record;
pub mod search;

pub use field::{FieldPolicy, PolicyError, RecordField};
pub use record::{FetchOutcome, RelatedEntry, SenseRecord};
pub use search::{ContentOrigin, EntryKind, MatchMode, SearchQuery};
