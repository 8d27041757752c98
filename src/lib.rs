pub mod ingest;
pub mod interactive;
pub mod logging;
pub mod query;
pub mod store;

pub use ingest::{StartMode, TailEvent};
pub use interactive::InteractiveViewer;
pub use query::{Matcher, QueryEngine};
pub use store::{EntryStore, LogEntry};
