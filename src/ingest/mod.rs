pub mod tailer;

pub use tailer::{StartMode, TailEvent, spawn};
