pub mod engine;
pub mod matcher;
pub mod regex_cache;

pub use engine::{CompileResult, EvalResult, QueryEngine};
pub use matcher::Matcher;
