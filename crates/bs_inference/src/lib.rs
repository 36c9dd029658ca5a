pub mod engine;
pub mod preprocess;

pub use engine::{analyze, sniff_format};
