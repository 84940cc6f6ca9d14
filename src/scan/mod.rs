//! Low-level scanning: pushback character source and the field tokenizer

mod source;
mod tokenizer;

pub use source::PushbackSource;
pub use tokenizer::{State, Tokenizer};
