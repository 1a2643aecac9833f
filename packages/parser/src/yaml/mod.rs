//! YAML output for parsed documents.

mod writer;

pub use writer::{generate_question_yaml, generate_yaml, save_question_yaml, save_yaml};
