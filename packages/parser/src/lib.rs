//! LegCo Watch Parser - Parse Legislative Council agendas and questions.
//!
//! This crate turns converted council agendas and individual question
//! documents, in English and Chinese, into structured records ready to be
//! stored or written as YAML.
//!
//! # Example
//!
//! ```
//! use legcowatch_parser::{parse_agenda, Language};
//!
//! let agenda = parse_agenda(
//!     "council_agenda-20131009-e",
//!     "<p>I. Questions</p>\
//!      <p>1. Hon Chan Kin-por to ask:</p><p>Will the Government inform this Council?</p>\
//!      <p>Public Officer to reply : Secretary for Security</p>",
//! )
//! .unwrap();
//!
//! assert_eq!(agenda.language, Language::English);
//! let questions = agenda.questions.unwrap();
//! assert_eq!(questions[0].asker.as_deref(), Some("Chan Kin-por"));
//! assert_eq!(questions[0].replier.as_deref(), Some("Secretary for Security"));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, patterns and input validation
//! - [`types`]: Core data types (Question, TabledPaper, etc.)
//! - [`error`]: Error types and Result alias
//! - [`html`]: Markup normalization and element helpers
//! - [`grouper`]: Fixed-size grouping of rows
//! - [`agenda`]: Agenda segmentation and section parsers
//! - [`question`]: Single question documents
//! - [`listing`]: Question listing entries and cross-checks
//! - [`matcher`]: Member name matching
//! - [`convert`]: Source document conversion
//! - [`batch`]: Parsing many agendas at once
//! - [`yaml`]: YAML output generation
//! - [`cli`]: Command-line interface

pub mod agenda;
pub mod batch;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod grouper;
pub mod html;
pub mod listing;
pub mod matcher;
pub mod question;
pub mod types;
pub mod yaml;

// Re-export main functions
pub use agenda::{parse_agenda, Agenda};
pub use question::{parse_question_document, SingleQuestion};

// Re-export commonly used items
pub use config::{validate_date, validate_uid};
pub use error::{ParserError, Result};
pub use types::{Language, Question, QuestionType, SectionKey, TabledPaper};
