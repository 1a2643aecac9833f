//! Per-document state threaded through the section parsers.

use crate::types::Language;

/// Context passed through agenda parsing operations.
///
/// Collects the non-fatal problems found while parsing one document, so they
/// end up on the parsed record as well as in the log.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Uid of the document being parsed.
    pub uid: String,

    /// Language encoded in the uid.
    pub language: Language,

    warnings: Vec<String>,
}

impl ParseContext {
    /// Create a new parse context.
    #[must_use]
    pub fn new(uid: impl Into<String>, language: Language) -> Self {
        Self {
            uid: uid.into(),
            language,
            warnings: Vec::new(),
        }
    }

    /// Record a non-fatal problem and log it at warning level.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(uid = %self.uid, "{message}");
        self.warnings.push(message);
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take ownership of the recorded warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_are_collected_in_order() {
        let mut ctx = ParseContext::new("council_agenda-20131009-e", Language::English);
        ctx.warn("first");
        ctx.warn(String::from("second"));
        assert_eq!(ctx.warnings(), &["first", "second"]);
        assert_eq!(ctx.into_warnings().len(), 2);
    }
}
