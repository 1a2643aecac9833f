//! Matching member names against a roster.
//!
//! The parser only extracts names as printed. Resolving them to people is left
//! to a [`NameMatcher`], so the record store can plug in its own roster.

use std::collections::HashMap;

use crate::html::normalize_whitespace;

/// Honorific printed before English member names.
const HONORIFIC_E: &str = "Hon";

/// Honorific printed after Chinese member names.
const HONORIFIC_C: &str = "議員";

/// Resolve a printed name to a person.
///
/// Implementations are shared between batch workers, so lookups take `&self`.
pub trait NameMatcher: Send + Sync {
    /// The record a name resolves to.
    type Person;

    /// Find the person with the given name.
    fn match_name(&self, name: &str) -> Option<&Self::Person>;
}

/// Strip honorifics and surrounding whitespace from a member name.
///
/// # Examples
/// ```
/// use legcowatch_parser::matcher::clean_member_name;
///
/// assert_eq!(clean_member_name("the Hon Chan Kin-por"), "the Chan Kin-por");
/// assert_eq!(clean_member_name("Dr Hon Kwok Ka-ki "), "Dr Kwok Ka-ki");
/// assert_eq!(clean_member_name("梁國雄議員"), "梁國雄");
/// // Only the standalone honorific is removed
/// assert_eq!(clean_member_name("Hon Wong Hon-wah"), "Wong Hon-wah");
/// ```
#[must_use]
pub fn clean_member_name(raw_name: &str) -> String {
    let without_chinese = raw_name.replace(HONORIFIC_C, "");
    let words: Vec<&str> = without_chinese
        .split_whitespace()
        .filter(|word| *word != HONORIFIC_E)
        .collect();
    words.join(" ")
}

/// Lookup key: honorifics removed, case and whitespace folded.
fn match_key(name: &str) -> String {
    normalize_whitespace(&clean_member_name(name)).to_lowercase()
}

/// In-memory matcher over a fixed roster.
///
/// Names are compared exactly after honorifics are removed and case and
/// whitespace are folded. Each person may be known under several names, such
/// as an English and a Chinese one.
#[derive(Debug, Clone)]
pub struct RosterMatcher<P> {
    people: Vec<P>,
    index: HashMap<String, usize>,
}

impl<P> Default for RosterMatcher<P> {
    fn default() -> Self {
        Self {
            people: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<P> RosterMatcher<P> {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a person known under the given names.
    ///
    /// A name already in the roster is reassigned to the new person.
    pub fn add<I, S>(&mut self, person: P, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let position = self.people.len();
        self.people.push(person);
        for name in names {
            let key = match_key(name.as_ref());
            if key.is_empty() {
                continue;
            }
            if self.index.insert(key, position).is_some() {
                tracing::debug!(name = %name.as_ref(), "Name reassigned in roster");
            }
        }
    }

    /// Number of people in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Check whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl<P: Send + Sync> NameMatcher for RosterMatcher<P> {
    type Person = P;

    fn match_name(&self, name: &str) -> Option<&P> {
        let position = self.index.get(&match_key(name))?;
        self.people.get(*position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> RosterMatcher<u32> {
        let mut roster = RosterMatcher::new();
        roster.add(1, ["Chan Kin-por", "陳健波"]);
        roster.add(2, ["Leung Kwok-hung", "梁國雄"]);
        roster
    }

    #[test]
    fn test_clean_member_name() {
        assert_eq!(clean_member_name("Hon Chan Kin-por"), "Chan Kin-por");
        assert_eq!(clean_member_name("  陳健波議員 "), "陳健波");
        assert_eq!(clean_member_name("Hon"), "");
    }

    #[test]
    fn test_match_name() {
        let roster = roster();
        assert_eq!(roster.match_name("Hon Chan Kin-por"), Some(&1));
        assert_eq!(roster.match_name("chan  kin-por"), Some(&1));
        assert_eq!(roster.match_name("梁國雄議員"), Some(&2));
        assert_eq!(roster.match_name("Someone Else"), None);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_matcher_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RosterMatcher<String>>();
    }

    #[test]
    fn test_empty_names_are_ignored() {
        let mut roster = RosterMatcher::new();
        roster.add("x", ["Hon", ""]);
        assert_eq!(roster.match_name(""), None);
        assert!(!roster.is_empty());
    }
}
