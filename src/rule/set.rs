use crate::error::DynException;
use crate::rule::ExceptionRule;

/// An ordered collection of [`ExceptionRule`]s.
///
/// Insertion order is significant: lookup scans rules first to last and
/// returns the first one that applies. The set is populated at startup
/// and its membership never changes while requests are in flight; lookups
/// are pure reads and safe to run concurrently.
#[derive(Debug, Default)]
pub struct ExceptionRuleSet {
    rules: Vec<ExceptionRule>,
}

impl ExceptionRuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Later rules only apply where every earlier rule
    /// for the same error type declined.
    pub fn push(&mut self, rule: ExceptionRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExceptionRule> {
        self.rules.iter()
    }

    /// Find the first rule that applies to the given error.
    ///
    /// A rule applies when the error's concrete type equals the rule's
    /// declared type (exact identity, never the source chain) and the
    /// rule's guard predicate, if any, returns true. Returns `None` when
    /// nothing applies; that is a normal outcome, not an error.
    pub fn find_match(&self, error: &DynException) -> Option<&ExceptionRule> {
        self.rules.iter().find(|rule| rule.matches(error))
    }
}

impl From<Vec<ExceptionRule>> for ExceptionRuleSet {
    fn from(rules: Vec<ExceptionRule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<ExceptionRule> for ExceptionRuleSet {
    fn from_iter<I: IntoIterator<Item = ExceptionRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
