use regex::RegexSet;

/// Decides whether a request path bypasses the gate entirely.
pub trait ExemptionMatcher: Send + Sync {
    fn is_exempt(&self, path: &str) -> bool;
}

/// Exemptions from configured regular expressions; any match exempts.
#[derive(Debug, Clone)]
pub struct ExemptPaths(RegexSet);

impl ExemptPaths {
    pub fn new(patterns: RegexSet) -> Self {
        Self(patterns)
    }

    pub fn none() -> Self {
        Self(RegexSet::empty())
    }
}

impl ExemptionMatcher for ExemptPaths {
    fn is_exempt(&self, path: &str) -> bool {
        self.0.is_match(path)
    }
}

impl<F> ExemptionMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_exempt(&self, path: &str) -> bool {
        self(path)
    }
}
