//! capability tags attached to cell attributes and calculator registrations

use derive_more::{Deref, Into};
use std::collections::BTreeSet;
use std::fmt;

/// A small ordered set of string tokens such as `{"HCurl", "I1"}`.
///
/// Calculators are registered under a tag set and only answer attributes whose own
/// tag set contains every one of those tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deref, Into)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Into<String>>(&mut self, tag: T) -> bool {
        self.0.insert(tag.into())
    }

    /// true when every tag in `self` is also in `other`. The empty set is a subset of
    /// everything.
    pub fn is_subset(&self, other: &TagSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// parse a whitespace separated list of tags
    pub fn parse(tags: &str) -> Self {
        tags.split_whitespace().collect()
    }
}

impl<T: Into<String>> FromIterator<T> for TagSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        TagSet(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for TagSet {
    fn from(tags: [T; N]) -> Self {
        tags.into_iter().collect()
    }
}

/// space separated, in sorted order
impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tag in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(tag)?;
            first = false;
        }
        Ok(())
    }
}
