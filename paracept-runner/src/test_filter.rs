// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filtering tests before they are split into groups.
//!
//! Filters are applied in the order they were added to a [`FilterChain`]: the output of one filter
//! is the input of the next. A [`DefaultFilter`] always sits at the base of the chain.

use crate::{
    errors::{GroupFilterError, GroupFilterKind},
    test_id::{TestId, TestSource},
};
use indexmap::IndexSet;
use smol_str::SmolStr;
use tracing::debug;

/// A stage in a [`FilterChain`].
pub trait Filter {
    /// A short name for this filter, used in logs.
    fn name(&self) -> &'static str;

    /// Sets the tests this filter operates on.
    fn set_tests(&mut self, tests: Vec<TestId>);

    /// Returns the tests that pass this filter, in their original order.
    fn filter(&self, source: &dyn TestSource) -> Vec<TestId>;
}

/// A filter that lets every test through.
#[derive(Clone, Debug, Default)]
pub struct DefaultFilter {
    tests: Vec<TestId>,
}

impl Filter for DefaultFilter {
    fn name(&self) -> &'static str {
        "default"
    }

    fn set_tests(&mut self, tests: Vec<TestId>) {
        self.tests = tests;
    }

    fn filter(&self, _source: &dyn TestSource) -> Vec<TestId> {
        self.tests.clone()
    }
}

/// A filter that selects tests by their group tags.
///
/// * If any groups are excluded, a test carrying *all* of them is dropped.
/// * If any groups are included, a test must carry *all* of them to be kept.
///
/// A group can't be both included and excluded.
#[derive(Clone, Debug, Default)]
pub struct GroupFilter {
    tests: Vec<TestId>,
    included: IndexSet<SmolStr>,
    excluded: IndexSet<SmolStr>,
}

impl GroupFilter {
    /// Creates a new `GroupFilter` with no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires tests to carry this group. Adding the same group twice is a no-op.
    pub fn include_group(
        &mut self,
        group: impl Into<SmolStr>,
    ) -> Result<&mut Self, GroupFilterError> {
        let group = group.into();
        if self.excluded.contains(&group) {
            return Err(GroupFilterError::new(group, GroupFilterKind::Include));
        }
        self.included.insert(group);
        Ok(self)
    }

    /// Calls [`Self::include_group`] for each group.
    pub fn include_groups(
        &mut self,
        groups: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> Result<&mut Self, GroupFilterError> {
        for group in groups {
            self.include_group(group)?;
        }
        Ok(self)
    }

    /// Drops tests carrying this group. Adding the same group twice is a no-op.
    pub fn exclude_group(
        &mut self,
        group: impl Into<SmolStr>,
    ) -> Result<&mut Self, GroupFilterError> {
        let group = group.into();
        if self.included.contains(&group) {
            return Err(GroupFilterError::new(group, GroupFilterKind::Exclude));
        }
        self.excluded.insert(group);
        Ok(self)
    }

    /// Calls [`Self::exclude_group`] for each group.
    pub fn exclude_groups(
        &mut self,
        groups: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> Result<&mut Self, GroupFilterError> {
        for group in groups {
            self.exclude_group(group)?;
        }
        Ok(self)
    }

    /// The included groups, in the order they were added.
    pub fn included_groups(&self) -> impl Iterator<Item = &str> + '_ {
        self.included.iter().map(|group| group.as_str())
    }

    /// The excluded groups, in the order they were added.
    pub fn excluded_groups(&self) -> impl Iterator<Item = &str> + '_ {
        self.excluded.iter().map(|group| group.as_str())
    }

    /// Clears both the included and the excluded groups. The registered tests are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.reset_included();
        self.reset_excluded();
        self
    }

    /// Clears the included groups.
    pub fn reset_included(&mut self) -> &mut Self {
        self.included.clear();
        self
    }

    /// Clears the excluded groups.
    pub fn reset_excluded(&mut self) -> &mut Self {
        self.excluded.clear();
        self
    }

    fn is_match(&self, tags: &[SmolStr]) -> bool {
        let has_all = |groups: &IndexSet<SmolStr>| groups.iter().all(|group| tags.contains(group));

        if !self.excluded.is_empty() && has_all(&self.excluded) {
            return false;
        }
        if !self.included.is_empty() && !has_all(&self.included) {
            return false;
        }
        true
    }
}

impl Filter for GroupFilter {
    fn name(&self) -> &'static str {
        "group"
    }

    fn set_tests(&mut self, tests: Vec<TestId>) {
        self.tests = tests;
    }

    fn filter(&self, source: &dyn TestSource) -> Vec<TestId> {
        self.tests
            .iter()
            .filter(|id| self.is_match(source.tags(id)))
            .cloned()
            .collect()
    }
}

/// An ordered list of filters.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates a new chain containing only a [`DefaultFilter`].
    pub fn new() -> Self {
        Self {
            filters: vec![Box::new(DefaultFilter::default())],
        }
    }

    /// Appends a filter to the end of the chain.
    pub fn add_filter(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Returns the number of filters, including the default one.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Always false: the default filter is always present.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Runs every test from the source through the chain.
    pub fn apply(&mut self, source: &dyn TestSource) -> Vec<TestId> {
        let mut tests = source.test_ids();
        for filter in &mut self.filters {
            let before = tests.len();
            filter.set_tests(tests);
            tests = filter.filter(source);
            debug!(
                "{} filter kept {} of {before} tests",
                filter.name(),
                tests.len()
            );
        }
        tests
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_id::TestManifest;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn manifest() -> TestManifest {
        let mut manifest = TestManifest::new();
        manifest
            .add_test("a:foo_bar", ["foo", "bar"], Vec::<&str>::new())
            .add_test("a:foo", ["foo"], Vec::<&str>::new())
            .add_test("a:bar_baz", ["bar", "baz"], Vec::<&str>::new())
            .add_test("a:none", Vec::<&str>::new(), Vec::<&str>::new());
        manifest
    }

    fn run(filter: GroupFilter) -> Vec<String> {
        let mut chain = FilterChain::new();
        chain.add_filter(filter);
        chain
            .apply(&manifest())
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test_case(&["foo"], &[], &["a:foo_bar", "a:foo"]; "include one")]
    #[test_case(&["foo", "bar"], &[], &["a:foo_bar"]; "include is AND")]
    #[test_case(&["foo", "baz"], &[], &[]; "include with no match")]
    #[test_case(&[], &["bar"], &["a:foo", "a:none"]; "exclude one")]
    #[test_case(&[], &["bar", "baz"], &["a:foo_bar", "a:foo", "a:none"]; "exclude needs all")]
    #[test_case(&["bar"], &["baz"], &["a:foo_bar"]; "include and exclude")]
    #[test_case(&[], &[], &["a:foo_bar", "a:foo", "a:bar_baz", "a:none"]; "no groups")]
    fn group_filter(include: &[&str], exclude: &[&str], expected: &[&str]) {
        let mut filter = GroupFilter::new();
        filter
            .include_groups(include.iter().copied())
            .expect("include succeeds");
        filter
            .exclude_groups(exclude.iter().copied())
            .expect("exclude succeeds");
        assert_eq!(run(filter), expected);
    }

    #[test]
    fn include_then_exclude_conflicts() {
        let mut filter = GroupFilter::new();
        filter.include_group("foo").expect("include succeeds");
        let err = filter.exclude_group("foo").expect_err("conflict");
        assert_eq!(err.tag(), "foo");

        let mut filter = GroupFilter::new();
        filter.exclude_group("foo").expect("exclude succeeds");
        let err = filter.include_group("foo").expect_err("conflict");
        assert_eq!(err.tag(), "foo");
    }

    #[test]
    fn duplicates_and_reset() {
        let mut filter = GroupFilter::new();
        filter
            .include_groups(["foo", "foo", "Foo"])
            .expect("include succeeds");
        filter.exclude_group("baz").expect("exclude succeeds");
        assert_eq!(filter.included_groups().collect::<Vec<_>>(), ["foo", "Foo"]);

        filter.reset_included();
        assert_eq!(filter.included_groups().count(), 0);
        assert_eq!(filter.excluded_groups().collect::<Vec<_>>(), ["baz"]);

        filter.include_group("bar").expect("include succeeds");
        filter.reset();
        assert_eq!(filter.included_groups().count(), 0);
        assert_eq!(filter.excluded_groups().count(), 0);

        // Once reset, a previously excluded group can be included.
        filter.include_group("baz").expect("include succeeds");
    }

    #[test]
    fn reset_keeps_registered_tests() {
        let source = manifest();
        let mut filter = GroupFilter::new();
        filter.set_tests(source.test_ids());
        filter.include_group("baz").expect("include succeeds");
        assert_eq!(filter.filter(&source), vec![TestId::from("a:bar_baz")]);

        filter.reset();
        assert_eq!(filter.filter(&source), source.test_ids());
    }

    #[test]
    fn chain_runs_in_order() {
        let mut first = GroupFilter::new();
        first.include_group("bar").expect("include succeeds");
        let mut second = GroupFilter::new();
        second.exclude_group("baz").expect("exclude succeeds");

        let mut chain = FilterChain::new();
        chain.add_filter(first).add_filter(second);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.apply(&manifest()), vec![TestId::from("a:foo_bar")]);
    }
}
