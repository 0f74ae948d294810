// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support for partitioning tests into groups that run on several machines.
//!
//! Three strategies are supported:
//!
//! * round-robin, which ignores dependencies;
//! * dependency-aware packing, which takes tests in resolved order and only starts a new group
//!   where doing so doesn't separate a test from its dependencies;
//! * time-weighted, which greedily balances historical durations (longest first) and ignores
//!   dependencies.
//!
//! Every strategy produces exactly as many groups as requested, some possibly empty.

use crate::{
    errors::GroupCountParseError,
    resolver::ResolvedTests,
    test_id::TestId,
    time_report::TimeReport,
};
use std::{collections::HashMap, fmt, num::NonZeroUsize, str::FromStr};

/// The number of groups to split tests into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GroupCount(NonZeroUsize);

impl GroupCount {
    /// Creates a new `GroupCount`.
    pub fn new(count: NonZeroUsize) -> Self {
        Self(count)
    }

    /// Returns the number of groups.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for GroupCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupCount {
    type Err = GroupCountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count: usize = s
            .trim()
            .parse()
            .map_err(|err| GroupCountParseError::new(s, format!("{err}")))?;
        let count = NonZeroUsize::new(count)
            .ok_or_else(|| GroupCountParseError::new(s, "at least one group is required"))?;
        Ok(Self(count))
    }
}

/// A single group of tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    tests: Vec<TestId>,
    expected_time: Option<f64>,
}

impl Group {
    /// The tests in this group, in run order.
    pub fn tests(&self) -> &[TestId] {
        &self.tests
    }

    /// The sum of historical times for this group, if it was built from a time report.
    pub fn expected_time(&self) -> Option<f64> {
        self.expected_time
    }

    /// The number of tests in this group.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true if this group has no tests.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// The result of partitioning: exactly one [`Group`] per requested group, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Groups {
    groups: Vec<Group>,
}

impl Groups {
    fn empty(count: GroupCount) -> Self {
        Self {
            groups: vec![Group::default(); count.get()],
        }
    }

    /// Iterates over the groups in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Group> + '_ {
        self.groups.iter()
    }

    /// The number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false: there is at least one group.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The total number of tests across all groups.
    pub fn test_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Returns the test identifiers in each group.
    pub fn to_test_lists(&self) -> Vec<Vec<TestId>> {
        self.groups.iter().map(|group| group.tests.clone()).collect()
    }
}

/// Splits tests by count.
#[derive(Clone, Copy, Debug)]
pub struct GroupPartitioner {
    count: GroupCount,
}

impl GroupPartitioner {
    /// Creates a new partitioner producing `count` groups.
    pub fn new(count: GroupCount) -> Self {
        Self { count }
    }

    /// Deals tests out one at a time: test `i` lands in group `i mod N`.
    pub fn round_robin(&self, tests: &[TestId]) -> Groups {
        let mut groups = Groups::empty(self.count);
        for (i, test) in tests.iter().enumerate() {
            groups.groups[i % self.count.get()].tests.push(test.clone());
        }
        groups
    }

    /// Packs resolved tests into contiguous groups of about `total / N` tests each.
    ///
    /// A new group is started only when the current one is non-empty and has reached the target
    /// size, there are groups left, and no dependency edge crosses the cut. The last group takes
    /// whatever remains. Each test therefore shares a group with everything it depends on, and
    /// comes after it.
    pub fn pack(&self, resolved: &ResolvedTests) -> Groups {
        let order = resolved.order();
        let count = self.count.get();
        let target = (order.len() as f64 / count as f64).round() as usize;

        let safe_cuts = safe_cuts(resolved);

        let mut groups = Groups::empty(self.count);
        let mut current = 0;
        for (i, test) in order.iter().enumerate() {
            let group = &groups.groups[current];
            if !group.is_empty() && group.len() >= target && current + 1 < count && safe_cuts[i] {
                current += 1;
            }
            groups.groups[current].tests.push(test.clone());
        }
        groups
    }
}

/// For each position `i` in the run order, whether the tests before `i` can go in a different
/// group from the tests at and after `i` without separating a dependency edge.
fn safe_cuts(resolved: &ResolvedTests) -> Vec<bool> {
    let order = resolved.order();
    let positions: HashMap<&TestId, usize> =
        order.iter().enumerate().map(|(i, id)| (id, i)).collect();

    // crossing[p] is the number of edges whose dependency is before p and whose dependent is at
    // or after p.
    let mut crossing = vec![0i64; order.len() + 1];
    for (test, dep) in resolved.graph().edges() {
        let (Some(&test_pos), Some(&dep_pos)) = (positions.get(test), positions.get(dep)) else {
            continue;
        };
        crossing[dep_pos + 1] += 1;
        crossing[test_pos + 1] -= 1;
    }

    let mut running = 0i64;
    crossing
        .iter()
        .take(order.len())
        .map(|delta| {
            running += *delta;
            running == 0
        })
        .collect()
}

/// Splits tests by historical duration.
#[derive(Clone, Copy, Debug)]
pub struct TimeWeightedPartitioner {
    count: GroupCount,
}

impl TimeWeightedPartitioner {
    /// Creates a new partitioner producing `count` groups.
    pub fn new(count: GroupCount) -> Self {
        Self { count }
    }

    /// Assigns tests, slowest first, to whichever group currently has the smallest total time.
    ///
    /// Tests missing from the report count as taking no time. Ties in time keep input order, and
    /// ties in group totals go to the lowest-numbered group.
    pub fn partition(&self, tests: &[TestId], report: &TimeReport) -> Groups {
        let mut timed: Vec<(&TestId, f64)> = tests.iter().map(|id| (id, report.get(id))).collect();
        // sort_by is stable, so equal times keep their input order.
        timed.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        let mut groups = Groups::empty(self.count);
        let mut totals = vec![0.0f64; self.count.get()];
        for (id, time) in timed {
            let mut min = 0;
            for (i, total) in totals.iter().enumerate().skip(1) {
                if *total < totals[min] {
                    min = i;
                }
            }
            totals[min] += time;
            groups.groups[min].tests.push(id.clone());
        }

        for (group, total) in groups.groups.iter_mut().zip(totals) {
            group.expected_time = Some(total);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::DependencyResolver;
    use pretty_assertions::assert_eq;
    use test_strategy::proptest;

    fn count(n: usize) -> GroupCount {
        GroupCount::new(NonZeroUsize::new(n).expect("count is non-zero"))
    }

    fn ids(ids: &[&str]) -> Vec<TestId> {
        ids.iter().copied().map(TestId::from).collect()
    }

    fn lists(groups: &Groups) -> Vec<Vec<&str>> {
        groups
            .iter()
            .map(|group| group.tests().iter().map(TestId::as_str).collect())
            .collect()
    }

    #[test]
    fn group_count_from_str() {
        assert_eq!("3".parse::<GroupCount>().expect("valid"), count(3));
        assert_eq!(" 1 ".parse::<GroupCount>().expect("valid"), count(1));
        for input in ["0", "-1", "", "two", "1.5"] {
            input
                .parse::<GroupCount>()
                .expect_err(&format!("expected input '{input}' to fail"));
        }
    }

    #[test]
    fn round_robin() {
        let tests = ids(&["a", "b", "c", "d", "e"]);
        let groups = GroupPartitioner::new(count(2)).round_robin(&tests);
        assert_eq!(lists(&groups), vec![vec!["a", "c", "e"], vec!["b", "d"]]);

        let groups = GroupPartitioner::new(count(4)).round_robin(&ids(&["a"]));
        assert_eq!(lists(&groups), vec![vec!["a"], vec![], vec![], vec![]]);
    }

    #[test]
    fn pack_without_dependencies_is_contiguous() {
        let mut resolver = DependencyResolver::new();
        for id in ["t:1", "t:2", "t:3", "t:4", "t:5", "t:6", "t:7"] {
            resolver.add_test(id, Vec::<&str>::new());
        }
        let resolved = resolver.resolve().expect("resolves");

        // round(7 / 3) = 2, and the last group absorbs the remainder.
        let groups = GroupPartitioner::new(count(3)).pack(&resolved);
        assert_eq!(
            lists(&groups),
            vec![vec!["t:1", "t:2"], vec!["t:3", "t:4"], vec!["t:5", "t:6", "t:7"]]
        );
    }

    #[test]
    fn pack_keeps_dependencies_together() {
        let mut resolver = DependencyResolver::new();
        resolver
            .add_test("t:a", Vec::<&str>::new())
            .add_test("t:b", ["a"])
            .add_test("t:c", Vec::<&str>::new())
            .add_test("t:d", ["a"])
            .add_test("t:e", Vec::<&str>::new())
            .add_test("t:f", Vec::<&str>::new());
        let resolved = resolver.resolve().expect("resolves");

        // Target is 3, but "t:d" depends on "t:a", so the first cut happens after "t:d".
        let groups = GroupPartitioner::new(count(2)).pack(&resolved);
        assert_eq!(
            lists(&groups),
            vec![vec!["t:a", "t:b", "t:c", "t:d"], vec!["t:e", "t:f"]]
        );
    }

    #[test]
    fn pack_fewer_tests_than_groups() {
        let mut resolver = DependencyResolver::new();
        resolver
            .add_test("t:a", Vec::<&str>::new())
            .add_test("t:b", Vec::<&str>::new());
        let resolved = resolver.resolve().expect("resolves");

        let groups = GroupPartitioner::new(count(4)).pack(&resolved);
        assert_eq!(lists(&groups), vec![vec!["t:a"], vec!["t:b"], vec![], vec![]]);
    }

    #[test]
    fn time_weighted_balance() {
        let tests = ids(&["t:10", "t:9", "t:8", "t:7", "t:6", "t:5"]);
        let mut report = TimeReport::new();
        for (id, time) in tests.iter().zip([10.0, 9.0, 8.0, 7.0, 6.0, 5.0]) {
            report.insert(id.clone(), time);
        }

        let groups = TimeWeightedPartitioner::new(count(2)).partition(&tests, &report);
        assert_eq!(
            lists(&groups),
            vec![vec!["t:10", "t:7", "t:6"], vec!["t:9", "t:8", "t:5"]]
        );
        let times: Vec<_> = groups.iter().map(|g| g.expected_time()).collect();
        assert_eq!(times, vec![Some(23.0), Some(22.0)]);
    }

    #[test]
    fn time_weighted_ties_and_unknown_tests() {
        let tests = ids(&["t:a", "t:b", "t:c", "t:d"]);
        let mut report = TimeReport::new();
        report.insert("t:c".into(), 1.0);

        let groups = TimeWeightedPartitioner::new(count(3)).partition(&tests, &report);
        // "t:c" goes first. Zero-time tests don't move the totals, so they all land in the
        // lowest-numbered group that was empty.
        assert_eq!(
            lists(&groups),
            vec![vec!["t:c"], vec!["t:a", "t:b", "t:d"], vec![]]
        );
    }

    #[proptest]
    fn round_robin_is_complete(
        #[strategy(0usize..200)] test_count: usize,
        #[strategy(1usize..20)] group_count: usize,
    ) {
        let tests: Vec<_> = (0..test_count).map(|i| TestId::new(format!("t:{i}"))).collect();
        let groups = GroupPartitioner::new(count(group_count)).round_robin(&tests);
        proptest::prop_assert_eq!(groups.len(), group_count);
        let mut seen: Vec<_> = groups.to_test_lists().into_iter().flatten().collect();
        seen.sort();
        let mut expected = tests.clone();
        expected.sort();
        proptest::prop_assert_eq!(seen, expected);
    }

    #[proptest]
    fn pack_is_complete_and_local(
        #[strategy(proptest::collection::vec(proptest::option::of(0usize..100), 0..100))]
        parents: Vec<Option<usize>>,
        #[strategy(1usize..12)] group_count: usize,
    ) {
        // Test i may depend on an earlier test, which keeps the graph acyclic.
        let mut resolver = DependencyResolver::new();
        for (i, parent) in parents.iter().enumerate() {
            let deps: Vec<String> = match parent {
                Some(p) if i > 0 => vec![format!("{}", p % i)],
                _ => vec![],
            };
            resolver.add_test(format!("t:{i}").as_str(), deps);
        }
        let resolved = resolver.resolve().expect("graph is acyclic");
        let groups = GroupPartitioner::new(count(group_count)).pack(&resolved);

        proptest::prop_assert_eq!(groups.len(), group_count);
        proptest::prop_assert_eq!(groups.test_count(), parents.len());

        for group in groups.iter() {
            for (pos, test) in group.tests().iter().enumerate() {
                for dep in resolved.graph().dependencies(test) {
                    let dep_pos = group.tests().iter().position(|t| t == dep);
                    proptest::prop_assert!(
                        dep_pos.is_some_and(|dep_pos| dep_pos < pos),
                        "{dep} should be before {test} in the same group"
                    );
                }
            }
        }
    }
}
