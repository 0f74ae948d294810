// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolving test dependencies into a single run order.
//!
//! Resolution happens in two steps:
//!
//! 1. Dependency targets, which may be written as a bare method name or as `file:method` (or
//!    `Class::method`), are normalized into full [`TestId`]s.
//! 2. The resulting graph is sorted topologically, with every test as a root in declaration order.
//!
//! Both steps fail loudly: a target that doesn't match any test, a malformed target or a cycle is
//! a [`DependencyResolveError`].

use crate::{
    errors::DependencyResolveError,
    test_id::{TestId, TestSource},
};
use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

/// Collects the declared dependencies for a set of tests.
#[derive(Clone, Debug, Default)]
pub struct DependencyResolver {
    declared: IndexMap<TestId, Vec<SmolStr>>,
}

impl DependencyResolver {
    /// Creates a new, empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver for the given tests, reading their dependencies from the source.
    pub fn from_source(source: &dyn TestSource, tests: &[TestId]) -> Self {
        let mut resolver = Self::new();
        for id in tests {
            resolver.add_test(id.clone(), source.dependencies(id).iter().cloned());
        }
        resolver
    }

    /// Adds a test along with its dependencies as written.
    pub fn add_test(
        &mut self,
        id: impl Into<TestId>,
        dependencies: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> &mut Self {
        self.declared.insert(
            id.into(),
            dependencies.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Normalizes and sorts the tests, returning them in run order along with the normalized
    /// graph.
    pub fn resolve(&self) -> Result<ResolvedTests, DependencyResolveError> {
        let graph = self.normalize()?;
        let order = graph.topological_order()?;
        debug!("resolved run order for {} tests", order.len());
        Ok(ResolvedTests { order, graph })
    }

    /// Rewrites every dependency target into a full test identifier.
    pub fn normalize(&self) -> Result<DependencyGraph, DependencyResolveError> {
        let mut edges = IndexMap::with_capacity(self.declared.len());
        for (test, targets) in &self.declared {
            let normalized = targets
                .iter()
                .map(|target| self.normalize_target(test, target))
                .collect::<Result<Vec<_>, _>>()?;
            edges.insert(test.clone(), normalized);
        }
        Ok(DependencyGraph { edges })
    }

    fn normalize_target(
        &self,
        test: &TestId,
        target: &SmolStr,
    ) -> Result<TestId, DependencyResolveError> {
        let malformed = |reason| DependencyResolveError::MalformedDependency {
            test: test.clone(),
            target: target.clone(),
            reason,
        };
        let missing = || DependencyResolveError::MissingDependency {
            test: test.clone(),
            target: target.clone(),
        };

        if target.is_empty() {
            return Err(malformed("target is empty"));
        }

        if !target.contains(':') {
            // A bare method name refers to the same file as the depending test.
            let file = test
                .file()
                .ok_or_else(|| malformed("bare method name used by a test with no file part"))?;
            let full = TestId::new(format!("{file}:{target}"));
            return if self.declared.contains_key(&full) {
                Ok(full)
            } else {
                Err(missing())
            };
        }

        let qualified = target.replace("::", ":");
        let (file, method) = qualified
            .rsplit_once(':')
            .ok_or_else(|| malformed("expected `file:method`"))?;
        if file.is_empty() || method.is_empty() {
            return Err(malformed("expected `file:method`"));
        }

        self.declared
            .keys()
            .find(|candidate| {
                candidate.method() == method
                    && candidate
                        .file()
                        .is_some_and(|candidate_file| file_matches(candidate_file, file))
            })
            .cloned()
            .ok_or_else(missing)
    }
}

/// Whether `candidate` (a test's file part) ends with `file`, either as written or with its
/// extension stripped.
fn file_matches(candidate: &str, file: &str) -> bool {
    if candidate.ends_with(file) {
        return true;
    }
    match candidate.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.ends_with(file),
        _ => false,
    }
}

/// A graph of tests with fully normalized dependencies, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: IndexMap<TestId, Vec<TestId>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

impl DependencyGraph {
    /// The number of tests in the graph.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the graph has no tests.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the dependencies of a test. Unknown tests have none.
    pub fn dependencies(&self, id: &TestId) -> &[TestId] {
        self.edges
            .get(id)
            .map(|deps| deps.as_slice())
            .unwrap_or_default()
    }

    /// Iterates over every `(test, dependency)` edge.
    pub fn edges(&self) -> impl Iterator<Item = (&TestId, &TestId)> + '_ {
        self.edges
            .iter()
            .flat_map(|(test, deps)| deps.iter().map(move |dep| (test, dep)))
    }

    /// Returns true if any test has a dependency.
    pub fn has_edges(&self) -> bool {
        self.edges.values().any(|deps| !deps.is_empty())
    }

    /// Sorts the graph so that every test comes after its dependencies.
    ///
    /// Roots are visited in declaration order and dependencies in the order they were declared,
    /// so the result is deterministic. A graph without edges sorts to declaration order.
    pub fn topological_order(&self) -> Result<Vec<TestId>, DependencyResolveError> {
        let mut states = vec![VisitState::Unvisited; self.edges.len()];
        let mut order = Vec::with_capacity(self.edges.len());
        // Each frame is (node index, index of the next dependency to look at).
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.edges.len() {
            if states[root] != VisitState::Unvisited {
                continue;
            }
            states[root] = VisitState::InProgress;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next_dep) = *frame;
                let (id, deps) = self
                    .edges
                    .get_index(node)
                    .expect("stack only holds valid indexes");

                let Some(dep) = deps.get(next_dep) else {
                    states[node] = VisitState::Done;
                    order.push(id.clone());
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                let dep_index =
                    self.edges
                        .get_index_of(dep)
                        .ok_or_else(|| DependencyResolveError::MissingDependency {
                            test: id.clone(),
                            target: SmolStr::new(dep.as_str()),
                        })?;
                match states[dep_index] {
                    VisitState::Done => {}
                    VisitState::InProgress => {
                        return Err(DependencyResolveError::Cycle {
                            from: id.clone(),
                            to: dep.clone(),
                        });
                    }
                    VisitState::Unvisited => {
                        states[dep_index] = VisitState::InProgress;
                        stack.push((dep_index, 0));
                    }
                }
            }
        }

        Ok(order)
    }
}

/// Tests in run order, along with the graph they were sorted from.
#[derive(Clone, Debug)]
pub struct ResolvedTests {
    order: Vec<TestId>,
    graph: DependencyGraph,
}

impl ResolvedTests {
    /// The tests, each after its dependencies.
    pub fn order(&self) -> &[TestId] {
        &self.order
    }

    /// The normalized dependency graph.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}
