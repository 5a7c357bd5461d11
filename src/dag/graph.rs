// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::dag::task::Task;
use crate::types::TaskName;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Direct dependencies: tasks that must finish before this one can run.
    deps: Vec<TaskName>,
    /// Direct dependents: tasks that depend on this one.
    dependents: Vec<TaskName>,
}

/// Read-only adjacency view of a task set, keyed by task name.
///
/// The scheduler does not need this; it is used to explain a run (dry-run
/// output, cycle diagnostics) after the fact.
#[derive(Debug, Clone)]
pub struct DagGraph {
    nodes: BTreeMap<TaskName, DagNode>,
}

impl DagGraph {
    /// Build the adjacency view. Dependencies on unknown tasks are kept in
    /// `deps` but produce no dependent edge.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut nodes: BTreeMap<TaskName, DagNode> = tasks
            .iter()
            .map(|task| {
                let node = DagNode {
                    deps: task.dependencies().iter().cloned().collect(),
                    dependents: Vec::new(),
                };
                (task.name().to_string(), node)
            })
            .collect();

        for task in tasks {
            for dep in task.dependencies() {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    dep_node.dependents.push(task.name().to_string());
                }
            }
        }

        for node in nodes.values_mut() {
            node.dependents.sort();
        }

        Self { nodes }
    }

    /// All task names, sorted.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks with no dependencies.
    pub fn entry_points(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.deps.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Groups of tasks within `subset` that depend on each other in a cycle.
    ///
    /// Each group is a strongly connected component of the subgraph induced
    /// by `subset` with more than one member, or a single task that depends
    /// on itself. Groups and their members are sorted.
    pub fn cyclic_groups(&self, subset: &[TaskName]) -> Vec<Vec<TaskName>> {
        let members: BTreeSet<&str> = subset
            .iter()
            .map(String::as_str)
            .filter(|name| self.nodes.contains_key(*name))
            .collect();

        // Edge direction: dep -> task.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for &name in &members {
            graph.add_node(name);
        }
        for &name in &members {
            for dep in self.dependencies_of(name) {
                if members.contains(dep.as_str()) {
                    graph.add_edge(dep.as_str(), name, ());
                }
            }
        }

        let mut groups: Vec<Vec<TaskName>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut group: Vec<TaskName> = scc.into_iter().map(str::to_string).collect();
                group.sort();
                group
            })
            .collect();

        groups.sort();
        groups
    }

    /// Tasks in `subset` that are not on a cycle themselves but wait on one.
    pub fn blocked_behind_cycles(&self, subset: &[TaskName]) -> Vec<TaskName> {
        let cyclic: BTreeSet<TaskName> = self.cyclic_groups(subset).into_iter().flatten().collect();

        let mut blocked: Vec<TaskName> = subset
            .iter()
            .filter(|name| !cyclic.contains(*name))
            .cloned()
            .collect();
        blocked.sort();
        blocked
    }
}
