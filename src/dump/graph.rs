//! Insertion-ordered dependency graph with a cycle-tolerant topological sort.

use indexmap::IndexMap;

use super::command::InstallCommand;

struct PackageNode {
    deps: Vec<String>,
    command: InstallCommand,
}

/// Dependency graph over installed formulae.
///
/// Nodes keep their insertion order, so repeated runs over the same formula
/// enumeration produce identical output. The graph is write-once per run:
/// built, sorted, discarded.
#[derive(Default)]
pub struct DepGraph {
    nodes: IndexMap<String, PackageNode>,
}

impl DepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a formula with its direct dependency names and install command.
    /// Dependency names need not have a node of their own.
    pub fn insert(&mut self, name: String, deps: Vec<String>, command: InstallCommand) {
        self.nodes.insert(name, PackageNode { deps, command });
    }

    /// Linearize so every formula comes after all of its dependencies that
    /// are themselves graph nodes.
    ///
    /// Depth-first post-order with an explicit stack. A node is marked
    /// visited before its dependencies are descended into, so a dependency
    /// cycle terminates instead of recursing forever; the cyclic subset just
    /// carries no ordering guarantee. Dependency names without a node are
    /// treated as already satisfied and skipped. Cannot fail; O(V + E).
    pub fn topological_order(&self) -> Vec<&InstallCommand> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());

        for root in 0..self.nodes.len() {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            // Each frame is (node index, position of the next dependency).
            let mut stack = vec![(root, 0usize)];
            while let Some(frame) = stack.last_mut() {
                let (index, dep_pos) = *frame;
                let node = &self.nodes[index];
                match node.deps.get(dep_pos) {
                    Some(dep) => {
                        frame.1 += 1;
                        if let Some(dep_index) = self.nodes.get_index_of(dep.as_str()) {
                            if !visited[dep_index] {
                                visited[dep_index] = true;
                                stack.push((dep_index, 0));
                            }
                        }
                    }
                    None => {
                        order.push(&node.command);
                        stack.pop();
                    }
                }
            }
        }

        order
    }
}
