//! Package dependency graph used to decide which unimported packages the
//! current file may reach.

use std::collections::{HashMap, HashSet, VecDeque};

use burrow_api::{PackageDescriptor, WorkspaceIndex};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::Bfs;
use tracing::debug;

pub struct DependencyGraph {
    topology: StableDiGraph<String, ()>,
    path_index: HashMap<String, NodeIndex>,
    root: Option<NodeIndex>,
    reachable: HashSet<String>,
}

impl DependencyGraph {
    /// Walks declared dependencies breadth-first starting at `root_path`.
    pub fn build(index: &dyn WorkspaceIndex, root_path: &str) -> Self {
        let mut graph = Self {
            topology: StableDiGraph::new(),
            path_index: HashMap::new(),
            root: None,
            reachable: HashSet::new(),
        };

        let Some(root) = index.package_by_path(root_path) else {
            debug!(package = root_path, "package unknown to the index, reachability unrestricted");
            return graph;
        };
        let root_idx = graph.node(&root.path);
        graph.root = Some(root_idx);

        let mut queue = VecDeque::from([root]);
        let mut visited = HashSet::from([root_path.to_string()]);
        while let Some(desc) = queue.pop_front() {
            let from = graph.node(&desc.path);
            for dep in &desc.dependencies {
                let to = graph.node(dep);
                graph.topology.add_edge(from, to, ());
                if visited.insert(dep.clone())
                    && let Some(next) = index.package_by_path(dep)
                {
                    queue.push_back(next);
                }
            }
        }

        let mut bfs = Bfs::new(&graph.topology, root_idx);
        while let Some(idx) = bfs.next(&graph.topology) {
            if let Some(path) = graph.topology.node_weight(idx) {
                graph.reachable.insert(path.clone());
            }
        }
        debug!(
            package = root_path,
            reachable = graph.reachable.len(),
            "dependency graph built"
        );
        graph
    }

    fn node(&mut self, path: &str) -> NodeIndex {
        if let Some(idx) = self.path_index.get(path) {
            return *idx;
        }
        let idx = self.topology.add_node(path.to_string());
        self.path_index.insert(path.to_string(), idx);
        idx
    }

    /// Standard library packages are always reachable.
    pub fn is_reachable(&self, package: &PackageDescriptor) -> bool {
        self.root.is_none() || package.standard || self.reachable.contains(&package.path)
    }
}

/// Whether `package` can be offered as a new import of a file in `current`.
pub fn is_import_candidate(
    package: &PackageDescriptor,
    current: &str,
    graph: &DependencyGraph,
    already_imported: impl Fn(&str) -> bool,
) -> bool {
    package.importable
        && !package.test_variant
        && package.path != current
        && !already_imported(&package.path)
        && graph.is_reachable(package)
}
