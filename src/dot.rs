//! MDD to DOT (Graphviz) conversion.
//!
//! - Leaves are boxes at the bottom (sink rank), labeled with their value.
//! - Internal nodes are ellipses labeled with the variable key, grouped by
//!   variable level.
//! - Edges are labeled with the value of the variable they stand for.
//! - Roots are rectangles at the top (source rank).
//!
//! # Examples
//!
//! ```
//! use lqm_rs::mdd::MddManager;
//! use lqm_rs::types::{MddVariable, Var};
//!
//! let mdd = MddManager::new([MddVariable::boolean("A"), MddVariable::new("B", 3)]);
//! let a = mdd.mk_var(Var::new(0)).unwrap();
//! let b = mdd.mk_identity(Var::new(1)).unwrap();
//! let f = mdd.apply_and(a, b);
//!
//! let dot = mdd.to_dot(&[f]).unwrap();
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::collections::BTreeMap;

use crate::mdd::MddManager;
use crate::reference::Ref;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for internal nodes (default: "ellipse")
    pub node_shape: &'static str,
    /// Shape for leaves (default: "box")
    pub leaf_shape: &'static str,
    /// Shape for root nodes (default: "rect")
    pub root_shape: &'static str,
    /// Whether edges towards leaf 0 are drawn (default: true)
    pub show_zero_edges: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "ellipse",
            leaf_shape: "box",
            root_shape: "rect",
            show_zero_edges: true,
        }
    }
}

fn node_id(r: Ref) -> String {
    match r.value() {
        Some(v) => format!("L{}", v),
        None => format!("N{}", r.get()),
    }
}

impl MddManager {
    /// Converts the diagrams rooted at `roots` to DOT format.
    ///
    /// Shared nodes are displayed once.
    pub fn to_dot(&self, roots: &[Ref]) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    pub fn to_dot_with_config(&self, roots: &[Ref], config: &DotConfig) -> Result<String, std::fmt::Error> {
        use std::fmt::Write as _;

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        let all_nodes = self.descendants(roots.iter().copied());

        // Leaves
        let mut leaves: Vec<u32> = all_nodes.iter().filter_map(|r| r.value()).collect();
        leaves.sort_unstable();
        writeln!(dot, "{{ rank=sink")?;
        for value in leaves {
            writeln!(dot, "L{} [shape={}, label=\"{}\"];", value, config.leaf_shape, value)?;
        }
        writeln!(dot, "}}")?;

        // Group internal nodes by variable level
        let mut levels = BTreeMap::<usize, Vec<Ref>>::new();
        for &node in all_nodes.iter() {
            if let Some(var) = self.node_variable(node) {
                levels.entry(var.index()).or_default().push(node);
            }
        }
        for (&level, nodes) in levels.iter_mut() {
            nodes.sort();
            let key = &self.variables()[level].key;
            writeln!(dot, "{{ rank=same")?;
            for &node in nodes.iter() {
                writeln!(dot, "{} [label=\"{}\"];", node_id(node), key)?;
            }
            writeln!(dot, "}}")?;
        }

        for nodes in levels.values() {
            for &node in nodes {
                for (value, child) in self.children(node).unwrap_or_default().into_iter().enumerate() {
                    if !config.show_zero_edges && child.value() == Some(0) {
                        continue;
                    }
                    writeln!(dot, "{} -> {} [label=\"{}\"];", node_id(node), node_id(child), value)?;
                }
            }
        }

        writeln!(dot, "{{ rank=source")?;
        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.root_shape, root)?;
        }
        writeln!(dot, "}}")?;
        for (i, &root) in roots.iter().enumerate() {
            writeln!(dot, "r{} -> {};", i, node_id(root))?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::types::{MddVariable, Var};

    #[test]
    fn test_to_dot_basic() {
        let mdd = MddManager::new([MddVariable::boolean("A"), MddVariable::new("B", 3)]);
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let b = mdd.mk_identity(Var::new(1)).unwrap();
        let f = mdd.apply_or(a, b);

        let dot = mdd.to_dot(&[f]).unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("label=\"B\""));
        assert!(dot.contains("L2 [shape=box"));
    }

    #[test]
    fn test_to_dot_constants() {
        let mdd = MddManager::new([MddVariable::boolean("A")]);
        let dot = mdd.to_dot(&[mdd.zero(), mdd.one()]).unwrap();
        assert!(dot.contains("r0 -> L0;"));
        assert!(dot.contains("r1 -> L1;"));
    }

    #[test]
    fn test_to_dot_hide_zero_edges() {
        let mdd = MddManager::new([MddVariable::boolean("A")]);
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let config = DotConfig {
            show_zero_edges: false,
            ..DotConfig::default()
        };
        let dot = mdd.to_dot_with_config(&[a], &config).unwrap();
        assert!(!dot.contains("-> L0 "));
        assert!(dot.contains("-> L1 [label=\"1\"]"));
    }
}
