//! Iterator over the paths of an MDD.
//!
//! Every path goes from the root to a leaf and is reported as a cube over all
//! variables of the manager: `cube[v] == -1` when the path does not test `v`,
//! otherwise the value taken by `v` along the path. The cubes of all paths of a
//! function partition its input domain.
//!
//! # Example
//!
//! ```
//! use lqm_rs::mdd::MddManager;
//! use lqm_rs::types::{MddVariable, Var};
//!
//! let mdd = MddManager::new([MddVariable::boolean("A"), MddVariable::boolean("B")]);
//! let a = mdd.mk_var(Var::new(0)).unwrap();
//! let b = mdd.mk_var(Var::new(1)).unwrap();
//! let f = mdd.apply_or(a, b);
//!
//! let paths: Vec<_> = mdd.enumerate_paths(f).collect();
//! assert_eq!(paths.len(), 3);
//! assert!(paths.contains(&(vec![1, -1], 1)));
//! assert!(paths.contains(&(vec![0, 0], 0)));
//! assert!(paths.contains(&(vec![0, 1], 1)));
//! ```
//!
//! The number of paths can be exponential in the number of variables.

use crate::mdd::MddManager;
use crate::reference::Ref;

impl MddManager {
    /// Returns a lazy iterator over all paths of `f`, as `(cube, leaf value)`.
    ///
    /// Calling it again restarts the enumeration.
    pub fn enumerate_paths(&self, f: Ref) -> MddPaths<'_> {
        MddPaths::new(self, f, None)
    }

    /// Returns an iterator over the paths of `f` that end in the leaf `value`.
    pub fn paths_to(&self, f: Ref, value: u32) -> MddPaths<'_> {
        MddPaths::new(self, f, Some(value))
    }
}

/// Frame on the exploration stack.
#[derive(Debug, Clone)]
struct StackFrame {
    node: Ref,
    /// Next child to explore.
    next_value: u32,
}

/// An iterator over the paths of an MDD.
///
/// Created by [`MddManager::enumerate_paths()`] and [`MddManager::paths_to()`].
///
/// Uses depth-first traversal with backtracking. The current cube is kept in a
/// single vector and only cloned when a path is yielded.
#[derive(Clone)]
pub struct MddPaths<'a> {
    mdd: &'a MddManager,
    stack: Vec<StackFrame>,
    cube: Vec<i32>,
    target: Option<u32>,
}

impl<'a> MddPaths<'a> {
    pub fn new(mdd: &'a MddManager, f: Ref, target: Option<u32>) -> Self {
        MddPaths {
            mdd,
            stack: vec![StackFrame { node: f, next_value: 0 }],
            cube: vec![-1; mdd.num_vars()],
            target,
        }
    }
}

impl Iterator for MddPaths<'_> {
    type Item = (Vec<i32>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;

            if let Some(value) = node.value() {
                self.stack.pop();
                if self.target.map_or(true, |t| t == value) {
                    return Some((self.cube.clone(), value));
                }
                continue;
            }

            let var = self.mdd.node_variable(node).expect("internal node");
            let nbval = self.mdd.variables()[var.index()].nbval;
            if frame.next_value < nbval {
                let value = frame.next_value;
                frame.next_value += 1;
                self.cube[var.index()] = value as i32;
                let child = self.mdd.child(node, value);
                self.stack.push(StackFrame {
                    node: child,
                    next_value: 0,
                });
            } else {
                // All children explored
                self.cube[var.index()] = -1;
                self.stack.pop();
            }
        }
    }
}
