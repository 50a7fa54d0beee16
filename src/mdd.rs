//! The canonical multi-valued decision diagram manager.
//!
//! All diagrams of a model live in one [`MddManager`]. Nodes are hash-consed
//! in a unique table, so two handles are equal exactly when they denote the
//! same function. Operations go through the manager and are memoized in a
//! computed table, which bounds the work of `apply` by the product of the
//! operand sizes.
//!
//! Variables are ordered by their position in the manager ([`Var`]); every
//! path from a root tests variables in increasing order. Leaves carry integer
//! values in `0..=max_leaf`, where `max_leaf` is the largest `max_value` of
//! the declared variables (at least 1).
//!
//! Boolean operators are extended pointwise to multi-valued leaves:
//!
//! ```text
//! and(a, b) = min(a, b)
//! or(a, b)  = max(a, b)
//! not(a)    = if a == 0 { 1 } else { 0 }
//! ```
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
//!
//! // De Morgan holds by reference equality
//! let f = mdd.apply_not(mdd.apply_and(a, b));
//! let g = mdd.apply_or(mdd.apply_not(a), mdd.apply_not(b));
//! assert_eq!(f, g);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::{MddVariable, Var};

/// Sizing of the unique table and of the computed table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MddConfig {
    /// Initial number of unique-table buckets, as a power of two.
    pub storage_bits: usize,
    /// Initial capacity of the apply cache, as a power of two.
    pub cache_bits: usize,
}

impl Default for MddConfig {
    fn default() -> Self {
        Self {
            storage_bits: 12,
            cache_bits: 14,
        }
    }
}

impl MddConfig {
    pub fn with_storage_bits(mut self, bits: usize) -> Self {
        self.storage_bits = bits;
        self
    }

    pub fn with_cache_bits(mut self, bits: usize) -> Self {
        self.cache_bits = bits;
        self
    }
}

/// Key of the computed table. Commutative operands are stored sorted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpKey {
    And(Ref, Ref),
    Or(Ref, Ref),
    Not(Ref),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BinaryOp {
    And,
    Or,
}

impl BinaryOp {
    fn combine(self, a: u32, b: u32) -> u32 {
        match self {
            BinaryOp::And => a.min(b),
            BinaryOp::Or => a.max(b),
        }
    }

    fn key(self, f: Ref, g: Ref) -> OpKey {
        match self {
            BinaryOp::And => OpKey::And(f, g),
            BinaryOp::Or => OpKey::Or(f, g),
        }
    }
}

type CaseCache = HashMap<(Ref, Vec<Ref>), Ref>;

pub struct MddManager {
    variables: Vec<MddVariable>,
    keys: HashMap<String, Var>,
    storage: RefCell<Table<Node>>,
    cache: RefCell<Cache<OpKey, Ref>>,
    max_leaf: u32,
}

impl MddManager {
    /// Create a manager over the given variables, in order.
    ///
    /// # Panics
    ///
    /// Panics if two variables share the same key.
    pub fn new(variables: impl IntoIterator<Item = MddVariable>) -> Self {
        Self::with_config(variables, MddConfig::default())
    }

    pub fn with_config(variables: impl IntoIterator<Item = MddVariable>, config: MddConfig) -> Self {
        let variables: Vec<MddVariable> = variables.into_iter().collect();
        let mut keys = HashMap::with_capacity(variables.len());
        for (i, variable) in variables.iter().enumerate() {
            let previous = keys.insert(variable.key.clone(), Var::from(i));
            assert!(previous.is_none(), "Duplicate variable key '{}'", variable.key);
        }
        let max_leaf = variables.iter().map(|v| v.max_value()).max().unwrap_or(1).max(1);
        debug!("new manager: {} variables, max leaf {}", variables.len(), max_leaf);

        Self {
            variables,
            keys,
            storage: RefCell::new(Table::new(config.storage_bits)),
            cache: RefCell::new(Cache::new(config.cache_bits)),
            max_leaf,
        }
    }
}

impl Default for MddManager {
    fn default() -> Self {
        MddManager::new([])
    }
}

impl Debug for MddManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("MddManager")
            .field("variables", &self.variables.len())
            .field("nodes", &storage.size())
            .field("buckets", &storage.num_buckets())
            .field("max_leaf", &self.max_leaf)
            .finish()
    }
}

impl MddManager {
    pub fn variables(&self) -> &[MddVariable] {
        &self.variables
    }
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }
    pub fn max_leaf(&self) -> u32 {
        self.max_leaf
    }

    /// Find a variable by its key.
    pub fn find_variable(&self, key: &str) -> Option<Var> {
        self.keys.get(key).copied()
    }

    pub fn variable_info(&self, var: Var) -> Result<&MddVariable> {
        self.variables
            .get(var.index())
            .ok_or_else(|| Error::UnknownVariable(var.to_string()))
    }

    fn nbval(&self, var: Var) -> u32 {
        self.variables[var.index()].nbval
    }

    /// Number of internal nodes created so far.
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().size()
    }
    pub fn cache_hits(&self) -> usize {
        self.cache.borrow().hits()
    }
    pub fn cache_misses(&self) -> usize {
        self.cache.borrow().misses()
    }

    /// Return the canonical leaf for `value`.
    pub fn leaf(&self, value: u32) -> Result<Ref> {
        if value > self.max_leaf {
            return Err(Error::InvalidValue {
                value,
                max: self.max_leaf,
            });
        }
        Ok(Ref::leaf(value))
    }
    pub fn zero(&self) -> Ref {
        Ref::leaf(0)
    }
    pub fn one(&self) -> Ref {
        Ref::leaf(1)
    }

    pub fn is_leaf(&self, f: Ref) -> bool {
        f.is_leaf()
    }
    pub fn leaf_value(&self, f: Ref) -> Result<u32> {
        f.value().ok_or(Error::NotALeaf(f))
    }

    fn node(&self, f: Ref) -> Node {
        let index = f.index().expect("leaf has no node");
        self.storage.borrow().value(index).clone()
    }

    /// Variable tested at the root of `f`, `None` for leaves.
    pub fn node_variable(&self, f: Ref) -> Option<Var> {
        f.index().map(|i| self.storage.borrow().value(i).variable)
    }

    /// Children of the root of `f`, `None` for leaves.
    pub fn children(&self, f: Ref) -> Option<Vec<Ref>> {
        f.index().map(|i| self.storage.borrow().value(i).children.to_vec())
    }

    /// Child of an internal node for the given value. Panics on a leaf.
    pub(crate) fn child(&self, f: Ref, value: u32) -> Ref {
        let index = f.index().expect("leaf has no children");
        self.storage.borrow().value(index).child(value)
    }

    /// Cofactors of `f` with respect to `var`, which must not come after the
    /// root variable of `f`.
    fn top_cofactors(&self, f: Ref, var: Var) -> Vec<Ref> {
        match self.node_variable(f) {
            Some(v) if v == var => self.children(f).unwrap_or_default(),
            Some(v) => {
                assert!(var < v, "Cofactor variable {} is below the root {}", var, v);
                vec![f; self.nbval(var) as usize]
            }
            None => vec![f; self.nbval(var) as usize],
        }
    }

    fn top_variable(&self, refs: &[Ref]) -> Option<Var> {
        refs.iter().filter_map(|&r| self.node_variable(r)).min()
    }

    /// Create (or find) a node without checking its arguments.
    fn mk(&self, var: Var, children: Vec<Ref>) -> Ref {
        if children.iter().all(|&c| c == children[0]) {
            debug!("mk: all children of {} are {}", var, children[0]);
            return children[0];
        }
        let index = self.storage.borrow_mut().put(Node::new(var, children));
        Ref::node(index as u32)
    }

    /// Create the node testing `var` with the given children.
    ///
    /// If every child is the same, that child is returned: the variable has no
    /// effect along this path.
    pub fn mk_node(&self, var: Var, children: Vec<Ref>) -> Result<Ref> {
        debug!("mk_node(var = {}, children = {:?})", var, children);
        let info = self.variable_info(var)?;
        if children.len() != info.nbval as usize {
            return Err(Error::ArityMismatch {
                variable: info.key.clone(),
                expected: info.nbval as usize,
                actual: children.len(),
            });
        }
        for &child in &children {
            match child.index() {
                None => {
                    self.leaf(child.value().unwrap_or_default())?;
                }
                Some(index) => {
                    if index > self.num_nodes() {
                        return Err(Error::UnknownVariable(child.to_string()));
                    }
                    if self.node_variable(child).is_some_and(|v| v <= var) {
                        return Err(Error::OrderViolation {
                            variable: info.key.clone(),
                        });
                    }
                }
            }
        }
        Ok(self.mk(var, children))
    }

    /// Test `var >= 1`, which is `var == 1` for Boolean variables.
    pub fn mk_var(&self, var: Var) -> Result<Ref> {
        self.mk_test(var, |value| value >= 1)
    }

    /// Pointwise test: the result is 1 for the values accepted by `predicate`.
    pub fn mk_test(&self, var: Var, predicate: impl Fn(u32) -> bool) -> Result<Ref> {
        let nbval = self.variable_info(var)?.nbval;
        let children = (0..nbval)
            .map(|value| if predicate(value) { self.one() } else { self.zero() })
            .collect();
        Ok(self.mk(var, children))
    }

    /// The function whose output is the current value of `var`.
    pub fn mk_identity(&self, var: Var) -> Result<Ref> {
        let nbval = self.variable_info(var)?.nbval;
        let children = (0..nbval).map(Ref::leaf).collect();
        Ok(self.mk(var, children))
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        debug!("apply_not(f = {})", f);
        if let Some(value) = f.value() {
            return if value == 0 { self.one() } else { self.zero() };
        }

        let key = OpKey::Not(f);
        let cached = self.cache.borrow_mut().get(&key);
        if let Some(res) = cached {
            debug!("cache: apply_not(f = {}) -> {}", f, res);
            return res;
        }

        let node = self.node(f);
        let children = node.children.iter().map(|&c| self.apply_not(c)).collect();
        let res = self.mk(node.variable, children);
        self.cache.borrow_mut().insert(key, res);
        res
    }

    pub fn apply_and(&self, f: Ref, g: Ref) -> Ref {
        debug!("apply_and(f = {}, g = {})", f, g);
        self.apply_binary(BinaryOp::And, f, g)
    }

    pub fn apply_or(&self, f: Ref, g: Ref) -> Ref {
        debug!("apply_or(f = {}, g = {})", f, g);
        self.apply_binary(BinaryOp::Or, f, g)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = Ref::leaf(self.max_leaf);
        for node in nodes {
            res = self.apply_and(res, node);
        }
        res
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero();
        for node in nodes {
            res = self.apply_or(res, node);
        }
        res
    }

    fn apply_binary(&self, op: BinaryOp, f: Ref, g: Ref) -> Ref {
        // Base cases:
        //   op(F,F) => F
        //   op(a,b) => combine(a,b) for leaves
        //   and(0,G) => 0, and(max,G) => G
        //   or(0,G) => G, or(max,G) => max
        if f == g {
            return f;
        }
        if let (Some(a), Some(b)) = (f.value(), g.value()) {
            return Ref::leaf(op.combine(a, b));
        }
        let bottom = self.zero();
        let top = Ref::leaf(self.max_leaf);
        for (x, y) in [(f, g), (g, f)] {
            match op {
                BinaryOp::And if x == bottom => return bottom,
                BinaryOp::And if x == top => return y,
                BinaryOp::Or if x == bottom => return y,
                BinaryOp::Or if x == top => return top,
                _ => {}
            }
        }

        let (f, g) = if f <= g { (f, g) } else { (g, f) };
        let key = op.key(f, g);
        let cached = self.cache.borrow_mut().get(&key);
        if let Some(res) = cached {
            debug!("cache: {:?} -> {}", key, res);
            return res;
        }

        let m = self.top_variable(&[f, g]).expect("non-leaf operand");
        let fc = self.top_cofactors(f, m);
        let gc = self.top_cofactors(g, m);
        let children = fc
            .into_iter()
            .zip(gc)
            .map(|(a, b)| self.apply_binary(op, a, b))
            .collect();
        let res = self.mk(m, children);
        debug!("computed: {:?} -> {}", key, res);
        self.cache.borrow_mut().insert(key, res);
        res
    }

    fn check_value(&self, var: Var, value: u32) -> Result<()> {
        let info = self.variable_info(var)?;
        if value >= info.nbval {
            return Err(Error::InvalidValue {
                value,
                max: info.max_value(),
            });
        }
        Ok(())
    }

    /// f|var<-value
    pub fn restrict(&self, f: Ref, var: Var, value: u32) -> Result<Ref> {
        self.check_value(var, value)?;
        let mut cache = HashMap::new();
        Ok(self.restrict_(f, var, value, &mut cache))
    }

    fn restrict_(&self, f: Ref, var: Var, value: u32, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if f.is_leaf() {
            return f;
        }
        let node = self.node(f);
        if var < node.variable {
            // 'f' does not depend on 'var'
            return f;
        }
        if var == node.variable {
            return node.child(value);
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let children = node
            .children
            .iter()
            .map(|&c| self.restrict_(c, var, value, cache))
            .collect();
        let res = self.mk(node.variable, children);
        cache.insert(f, res);
        res
    }

    /// Fix several variables at once.
    pub fn restrict_multi(&self, f: Ref, values: &HashMap<Var, u32>) -> Result<Ref> {
        for (&var, &value) in values {
            self.check_value(var, value)?;
        }
        let mut cache = HashMap::new();
        Ok(self.restrict_multi_(f, values, &mut cache))
    }

    fn restrict_multi_(&self, f: Ref, values: &HashMap<Var, u32>, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if f.is_leaf() || values.is_empty() {
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let node = self.node(f);
        let res = if let Some(&value) = values.get(&node.variable) {
            self.restrict_multi_(node.child(value), values, cache)
        } else {
            let children = node
                .children
                .iter()
                .map(|&c| self.restrict_multi_(c, values, cache))
                .collect();
            self.mk(node.variable, children)
        };
        cache.insert(f, res);
        res
    }

    /// Multi-way selection: wherever `selector` evaluates to `v`, the result
    /// is `branches[v]`.
    pub fn apply_case(&self, selector: Ref, branches: &[Ref]) -> Result<Ref> {
        for value in self.leaves(selector) {
            if value as usize >= branches.len() {
                return Err(Error::InvalidValue {
                    value,
                    max: branches.len().saturating_sub(1) as u32,
                });
            }
        }
        let mut cache = CaseCache::new();
        Ok(self.case_(selector, branches, &mut cache))
    }

    fn case_(&self, selector: Ref, branches: &[Ref], cache: &mut CaseCache) -> Ref {
        if let Some(value) = selector.value() {
            return branches[value as usize];
        }
        if branches.iter().all(|&b| b == branches[0]) {
            return branches[0];
        }

        let key = (selector, branches.to_vec());
        if let Some(&res) = cache.get(&key) {
            return res;
        }

        let mut refs = branches.to_vec();
        refs.push(selector);
        let m = self.top_variable(&refs).expect("non-leaf selector");
        let selector_cofactors = self.top_cofactors(selector, m);
        let branch_cofactors: Vec<Vec<Ref>> = branches.iter().map(|&b| self.top_cofactors(b, m)).collect();

        let children = selector_cofactors
            .into_iter()
            .enumerate()
            .map(|(value, s)| {
                let sub: Vec<Ref> = branch_cofactors.iter().map(|c| c[value]).collect();
                self.case_(s, &sub, cache)
            })
            .collect();
        let res = self.mk(m, children);
        cache.insert(key, res);
        res
    }

    /// f|var<-g
    ///
    /// Substitutes the function `g` for every test on `var` in `f`. The values
    /// of `g` must lie in the domain of `var`.
    pub fn compose(&self, f: Ref, var: Var, g: Ref) -> Result<Ref> {
        debug!("compose(f = {}, var = {}, g = {})", f, var, g);
        let info = self.variable_info(var)?;
        for value in self.leaves(g) {
            if value >= info.nbval {
                return Err(Error::InvalidValue {
                    value,
                    max: info.max_value(),
                });
            }
        }
        if !self.depends_on(f, var) {
            return Ok(f);
        }

        let mut restrict_cache = HashMap::new();
        let branches: Vec<Ref> = (0..info.nbval)
            .map(|value| {
                restrict_cache.clear();
                self.restrict_(f, var, value, &mut restrict_cache)
            })
            .collect();
        let mut cache = CaseCache::new();
        Ok(self.case_(g, &branches, &mut cache))
    }

    /// All nodes (internal and leaves) reachable from the roots.
    pub fn descendants(&self, roots: impl IntoIterator<Item = Ref>) -> HashSet<Ref> {
        let mut visited = HashSet::new();
        let mut stack: Vec<Ref> = roots.into_iter().collect();
        while let Some(node) = stack.pop() {
            if visited.insert(node) {
                if let Some(children) = self.children(node) {
                    stack.extend(children);
                }
            }
        }
        visited
    }

    /// Number of distinct nodes (including leaves) of `f`.
    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }

    /// Values of the leaves reachable from `f`.
    pub fn leaves(&self, f: Ref) -> BTreeSet<u32> {
        self.descendants([f]).into_iter().filter_map(|r| r.value()).collect()
    }

    /// Variables tested anywhere in `f`.
    pub fn support(&self, f: Ref) -> BTreeSet<Var> {
        self.descendants([f])
            .into_iter()
            .filter_map(|r| self.node_variable(r))
            .collect()
    }

    /// Check whether `f` depends on `var`.
    ///
    /// Since diagrams are reduced, a syntactic occurrence is also a semantic
    /// dependency.
    pub fn depends_on(&self, f: Ref, var: Var) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![f];
        while let Some(node) = stack.pop() {
            let Some(v) = self.node_variable(node) else {
                continue;
            };
            if v == var {
                return true;
            }
            if v > var || !visited.insert(node) {
                continue;
            }
            stack.extend(self.children(node).unwrap_or_default());
        }
        false
    }

    /// Evaluate `f` on a full valuation, indexed by variable position.
    pub fn eval(&self, f: Ref, valuation: &[u32]) -> Result<u32> {
        let mut current = f;
        while let Some(var) = self.node_variable(current) {
            let value = *valuation
                .get(var.index())
                .ok_or_else(|| Error::UnknownVariable(var.to_string()))?;
            self.check_value(var, value)?;
            current = self.child(current, value);
        }
        self.leaf_value(current)
    }

    pub fn to_bracket_string(&self, f: Ref) -> String {
        if let Some(value) = f.value() {
            return format!("({})", value);
        }
        let node = self.node(f);
        let children: Vec<String> = node.children.iter().map(|&c| self.to_bracket_string(c)).collect();
        format!(
            "{}:{}:({})",
            f,
            self.variables[node.variable.index()].key,
            children.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn manager() -> MddManager {
        MddManager::new([
            MddVariable::boolean("A"),
            MddVariable::new("B", 3),
            MddVariable::boolean("C"),
        ])
    }

    /// Every valuation of the manager's variables.
    fn all_valuations(mdd: &MddManager) -> Vec<Vec<u32>> {
        let mut result = vec![vec![]];
        for variable in mdd.variables() {
            result = result
                .into_iter()
                .flat_map(|prefix| {
                    (0..variable.nbval).map(move |v| {
                        let mut next = prefix.clone();
                        next.push(v);
                        next
                    })
                })
                .collect();
        }
        result
    }

    #[test]
    fn test_leaves() {
        let mdd = manager();
        assert_eq!(mdd.max_leaf(), 2);
        assert_eq!(mdd.leaf(0).unwrap(), mdd.zero());
        assert_eq!(mdd.leaf(2).unwrap(), mdd.leaf(2).unwrap());
        assert_eq!(mdd.leaf(3), Err(Error::InvalidValue { value: 3, max: 2 }));
        assert_eq!(mdd.leaf_value(mdd.one()), Ok(1));
    }

    #[test]
    fn test_leaf_value_of_node() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        assert!(!mdd.is_leaf(a));
        assert_eq!(mdd.leaf_value(a), Err(Error::NotALeaf(a)));
    }

    #[test]
    fn test_child_access() {
        let mdd = manager();
        let b = mdd.mk_identity(Var::new(1)).unwrap();
        assert_eq!(mdd.child(b, 2), mdd.leaf(2).unwrap());
        assert_eq!(mdd.children(mdd.one()), None);
        assert_eq!(mdd.node_variable(mdd.one()), None);
    }

    #[test]
    #[should_panic(expected = "leaf has no children")]
    fn test_child_of_leaf() {
        let mdd = manager();
        mdd.child(mdd.zero(), 0);
    }

    #[test]
    fn test_var() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        assert_eq!(mdd.node_variable(a), Some(Var::new(0)));
        assert_eq!(mdd.children(a), Some(vec![mdd.zero(), mdd.one()]));

        let b = mdd.mk_var(Var::new(1)).unwrap();
        assert_eq!(mdd.children(b), Some(vec![mdd.zero(), mdd.one(), mdd.one()]));
    }

    #[test]
    fn test_redundant_node_is_skipped() {
        let mdd = manager();
        let one = mdd.one();
        let n = mdd.num_nodes();
        let f = mdd.mk_node(Var::new(0), vec![one, one]).unwrap();
        assert_eq!(f, one);
        assert_eq!(mdd.num_nodes(), n);
    }

    #[test]
    fn test_mk_node_errors() {
        let mdd = manager();
        let zero = mdd.zero();
        let one = mdd.one();
        assert!(matches!(
            mdd.mk_node(Var::new(7), vec![zero, one]),
            Err(Error::UnknownVariable(_))
        ));
        assert!(matches!(
            mdd.mk_node(Var::new(1), vec![zero, one]),
            Err(Error::ArityMismatch { expected: 3, actual: 2, .. })
        ));
        let c = mdd.mk_var(Var::new(2)).unwrap();
        assert!(matches!(
            mdd.mk_node(Var::new(2), vec![zero, c]),
            Err(Error::OrderViolation { .. })
        ));
    }

    #[test]
    fn test_canonical_from_different_paths() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let b = mdd.mk_var(Var::new(1)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();

        // a & (b | c) == (a & b) | (a & c)
        let f = mdd.apply_and(a, mdd.apply_or(b, c));
        let g = mdd.apply_or(mdd.apply_and(a, b), mdd.apply_and(c, a));
        assert_eq!(f, g);

        // Built by hand
        let b_or_c = mdd.mk_node(Var::new(1), vec![c, mdd.one(), mdd.one()]).unwrap();
        let h = mdd.mk_node(Var::new(0), vec![mdd.zero(), b_or_c]).unwrap();
        assert_eq!(f, h);
    }

    #[test]
    fn test_de_morgan() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();

        let f = mdd.apply_not(mdd.apply_and(a, c));
        let g = mdd.apply_or(mdd.apply_not(a), mdd.apply_not(c));
        assert_eq!(f, g);

        let f = mdd.apply_not(mdd.apply_or(a, c));
        let g = mdd.apply_and(mdd.apply_not(a), mdd.apply_not(c));
        assert_eq!(f, g);
    }

    #[test]
    fn test_multivalued_pointwise() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let b = mdd.mk_identity(Var::new(1)).unwrap();

        let and = mdd.apply_and(a, b);
        let or = mdd.apply_or(a, b);
        let not = mdd.apply_not(b);
        for valuation in all_valuations(&mdd) {
            let (va, vb) = (valuation[0], valuation[1]);
            assert_eq!(mdd.eval(and, &valuation), Ok(va.min(vb)));
            assert_eq!(mdd.eval(or, &valuation), Ok(va.max(vb)));
            assert_eq!(mdd.eval(not, &valuation), Ok(if vb == 0 { 1 } else { 0 }));
        }
    }

    #[test]
    fn test_apply_is_memoized() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();

        let f = mdd.apply_and(a, c);
        let hits = mdd.cache_hits();
        let nodes = mdd.num_nodes();
        let g = mdd.apply_and(c, a);
        assert_eq!(f, g);
        assert!(mdd.cache_hits() > hits);
        assert_eq!(mdd.num_nodes(), nodes);
    }

    #[test]
    fn test_restrict() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let b = mdd.mk_identity(Var::new(1)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        let f = mdd.apply_or(mdd.apply_and(a, b), c);

        // f|B<-0 == c
        assert_eq!(mdd.restrict(f, Var::new(1), 0), Ok(c));
        // f|A<-1 == b | c
        assert_eq!(mdd.restrict(f, Var::new(0), 1), Ok(mdd.apply_or(b, c)));
        assert!(matches!(
            mdd.restrict(f, Var::new(1), 3),
            Err(Error::InvalidValue { value: 3, max: 2 })
        ));
    }

    #[test]
    fn test_restrict_multi() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let b = mdd.mk_var(Var::new(1)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        let f = mdd.apply_and_many([a, b, mdd.apply_not(c)]);

        let values = HashMap::from([(Var::new(0), 1), (Var::new(2), 0)]);
        assert_eq!(mdd.restrict_multi(f, &values), Ok(b));

        let values = HashMap::from([(Var::new(2), 1)]);
        assert_eq!(mdd.restrict_multi(f, &values), Ok(mdd.zero()));
    }

    #[test]
    fn test_compose() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let b = mdd.mk_var(Var::new(1)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();

        // f = a & c, substitute c := !a  =>  0
        let f = mdd.apply_and(a, c);
        assert_eq!(mdd.compose(f, Var::new(2), mdd.apply_not(a)), Ok(mdd.zero()));

        // f = c, substitute c := a | b  =>  a | b
        assert_eq!(mdd.compose(c, Var::new(2), mdd.apply_or(a, b)), Ok(mdd.apply_or(a, b)));

        // Independent function is returned unchanged
        assert_eq!(mdd.compose(a, Var::new(2), b), Ok(a));
    }

    #[test]
    fn test_compose_multivalued() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        let b_is_two = mdd.mk_test(Var::new(1), |v| v == 2).unwrap();

        // Substitute B := 2*c (c ? 2 : 0) into (B == 2) & a
        let f = mdd.apply_and(b_is_two, a);
        let g = mdd.mk_node(Var::new(2), vec![mdd.zero(), mdd.leaf(2).unwrap()]).unwrap();
        let h = mdd.compose(f, Var::new(1), g).unwrap();
        assert_eq!(h, mdd.apply_and(a, c));

        // Values outside of the domain of C are rejected
        let b = mdd.mk_identity(Var::new(1)).unwrap();
        assert!(matches!(
            mdd.compose(c, Var::new(2), b),
            Err(Error::InvalidValue { value: 2, max: 1 })
        ));
    }

    #[test]
    fn test_compose_matches_truth_table() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let b = mdd.mk_identity(Var::new(1)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        let f = mdd.apply_or(mdd.apply_and(a, mdd.apply_not(c)), mdd.apply_and(b, c));
        let g = mdd.apply_or(a, mdd.apply_not(c));

        let h = mdd.compose(f, Var::new(0), g).unwrap();
        for valuation in all_valuations(&mdd) {
            let mut substituted = valuation.clone();
            substituted[0] = mdd.eval(g, &valuation).unwrap();
            assert_eq!(mdd.eval(h, &valuation), mdd.eval(f, &substituted));
        }
    }

    #[test]
    fn test_apply_case() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        let b = mdd.mk_identity(Var::new(1)).unwrap();

        let res = mdd.apply_case(b, &[mdd.zero(), a, c]).unwrap();
        for valuation in all_valuations(&mdd) {
            let expected = match valuation[1] {
                0 => 0,
                1 => valuation[0],
                _ => valuation[2],
            };
            assert_eq!(mdd.eval(res, &valuation), Ok(expected));
        }
        assert!(mdd.apply_case(b, &[a, c]).is_err());
    }

    #[test]
    fn test_support_and_dependency() {
        let mdd = manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        let f = mdd.apply_or(a, c);

        assert_eq!(mdd.support(f), BTreeSet::from([Var::new(0), Var::new(2)]));
        assert!(mdd.depends_on(f, Var::new(2)));
        assert!(!mdd.depends_on(f, Var::new(1)));
        assert!(!mdd.depends_on(mdd.one(), Var::new(0)));
        assert_eq!(mdd.leaves(f), BTreeSet::from([0, 1]));
        assert_eq!(mdd.size(f), 4);
    }

    #[test]
    fn test_eval_errors() {
        let mdd = manager();
        let b = mdd.mk_identity(Var::new(1)).unwrap();
        assert_eq!(mdd.eval(b, &[0, 2, 0]), Ok(2));
        assert!(matches!(mdd.eval(b, &[0]), Err(Error::UnknownVariable(_))));
        assert!(matches!(mdd.eval(b, &[0, 5, 0]), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_bracket_string() {
        let mdd = manager();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        let s = mdd.to_bracket_string(c);
        assert!(s.ends_with(":C:((0), (1))"), "got {}", s);
    }
}
