use std::collections::HashMap;

use num_bigint::BigUint;

use crate::mdd::MddManager;
use crate::reference::Ref;

impl MddManager {
    /// Returns one full valuation (indexed by variable position) on which `f`
    /// evaluates to `value`.
    ///
    /// Variables not tested along the chosen path are set to 0.
    /// Returns `None` if `value` is not reachable from `f`.
    pub fn one_valuation(&self, f: Ref, value: u32) -> Option<Vec<u32>> {
        let mut cache = HashMap::new();
        if !self.reaches(f, value, &mut cache) {
            return None;
        }

        let mut valuation = vec![0; self.num_vars()];
        let mut current = f;
        while let Some(var) = self.node_variable(current) {
            let children = self.children(current).unwrap_or_default();
            let (v, &child) = children
                .iter()
                .enumerate()
                .find(|&(_, &c)| self.reaches(c, value, &mut cache))
                .expect("some child reaches the value");
            valuation[var.index()] = v as u32;
            current = child;
        }
        Some(valuation)
    }

    fn reaches(&self, node: Ref, value: u32, cache: &mut HashMap<Ref, bool>) -> bool {
        if let Some(v) = node.value() {
            return v == value;
        }
        if let Some(&res) = cache.get(&node) {
            return res;
        }
        let res = self
            .children(node)
            .unwrap_or_default()
            .into_iter()
            .any(|c| self.reaches(c, value, cache));
        cache.insert(node, res);
        res
    }

    /// Number of full valuations of the manager's variables on which `f`
    /// evaluates to `value`.
    pub fn count_valuations(&self, f: Ref, value: u32) -> BigUint {
        let mut cache = HashMap::new();
        let level = self.level(f);
        self.span(0, level) * self._count_valuations(f, value, &mut cache)
    }

    /// Position of the root variable, or the number of variables for leaves.
    fn level(&self, node: Ref) -> usize {
        self.node_variable(node).map_or(self.num_vars(), |v| v.index())
    }

    /// Number of valuations of the variables in `from..to`.
    fn span(&self, from: usize, to: usize) -> BigUint {
        self.variables()[from..to]
            .iter()
            .fold(BigUint::from(1u32), |acc, v| acc * v.nbval)
    }

    /// Count over the variables from the level of `node` downwards.
    fn _count_valuations(&self, node: Ref, value: u32, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if let Some(v) = node.value() {
            return if v == value { BigUint::from(1u32) } else { BigUint::ZERO };
        }
        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let level = self.level(node);
        let mut count = BigUint::ZERO;
        for child in self.children(node).unwrap_or_default() {
            let gap = self.span(level + 1, self.level(child));
            count += gap * self._count_valuations(child, value, cache);
        }

        cache.insert(node, count.clone());
        count
    }
}
