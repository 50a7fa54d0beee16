//! Elimination of components from a model.
//!
//! Removing a component substitutes its function for its variable in every
//! function that reads it, so the remaining components keep their dynamics.
//! The eliminated component moves to the extra components.
//!
//! ```
//! use lqm_rs::builder::ModelBuilder;
//! use lqm_rs::component::ComponentRegistry;
//! use lqm_rs::expression::Event;
//! use lqm_rs::reducer::ModelReducer;
//!
//! let mut registry = ComponentRegistry::new();
//! for id in ["A", "B", "C"] {
//!     registry.register(id);
//! }
//! let mut builder = ModelBuilder::new(registry);
//! builder.add_rule("B", None, [Event::ident("A")]).unwrap();
//! builder.add_rule("C", None, [Event::ident("B"), Event::Not]).unwrap();
//! let model = builder.build().unwrap();
//!
//! let mut reducer = ModelReducer::new(&model);
//! reducer.remove(1).unwrap();
//! let reduced = reducer.model().unwrap();
//!
//! assert_eq!(reduced.components().len(), 2);
//! assert_eq!(reduced.extra_components()[0].id, "B");
//! assert_eq!(reduced.to_string(), "A: A\nC: !A\n");
//! ```

use std::rc::Rc;

use log::{debug, info};

use crate::component::Component;
use crate::error::{Error, Result};
use crate::mdd::MddManager;
use crate::model::LogicalModel;
use crate::reference::Ref;
use crate::types::Var;

/// Working copy of a model under reduction.
///
/// Components are addressed by their index in the source model until
/// [`ModelReducer::model`] compacts the core.
pub struct ModelReducer {
    manager: Rc<MddManager>,
    core: Vec<Component>,
    extra: Vec<Component>,
    functions: Vec<Ref>,
    variables: Vec<Var>,
    removed: Vec<bool>,
}

impl ModelReducer {
    pub fn new(model: &LogicalModel) -> Self {
        let n = model.len();
        Self {
            manager: model.manager().clone(),
            core: model.components().to_vec(),
            extra: model.extra_components().to_vec(),
            functions: model.functions().to_vec(),
            variables: (0..n).map(|i| model.variable_of(i).unwrap_or_default()).collect(),
            removed: vec![false; n],
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.core.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.core.len(),
            });
        }
        if self.removed[index] {
            return Err(Error::AlreadyRemoved(self.core[index].id.clone()));
        }
        Ok(())
    }

    fn active(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.core.len()).filter(|&i| !self.removed[i])
    }

    /// Number of components left in the core.
    pub fn len(&self) -> usize {
        self.active().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current function of the component at `index`.
    pub fn function(&self, index: usize) -> Result<Ref> {
        self.check_index(index)?;
        Ok(self.functions[index])
    }

    /// Remaining components whose function reads the one at `index`, itself
    /// excluded.
    fn dependents(&self, index: usize) -> Vec<usize> {
        let var = self.variables[index];
        self.active()
            .filter(|&j| j != index && self.manager.depends_on(self.functions[j], var))
            .collect()
    }

    fn self_dependent(&self, index: usize) -> bool {
        self.manager.depends_on(self.functions[index], self.variables[index])
    }

    /// Move a component to the extras without touching other functions.
    fn discard(&mut self, index: usize) {
        self.removed[index] = true;
        self.extra.push(self.core[index].clone());
    }

    /// Eliminate the component at `index` (an index of the source model).
    ///
    /// Every remaining function reading it gets its function substituted for
    /// its variable. Fails with [`Error::CyclicElimination`] if the function
    /// of the component reads the component itself.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        let id = &self.core[index].id;
        if self.self_dependent(index) {
            return Err(Error::CyclicElimination(id.clone()));
        }

        let var = self.variables[index];
        let f = self.functions[index];
        let mut updates = Vec::new();
        for j in self.dependents(index) {
            let g = self.manager.compose(self.functions[j], var, f)?;
            updates.push((j, g));
        }

        debug!("reducer: removed '{}', updated {} functions", id, updates.len());
        for (j, g) in updates {
            self.functions[j] = g;
        }
        self.discard(index);
        Ok(())
    }

    /// Remove output components and return the number of pseudo-outputs.
    ///
    /// Outputs are read by no other component and do not read themselves.
    /// Once they are gone, pseudo-outputs are the components read only by
    /// themselves or by removed components. They are removed until none is
    /// left. Outputs are removed but not counted.
    pub fn remove_pseudo_outputs(&mut self) -> Result<usize> {
        let outputs: Vec<usize> = self
            .active()
            .filter(|&i| !self.self_dependent(i) && self.dependents(i).is_empty())
            .collect();
        for &i in &outputs {
            debug!("reducer: '{}' is an output", self.core[i].id);
            self.discard(i);
        }

        let mut count = 0;
        loop {
            let pseudo: Vec<usize> = self.active().filter(|&i| self.dependents(i).is_empty()).collect();
            if pseudo.is_empty() {
                break;
            }
            for i in pseudo {
                debug!("reducer: '{}' is a pseudo-output", self.core[i].id);
                self.discard(i);
                count += 1;
            }
        }

        info!("reducer: removed {} outputs and {} pseudo-outputs", outputs.len(), count);
        Ok(count)
    }

    /// The reduced model, with a compact core.
    pub fn model(&self) -> Result<LogicalModel> {
        let kept: Vec<usize> = self.active().collect();
        let core = kept.iter().map(|&i| self.core[i].clone()).collect();
        let functions = kept.iter().map(|&i| self.functions[i]).collect();
        LogicalModel::new(self.manager.clone(), core, self.extra.clone(), functions)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::builder::ModelBuilder;
    use crate::component::ComponentRegistry;
    use crate::expression::Event;

    /// A -> B -> C, C -| A
    fn chain() -> LogicalModel {
        let mut registry = ComponentRegistry::new();
        for id in ["A", "B", "C"] {
            registry.register(id);
        }
        let mut builder = ModelBuilder::new(registry);
        builder.add_rule("A", None, [Event::ident("C"), Event::Not]).unwrap();
        builder.add_rule("B", None, [Event::ident("A")]).unwrap();
        builder.add_rule("C", None, [Event::ident("B")]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_remove_substitutes() {
        let model = chain();
        let mut reducer = ModelReducer::new(&model);
        reducer.remove(1).unwrap();
        let reduced = reducer.model().unwrap();

        let mdd = reduced.manager();
        let a = mdd.mk_var(Var::new(0)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        assert_eq!(reduced.functions(), &[mdd.apply_not(c), a]);
        assert_eq!(reduced.components()[1].id, "C");
        assert_eq!(reduced.components()[1].index, 1);
        assert_eq!(reduced.extra_components()[0].id, "B");
        assert_eq!(reduced.extra_components()[0].index, 1);

        // The source model is untouched
        assert_eq!(model.len(), 3);
        assert_eq!(model.functions()[2], mdd.mk_var(Var::new(1)).unwrap());
    }

    #[test]
    fn test_remove_uses_source_indices() {
        let model = chain();
        let mut reducer = ModelReducer::new(&model);
        reducer.remove(0).unwrap();
        reducer.remove(1).unwrap();
        assert_eq!(reducer.remove(1), Err(Error::AlreadyRemoved("B".to_string())));
        assert!(matches!(reducer.remove(3), Err(Error::IndexOutOfRange { index: 3, len: 3 })));

        // C = !C once A and B are gone
        assert_eq!(reducer.remove(2), Err(Error::CyclicElimination("C".to_string())));
        let reduced = reducer.model().unwrap();
        let mdd = reduced.manager();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        assert_eq!(reduced.functions(), &[mdd.apply_not(c)]);
        assert_eq!(reduced.extra_components().len(), 2);
    }

    #[test]
    fn test_remove_input_is_cyclic() {
        let mut registry = ComponentRegistry::new();
        registry.register("A");
        registry.register("B");
        let mut builder = ModelBuilder::new(registry);
        builder.add_rule("B", None, [Event::ident("A")]).unwrap();
        let model = builder.build().unwrap();

        let mut reducer = ModelReducer::new(&model);
        assert_eq!(reducer.remove(0), Err(Error::CyclicElimination("A".to_string())));
        assert_eq!(reducer.len(), 2);
    }

    #[test]
    fn test_no_pseudo_outputs_in_a_cycle() {
        let model = chain();
        let mut reducer = ModelReducer::new(&model);
        assert_eq!(reducer.remove_pseudo_outputs(), Ok(0));
        assert_eq!(reducer.len(), 3);
    }
}
