use std::rc::Rc;

use log::{debug, info};

use crate::component::ComponentRegistry;
use crate::error::{Error, Result};
use crate::expression::{compile, Event, RuleSet, Sign};
use crate::mdd::{MddConfig, MddManager};
use crate::model::LogicalModel;
use crate::reference::Ref;
use crate::types::Var;

/// Collects the functions of the components of a registry and assembles a
/// [`LogicalModel`].
///
/// The manager is created from the registry, in discovery order, so all
/// components must be registered (and their max values raised) first.
///
/// ```
/// use lqm_rs::builder::ModelBuilder;
/// use lqm_rs::component::ComponentRegistry;
/// use lqm_rs::expression::{Event, Sign};
///
/// let mut registry = ComponentRegistry::new();
/// registry.register("A");
/// registry.register("B");
///
/// let mut builder = ModelBuilder::new(registry);
/// builder.add_rule("B", Some(Sign::Positive), [Event::ident("A")]).unwrap();
/// let model = builder.build().unwrap();
///
/// // 'A' has no rule: it keeps its level
/// assert_eq!(model.regulators(0).unwrap(), vec![0]);
/// assert_eq!(model.regulators(1).unwrap(), vec![0]);
/// ```
pub struct ModelBuilder {
    registry: ComponentRegistry,
    manager: Rc<MddManager>,
    rules: Vec<RuleSet>,
    assigned: Vec<Option<Ref>>,
}

impl ModelBuilder {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self::with_config(registry, MddConfig::default())
    }

    pub fn with_config(registry: ComponentRegistry, config: MddConfig) -> Self {
        let variables = registry.components().iter().map(|c| c.to_variable());
        let manager = Rc::new(MddManager::with_config(variables, config));
        let n = registry.len();
        Self {
            registry,
            manager,
            rules: vec![RuleSet::new(); n],
            assigned: vec![None; n],
        }
    }

    pub fn manager(&self) -> &MddManager {
        &self.manager
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.registry
            .get(id)
            .map(|c| c.index)
            .ok_or_else(|| Error::UnknownComponent(id.to_string()))
    }

    /// Check that `f` only produces levels of the component at `index`.
    fn check_range(&self, index: usize, f: Ref) -> Result<()> {
        let max_value = self.registry.components()[index].max_value;
        match self.manager.leaves(f).into_iter().find(|&v| v > max_value) {
            Some(value) => Err(Error::InvalidValue { value, max: max_value }),
            None => Ok(()),
        }
    }

    /// Compile one rule row of a component. Rows without a sign are positive.
    ///
    /// A failing row leaves the rules collected so far untouched.
    pub fn add_rule(&mut self, id: &str, sign: Option<Sign>, events: impl IntoIterator<Item = Event>) -> Result<()> {
        let index = self.index_of(id)?;
        let f = compile(&self.manager, &self.registry, events)?;
        self.check_range(index, f)?;
        let sign = sign.unwrap_or(Sign::Positive);
        debug!("rule for '{}' ({:?}): {}", id, sign, f);
        self.rules[index].add(&self.manager, sign, f);
        Ok(())
    }

    /// Assign the function of a component directly, overriding its rules.
    pub fn set_function(&mut self, id: &str, f: Ref) -> Result<()> {
        let index = self.index_of(id)?;
        self.check_range(index, f)?;
        self.assigned[index] = Some(f);
        Ok(())
    }

    /// Assemble the model. Components without any function keep their
    /// current level.
    pub fn build(self) -> Result<LogicalModel> {
        let mut functions = Vec::with_capacity(self.registry.len());
        for (i, component) in self.registry.components().iter().enumerate() {
            let f = match self.assigned[i].or_else(|| self.rules[i].resolve(&self.manager)) {
                Some(f) => f,
                None => {
                    debug!("'{}' has no rule, using its identity", component.id);
                    self.manager.mk_identity(Var::from(i))?
                }
            };
            functions.push(f);
        }
        info!(
            "built model with {} components, {} nodes",
            functions.len(),
            self.manager.num_nodes()
        );
        LogicalModel::new(self.manager, self.registry.components().to_vec(), Vec::new(), functions)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        for id in ["A", "B", "C"] {
            registry.register(id);
        }
        registry.set_max_value("C", 2).unwrap();
        registry
    }

    #[test]
    fn test_inputs_keep_their_level() {
        let builder = ModelBuilder::new(registry());
        let model = builder.build().unwrap();
        let mdd = model.manager();
        for (i, &f) in model.functions().iter().enumerate() {
            assert_eq!(f, mdd.mk_identity(Var::from(i)).unwrap());
        }
    }

    #[test]
    fn test_signed_rules() {
        let mut builder = ModelBuilder::new(registry());
        builder.add_rule("A", None, [Event::ident("B")]).unwrap();
        builder.add_rule("A", Some(Sign::Negative), [Event::ident("C")]).unwrap();
        let model = builder.build().unwrap();

        let mdd = model.manager();
        let b = mdd.mk_var(Var::new(1)).unwrap();
        let c = mdd.mk_var(Var::new(2)).unwrap();
        assert_eq!(model.functions()[0], mdd.apply_and(b, mdd.apply_not(c)));
    }

    #[test]
    fn test_failed_rule_is_dropped() {
        let mut builder = ModelBuilder::new(registry());
        builder.add_rule("A", None, [Event::ident("B")]).unwrap();
        assert!(builder.add_rule("A", None, [Event::ident("B"), Event::Or]).is_err());
        assert!(builder.add_rule("A", None, [Event::ident("Z")]).is_err());
        assert_eq!(
            builder.add_rule("A", None, [Event::Constant(2)]),
            Err(Error::InvalidValue { value: 2, max: 1 })
        );
        assert_eq!(
            builder.add_rule("Z", None, [Event::ident("A")]),
            Err(Error::UnknownComponent("Z".to_string()))
        );
        let model = builder.build().unwrap();

        let b = model.manager().mk_var(Var::new(1)).unwrap();
        assert_eq!(model.functions()[0], b);
    }

    #[test]
    fn test_set_function() {
        let mut builder = ModelBuilder::new(registry());
        let two = builder.manager().leaf(2).unwrap();
        assert!(matches!(builder.set_function("A", two), Err(Error::InvalidValue { value: 2, max: 1 })));
        builder.set_function("C", two).unwrap();
        let model = builder.build().unwrap();
        assert_eq!(model.is_fixed(&model.components()[2]), Some(2));
    }
}
