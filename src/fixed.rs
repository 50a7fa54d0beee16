//! Propagation of fixed components.

use std::collections::HashMap;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::model::LogicalModel;
use crate::types::Var;

/// Propagate the values of constant functions through the model.
///
/// Every function is restricted by the values of the fixed components, which
/// may fix more components, until a fixed point is reached.
///
/// With `purge == false` the model keeps its structure: fixed components stay
/// in the core with their constant function. With `purge == true` they move
/// to the extra components and the core is renumbered.
///
/// Functions that do not read any fixed component keep the same reference.
pub fn reduce_fixed(model: &LogicalModel, purge: bool) -> Result<LogicalModel> {
    let mdd = model.manager();
    let mut functions = model.functions().to_vec();
    let mut known: HashMap<Var, u32> = HashMap::new();
    let bound = model.len() + 1;

    let mut converged = false;
    for iteration in 0..bound {
        let mut fresh = HashMap::new();
        for (i, f) in functions.iter().enumerate() {
            if let Some(value) = f.value() {
                let var = model.variable_of(i)?;
                if !known.contains_key(&var) {
                    fresh.insert(var, value);
                }
            }
        }
        if fresh.is_empty() {
            converged = true;
            break;
        }

        debug!("fixed: iteration {}, {} new fixed components", iteration, fresh.len());
        known.extend(fresh);
        for f in functions.iter_mut() {
            if !f.is_leaf() {
                *f = mdd.restrict_multi(*f, &known)?;
            }
        }
    }
    if !converged {
        return Err(Error::IterationLimit(bound));
    }
    info!("fixed: {} of {} components are fixed", known.len(), model.len());

    if !purge {
        return LogicalModel::new(
            mdd.clone(),
            model.components().to_vec(),
            model.extra_components().to_vec(),
            functions,
        );
    }

    let mut core = Vec::new();
    let mut kept = Vec::new();
    let mut extra = model.extra_components().to_vec();
    for (component, f) in model.components().iter().zip(functions) {
        if f.is_leaf() {
            extra.push(component.clone());
        } else {
            core.push(component.clone());
            kept.push(f);
        }
    }
    LogicalModel::new(mdd.clone(), core, extra, kept)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::builder::ModelBuilder;
    use crate::component::ComponentRegistry;
    use crate::expression::Event;

    /// A = 1, B = A, C = B & D, D = D
    fn cascade() -> LogicalModel {
        let mut registry = ComponentRegistry::new();
        for id in ["A", "B", "C", "D"] {
            registry.register(id);
        }
        let mut builder = ModelBuilder::new(registry);
        builder.add_rule("A", None, [Event::Constant(1)]).unwrap();
        builder.add_rule("B", None, [Event::ident("A")]).unwrap();
        builder
            .add_rule("C", None, [Event::ident("B"), Event::ident("D"), Event::And])
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_cascade() {
        let model = cascade();
        let reduced = reduce_fixed(&model, false).unwrap();
        let mdd = reduced.manager();
        let d = mdd.mk_var(Var::new(3)).unwrap();

        assert_eq!(reduced.functions(), &[mdd.one(), mdd.one(), d, d]);
        assert_eq!(reduced.len(), 4);
        assert!(reduced.extra_components().is_empty());
    }

    #[test]
    fn test_purge() {
        let model = cascade();
        let reduced = reduce_fixed(&model, true).unwrap();
        let ids: Vec<&str> = reduced.components().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "D"]);
        assert_eq!(reduced.components()[0].index, 0);
        let extra: Vec<&str> = reduced.extra_components().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(extra, vec!["A", "B"]);
    }

    #[test]
    fn test_nothing_fixed() {
        let mut registry = ComponentRegistry::new();
        registry.register("A");
        let model = ModelBuilder::new(registry).build().unwrap();
        let reduced = reduce_fixed(&model, true).unwrap();
        assert_eq!(reduced.functions(), model.functions());
    }
}
