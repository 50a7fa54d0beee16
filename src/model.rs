//! The logical model: ordered components and their transition functions.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::export::write_functions;
use crate::mdd::MddManager;
use crate::reference::Ref;
use crate::types::Var;

/// Core components with one function each, plus the extra (removed)
/// components, all backed by one shared [`MddManager`].
///
/// A model is never modified once built. Reductions return new models sharing
/// the same manager, so diagrams of the source model stay valid and can be
/// compared by reference.
#[derive(Clone)]
pub struct LogicalModel {
    manager: Rc<MddManager>,
    core: Vec<Component>,
    extra: Vec<Component>,
    functions: Vec<Ref>,
    variables: Vec<Var>,
}

impl LogicalModel {
    /// Assemble a model. Core components are renumbered to their position;
    /// extra components keep their index.
    ///
    /// Each function may only produce levels of its own component.
    pub fn new(manager: Rc<MddManager>, core: Vec<Component>, extra: Vec<Component>, functions: Vec<Ref>) -> Result<Self> {
        if core.len() != functions.len() {
            return Err(Error::FunctionCountMismatch {
                components: core.len(),
                functions: functions.len(),
            });
        }

        let mut seen = HashSet::new();
        for component in core.iter().chain(extra.iter()) {
            if !seen.insert(component.id.as_str()) {
                return Err(Error::DuplicateComponent(component.id.clone()));
            }
            manager
                .find_variable(&component.id)
                .ok_or_else(|| Error::UnknownVariable(component.id.clone()))?;
        }
        for (component, &f) in core.iter().zip(functions.iter()) {
            let max = component.max_value;
            if let Some(value) = manager.leaves(f).into_iter().find(|&v| v > max) {
                return Err(Error::InvalidValue { value, max });
            }
        }

        let core: Vec<Component> = core.iter().enumerate().map(|(i, c)| c.with_index(i)).collect();
        let variables = core
            .iter()
            .map(|c| manager.find_variable(&c.id).unwrap_or_default())
            .collect();

        Ok(Self {
            manager,
            core,
            extra,
            functions,
            variables,
        })
    }

    pub fn manager(&self) -> &Rc<MddManager> {
        &self.manager
    }
    pub fn components(&self) -> &[Component] {
        &self.core
    }
    pub fn extra_components(&self) -> &[Component] {
        &self.extra
    }
    pub fn functions(&self) -> &[Ref] {
        &self.functions
    }
    pub fn len(&self) -> usize {
        self.core.len()
    }
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Position of a core component.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.core.iter().position(|c| c.id == id)
    }

    pub fn component(&self, index: usize) -> Result<&Component> {
        self.core.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.core.len(),
        })
    }

    /// Diagram variable of the core component at `index`.
    pub fn variable_of(&self, index: usize) -> Result<Var> {
        self.variables.get(index).copied().ok_or(Error::IndexOutOfRange {
            index,
            len: self.core.len(),
        })
    }

    pub fn get_function(&self, component: &Component) -> Result<Ref> {
        self.position(&component.id)
            .map(|index| self.functions[index])
            .ok_or_else(|| Error::UnknownComponent(component.id.clone()))
    }

    /// Constant value of the component's function, if it is fixed.
    pub fn is_fixed(&self, component: &Component) -> Option<u32> {
        self.get_function(component).ok().and_then(|f| f.value())
    }

    /// Core components whose level is read by the function at `index`.
    pub fn regulators(&self, index: usize) -> Result<Vec<usize>> {
        let f = *self.functions.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.core.len(),
        })?;
        let support = self.manager.support(f);
        Ok((0..self.core.len())
            .filter(|&i| support.contains(&self.variables[i]))
            .collect())
    }

    /// Core components whose function reads the level of the one at `index`.
    pub fn targets(&self, index: usize) -> Result<Vec<usize>> {
        let var = self.variable_of(index)?;
        Ok(self
            .functions
            .iter()
            .enumerate()
            .filter(|&(_, &f)| self.manager.depends_on(f, var))
            .map(|(i, _)| i)
            .collect())
    }
}

impl fmt::Debug for LogicalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogicalModel")
            .field("core", &self.core.iter().map(|c| &c.id).collect::<Vec<_>>())
            .field("extra", &self.extra.iter().map(|c| &c.id).collect::<Vec<_>>())
            .field("functions", &self.functions)
            .finish()
    }
}

impl fmt::Display for LogicalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_functions(self, f)
    }
}
