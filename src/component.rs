//! Model components and the registry that discovers them.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use log::debug;

use crate::error::{Error, Result};
use crate::types::MddVariable;

/// A modeled variable: an identifier and a range of levels `0..=max_value`.
///
/// Identity is the `id`: two components with the same id are equal whatever
/// their `index`.
#[derive(Debug, Clone)]
pub struct Component {
    pub id: String,
    /// Highest level. `1` for Boolean components.
    pub max_value: u32,
    /// Position in the owning list.
    pub index: usize,
}

impl Component {
    pub fn new(id: impl Into<String>, max_value: u32, index: usize) -> Self {
        Self {
            id: id.into(),
            max_value: max_value.max(1),
            index,
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.max_value == 1
    }

    pub fn nbval(&self) -> u32 {
        self.max_value + 1
    }

    /// Copy of this component at another position.
    pub fn with_index(&self, index: usize) -> Self {
        Self {
            index,
            ..self.clone()
        }
    }

    /// The diagram variable standing for this component.
    pub fn to_variable(&self) -> MddVariable {
        MddVariable::new(self.id.clone(), self.nbval())
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Component {}

impl Hash for Component {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Discovery-ordered set of components.
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    components: Vec<Component>,
    ids: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the component with the given id, creating a Boolean one at the
    /// end of the discovery order if it is new.
    pub fn register(&mut self, id: &str) -> &Component {
        let index = match self.ids.get(id) {
            Some(&index) => index,
            None => {
                let index = self.components.len();
                debug!("registry: new component '{}' at {}", id, index);
                self.components.push(Component::new(id, 1, index));
                self.ids.insert(id.to_string(), index);
                index
            }
        };
        &self.components[index]
    }

    /// Raise the highest level of a registered component.
    pub fn set_max_value(&mut self, id: &str, max_value: u32) -> Result<()> {
        let index = *self.ids.get(id).ok_or_else(|| Error::UnknownComponent(id.to_string()))?;
        let component = &mut self.components[index];
        if max_value < component.max_value {
            return Err(Error::LoweredMaxValue {
                id: id.to_string(),
                current: component.max_value,
                requested: max_value,
            });
        }
        component.max_value = max_value;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.ids.get(id).map(|&index| &self.components[index])
    }

    /// Components in discovery order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
