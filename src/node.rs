use crate::reference::Ref;
use crate::types::Var;
use crate::utils::{pairing_many, MyHash};

/// Internal decision node: one child per value of `variable`.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Node {
    pub variable: Var,
    pub children: Box<[Ref]>,
}

impl Node {
    pub fn new(variable: Var, children: impl Into<Box<[Ref]>>) -> Self {
        Self {
            variable,
            children: children.into(),
        }
    }

    pub fn child(&self, value: u32) -> Ref {
        self.children[value as usize]
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing_many(
            self.variable.id() as u64,
            self.children.iter().map(|c| c.get() as u64),
        )
    }
}
