use std::fmt::{Display, Formatter};

/// Handle to a node owned by an [`MddManager`][crate::mdd::MddManager].
///
/// Leaves are encoded directly in the handle (one handle per value), internal
/// nodes store their index in the manager's unique table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(u32);

const LEAF_FLAG: u32 = 1 << 31;

impl Ref {
    pub(crate) const fn leaf(value: u32) -> Self {
        assert!(value < LEAF_FLAG, "Leaf value is too large");
        Self(value | LEAF_FLAG)
    }

    pub(crate) const fn node(index: u32) -> Self {
        assert!(index != 0, "Index is 0");
        assert!(index < LEAF_FLAG, "Node index is too large");
        Self(index)
    }

    pub const fn is_leaf(self) -> bool {
        self.0 & LEAF_FLAG != 0
    }

    /// Return the value of a leaf handle.
    pub const fn value(self) -> Option<u32> {
        if self.is_leaf() {
            Some(self.0 & !LEAF_FLAG)
        } else {
            None
        }
    }

    /// Return the storage index of an internal node.
    pub const fn index(self) -> Option<usize> {
        if self.is_leaf() {
            None
        } else {
            Some(self.0 as usize)
        }
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(value) => write!(f, "#{}", value),
            None => write!(f, "@{}", self.0),
        }
    }
}
