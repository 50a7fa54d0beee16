//! Compilation of expression event streams into diagrams.
//!
//! Import formats walk their parse tree and emit [`Event`]s in postfix order:
//! operands first, then the operator consuming them. [`compile`] folds such a
//! stream over an [`ExpressionStack`] and returns the single remaining value.
//!
//! ```
//! use lqm_rs::expression::{compile, Event};
//! use lqm_rs::mdd::MddManager;
//! use lqm_rs::types::MddVariable;
//!
//! let mdd = MddManager::new([MddVariable::boolean("A"), MddVariable::boolean("B")]);
//!
//! // A & !B
//! let events = [
//!     Event::ident("A"),
//!     Event::ident("B"),
//!     Event::Not,
//!     Event::And,
//! ];
//! let f = compile(&mdd, &mdd, events).unwrap();
//! assert_eq!(mdd.eval(f, &[1, 0]), Ok(1));
//! assert_eq!(mdd.eval(f, &[1, 1]), Ok(0));
//! ```
//!
//! Several rule rows may assign the same component, each with an optional
//! [`Sign`]. They are merged by a [`RuleSet`].

use std::fmt;

use log::debug;

use crate::component::ComponentRegistry;
use crate::error::{Error, Result};
use crate::mdd::MddManager;
use crate::reference::Ref;
use crate::types::Var;

/// Comparison operator of a multivalued test.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// Check `level <op> value`.
    pub fn test(self, level: u32, value: u32) -> bool {
        match self {
            CmpOp::Eq => level == value,
            CmpOp::Ne => level != value,
            CmpOp::Lt => level < value,
            CmpOp::Le => level <= value,
            CmpOp::Gt => level > value,
            CmpOp::Ge => level >= value,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}

/// Parse event of an expression, in postfix order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Event {
    /// Test of a component: `value >= 1` (`value == 1` for Boolean ones).
    Identifier(String),
    /// Pointwise comparison of a component with a constant.
    Compare { name: String, op: CmpOp, value: u32 },
    /// Constant output value.
    Constant(u32),
    Not,
    And,
    Or,
}

impl Event {
    pub fn ident(name: impl Into<String>) -> Self {
        Event::Identifier(name.into())
    }

    pub fn compare(name: impl Into<String>, op: CmpOp, value: u32) -> Self {
        Event::Compare {
            name: name.into(),
            op,
            value,
        }
    }
}

/// Resolution of identifiers to diagram variables.
pub trait OperandResolver {
    fn resolve(&self, name: &str) -> Option<Var>;
}

impl OperandResolver for MddManager {
    fn resolve(&self, name: &str) -> Option<Var> {
        self.find_variable(name)
    }
}

/// Components resolve to the variable at their discovery position, which is
/// how managers are built from a registry.
impl OperandResolver for ComponentRegistry {
    fn resolve(&self, name: &str) -> Option<Var> {
        self.get(name).map(|c| Var::from(c.index))
    }
}

/// Operand stack of one expression.
pub struct ExpressionStack<'a, R: ?Sized> {
    mdd: &'a MddManager,
    resolver: &'a R,
    stack: Vec<Ref>,
}

impl<'a, R> ExpressionStack<'a, R>
where
    R: OperandResolver + ?Sized,
{
    pub fn new(mdd: &'a MddManager, resolver: &'a R) -> Self {
        Self {
            mdd,
            resolver,
            stack: Vec::new(),
        }
    }

    fn var(&self, name: &str) -> Result<Var> {
        self.resolver
            .resolve(name)
            .ok_or_else(|| Error::UnknownIdentifier(name.to_string()))
    }

    fn pop(&mut self, op: &str) -> Result<Ref> {
        self.stack
            .pop()
            .ok_or_else(|| Error::MalformedExpression(format!("missing operand for {}", op)))
    }

    pub fn push(&mut self, event: Event) -> Result<()> {
        debug!("stack: {:?} on {} operands", event, self.stack.len());
        let res = match event {
            Event::Identifier(name) => {
                let var = self.var(&name)?;
                self.mdd.mk_var(var)?
            }
            Event::Compare { name, op, value } => {
                let var = self.var(&name)?;
                self.mdd.mk_test(var, |level| op.test(level, value))?
            }
            Event::Constant(value) => self.mdd.leaf(value)?,
            Event::Not => {
                let f = self.pop("NOT")?;
                self.mdd.apply_not(f)
            }
            Event::And => {
                let g = self.pop("AND")?;
                let f = self.pop("AND")?;
                self.mdd.apply_and(f, g)
            }
            Event::Or => {
                let g = self.pop("OR")?;
                let f = self.pop("OR")?;
                self.mdd.apply_or(f, g)
            }
        };
        self.stack.push(res);
        Ok(())
    }

    /// Finish the expression: exactly one value must remain.
    pub fn done(mut self) -> Result<Ref> {
        match self.stack.len() {
            1 => Ok(self.stack.remove(0)),
            0 => Err(Error::MalformedExpression("empty expression".to_string())),
            n => Err(Error::MalformedExpression(format!("{} values left on the stack", n))),
        }
    }
}

/// Compile a postfix event stream into a diagram.
pub fn compile<R>(mdd: &MddManager, resolver: &R, events: impl IntoIterator<Item = Event>) -> Result<Ref>
where
    R: OperandResolver + ?Sized,
{
    let mut stack = ExpressionStack::new(mdd, resolver);
    for event in events {
        stack.push(event)?;
    }
    let res = stack.done()?;
    debug!("compiled expression to {}", res);
    Ok(res)
}

/// Sign of a rule row.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

/// Signed rule rows assigning the same component.
///
/// Rows of the same sign are OR-ed. The merged function is `positive` when
/// only positive rows exist, `!negative` when only negative rows exist, and
/// `positive & !negative` otherwise.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct RuleSet {
    positive: Option<Ref>,
    negative: Option<Ref>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mdd: &MddManager, sign: Sign, f: Ref) {
        let slot = match sign {
            Sign::Positive => &mut self.positive,
            Sign::Negative => &mut self.negative,
        };
        *slot = Some(match *slot {
            Some(current) => mdd.apply_or(current, f),
            None => f,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_none() && self.negative.is_none()
    }

    /// Merged function, `None` when no row was added.
    pub fn resolve(&self, mdd: &MddManager) -> Option<Ref> {
        match (self.positive, self.negative) {
            (None, None) => None,
            (Some(pos), None) => Some(pos),
            (None, Some(neg)) => Some(mdd.apply_not(neg)),
            (Some(pos), Some(neg)) => Some(mdd.apply_and(pos, mdd.apply_not(neg))),
        }
    }
}
