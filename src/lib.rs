//! # lqm-rs: qualitative regulatory network models
//!
//! **`lqm-rs`** represents the transition functions of Boolean and multivalued
//! logical models as shared multi-valued decision diagrams (MDDs), and reduces
//! such models while preserving the dynamics of the remaining components.
//!
//! ## Key Features
//!
//! - **Canonical diagrams**: all functions of a model live in one
//!   [`MddManager`][crate::mdd::MddManager]. Nodes are hash-consed, so equal
//!   functions have equal [`Ref`][crate::reference::Ref] handles.
//! - **Expression compiler**: postfix event streams produced by import formats
//!   are folded into diagrams, and signed rule rows are merged.
//! - **Reductions**: elimination of chosen components, of (pseudo-)outputs,
//!   and propagation of fixed components. Reduced models share the manager of
//!   their source model.
//!
//! ## Basic Usage
//!
//! ```rust
//! use lqm_rs::builder::ModelBuilder;
//! use lqm_rs::component::ComponentRegistry;
//! use lqm_rs::expression::Event;
//! use lqm_rs::fixed::reduce_fixed;
//!
//! // 1. Discover the components
//! let mut registry = ComponentRegistry::new();
//! for id in ["A", "B", "C"] {
//!     registry.register(id);
//! }
//!
//! // 2. Compile their rules
//! let mut builder = ModelBuilder::new(registry);
//! builder.add_rule("A", None, [Event::Constant(1)]).unwrap();
//! builder.add_rule("B", None, [Event::ident("A"), Event::ident("C"), Event::And]).unwrap();
//! let model = builder.build().unwrap();
//! assert_eq!(model.to_string(), "A: 1\nB: A & C\nC: C\n");
//!
//! // 3. Propagate the fixed value of 'A'
//! let reduced = reduce_fixed(&model, false).unwrap();
//! assert_eq!(reduced.to_string(), "A: 1\nB: C\nC: C\n");
//! ```
//!
//! ## Core Components
//!
//! - **[`mdd`]**: the diagram manager and its algorithms.
//! - **[`expression`]**: the expression compiler.
//! - **[`model`]** and **[`builder`]**: the logical model and its assembly.
//! - **[`reducer`]** and **[`fixed`]**: the reductions.
//! - **[`export`]**: the function listing.

pub mod builder;
pub mod cache;
pub mod component;
pub mod count;
pub mod dot;
pub mod error;
pub mod export;
pub mod expression;
pub mod fixed;
pub mod mdd;
pub mod model;
pub mod node;
pub mod paths;
pub mod reducer;
pub mod reference;
pub mod table;
pub mod types;
pub mod utils;
