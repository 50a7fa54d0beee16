//! Plain listing of the functions of a model.
//!
//! One line per core component, `id: function`. Fixed functions print their
//! value. Other functions print a disjunction of the paths leading to non-zero
//! values, each path being a conjunction of literals:
//!
//! - `!A` when `A` is at level 0,
//! - `A` when the Boolean `A` is at level 1,
//! - `A:v` when the multivalued `A` is at level `v`.
//!
//! Multivalued components print one line per reachable non-zero value, as
//! `id:v: function`.

use std::fmt;

use crate::mdd::MddManager;
use crate::model::LogicalModel;
use crate::reference::Ref;

fn write_literal<W: fmt::Write>(mdd: &MddManager, index: usize, value: i32, out: &mut W) -> fmt::Result {
    let variable = &mdd.variables()[index];
    if value == 0 {
        write!(out, "!{}", variable.key)
    } else if variable.is_boolean() {
        write!(out, "{}", variable.key)
    } else {
        write!(out, "{}:{}", variable.key, value)
    }
}

/// Write the paths of `f` leading to `value` as a disjunction of conjunctions.
fn write_dnf<W: fmt::Write>(mdd: &MddManager, f: Ref, value: u32, out: &mut W) -> fmt::Result {
    let clauses: Vec<Vec<i32>> = mdd.paths_to(f, value).map(|(cube, _)| cube).collect();
    let multiple = clauses.len() > 1;
    for (i, cube) in clauses.iter().enumerate() {
        if i > 0 {
            write!(out, " | ")?;
        }
        if multiple {
            write!(out, "(")?;
        }
        let mut first = true;
        for (index, &cst) in cube.iter().enumerate() {
            if cst < 0 {
                continue;
            }
            if !first {
                write!(out, " & ")?;
            }
            write_literal(mdd, index, cst, out)?;
            first = false;
        }
        if multiple {
            write!(out, ")")?;
        }
    }
    Ok(())
}

/// Write the function listing of the core components of `model`.
pub fn write_functions<W: fmt::Write>(model: &LogicalModel, out: &mut W) -> fmt::Result {
    let mdd = model.manager();
    for (component, &f) in model.components().iter().zip(model.functions()) {
        if mdd.is_leaf(f) {
            let value = mdd.leaf_value(f).map_err(|_| fmt::Error)?;
            writeln!(out, "{}: {}", component.id, value)?;
            continue;
        }

        if component.is_boolean() {
            write!(out, "{}: ", component.id)?;
            write_dnf(mdd, f, 1, out)?;
            writeln!(out)?;
            continue;
        }

        for value in 1..=component.max_value {
            if mdd.paths_to(f, value).next().is_none() {
                continue;
            }
            write!(out, "{}:{}: ", component.id, value)?;
            write_dnf(mdd, f, value, out)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Function listing as a string.
pub fn functions_to_string(model: &LogicalModel) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_functions(model, &mut out);
    out
}
