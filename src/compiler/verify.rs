//! Structural checks over generated quadruples.
//!
//! The generator is trusted to produce well formed output; this pass
//! catches it when it does not. Every failure is an internal error.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::errors::errors::Error;

use super::ir::{IrProgram, Label, Operand, Quadruple, Temp};

#[derive(Default)]
struct FunctionState {
    name: String,
    defined: HashSet<Temp>,
    labels: HashSet<Label>,
    jumps: Vec<(usize, Label)>,
}

/// Checks that
/// - every instruction sits between a `FunctionDefinition` and the
///   `EndFunction` of the same name, with no nesting
/// - every temp is defined earlier in the same function than any use
/// - a temp produced by an operation is produced once and never assigned
/// - a temp written by `Assign` belongs to a single function
/// - labels are unique and every jump target is a label of its function
pub fn verify(ir: &IrProgram) -> Result<(), Error> {
    let mut produced: HashSet<Temp> = HashSet::new();
    let mut join_owners: HashMap<Temp, String> = HashMap::new();
    let mut all_labels: HashSet<Label> = HashSet::new();
    let mut current: Option<FunctionState> = None;

    for (index, quad) in ir.iter().enumerate() {
        if let Quadruple::FunctionDefinition { name, .. } = quad {
            if let Some(open) = &current {
                return Err(Error::internal(format!(
                    "quad {}: `{}` starts before `{}` ends",
                    index, name, open.name
                )));
            }
            current = Some(FunctionState {
                name: name.clone(),
                ..FunctionState::default()
            });
            continue;
        }

        let Some(function) = current.as_mut() else {
            return Err(Error::internal(format!(
                "quad {}: `{}` is outside of any function",
                index, quad
            )));
        };

        for operand in quad.used_operands() {
            if let Some(temp) = operand.as_temp() {
                if !function.defined.contains(&temp) {
                    return Err(Error::internal(format!(
                        "quad {}: {} used before definition in `{}`",
                        index, temp, function.name
                    )));
                }
            }
        }

        if let Some(temp) = quad.produced_temp() {
            if !produced.insert(temp) || join_owners.contains_key(&temp) {
                return Err(Error::internal(format!(
                    "quad {}: {} is defined more than once",
                    index, temp
                )));
            }
            function.defined.insert(temp);
        }

        match quad {
            Quadruple::Assign {
                target: Operand::Temp(temp),
                ..
            } => {
                if produced.contains(temp) {
                    return Err(Error::internal(format!(
                        "quad {}: {} is produced by an operation and assigned",
                        index, temp
                    )));
                }
                let owner = join_owners
                    .entry(*temp)
                    .or_insert_with(|| function.name.clone());
                if *owner != function.name {
                    return Err(Error::internal(format!(
                        "quad {}: {} is assigned in both `{}` and `{}`",
                        index, temp, owner, function.name
                    )));
                }
                function.defined.insert(*temp);
            }
            Quadruple::Label(label) => {
                if !all_labels.insert(*label) {
                    return Err(Error::internal(format!(
                        "quad {}: label {} is defined more than once",
                        index, label
                    )));
                }
                function.labels.insert(*label);
            }
            Quadruple::Jump(target) | Quadruple::ConditionalJump { target, .. } => {
                function.jumps.push((index, *target));
            }
            Quadruple::EndFunction(name) => {
                if *name != function.name {
                    return Err(Error::internal(format!(
                        "quad {}: `end {}` closes `{}`",
                        index, name, function.name
                    )));
                }
                if let Some((jump_index, target)) = function
                    .jumps
                    .iter()
                    .find(|(_, target)| !function.labels.contains(target))
                {
                    return Err(Error::internal(format!(
                        "quad {}: jump to {} which is not a label of `{}`",
                        jump_index, target, function.name
                    )));
                }
                debug!("verified `{}`", function.name);
                current = None;
            }
            _ => {}
        }
    }

    if let Some(open) = current {
        return Err(Error::internal(format!("`{}` is never ended", open.name)));
    }

    Ok(())
}
