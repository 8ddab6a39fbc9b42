//! Quadruple intermediate representation.
//!
//! Every instruction has at most two operands and one result location.
//! Temporaries and labels are numbered once per program, so `t3` or `L2`
//! names exactly one value or jump target across all functions.

use std::fmt::Display;

use crate::ast::{
    expressions::{ArithOp, Literal, RelOp, UnaryOp},
    types::Type,
};

/// A generated write-once value, printed as `t<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Temp(pub usize);

impl Display for Temp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A jump target, printed as `L<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub usize);

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    Variable(String),
    Temp(Temp),
}

impl Operand {
    pub fn as_temp(&self) -> Option<Temp> {
        match self {
            Operand::Temp(temp) => Some(*temp),
            _ => None,
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Literal(literal) => write!(f, "{}", literal),
            Operand::Variable(name) => write!(f, "{}", name),
            Operand::Temp(temp) => write!(f, "{}", temp),
        }
    }
}

impl From<Temp> for Operand {
    fn from(temp: Temp) -> Self {
        Operand::Temp(temp)
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Literal(Literal::Bool(value))
    }
}

impl From<Literal> for Operand {
    fn from(literal: Literal) -> Self {
        Operand::Literal(literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Quadruple {
    BinaryOp {
        operator: ArithOp,
        left: Operand,
        right: Operand,
        result: Temp,
    },
    UnaryOp {
        operator: UnaryOp,
        operand: Operand,
        result: Temp,
    },
    /// Comparisons.
    LogicalOp {
        operator: RelOp,
        left: Operand,
        right: Operand,
        result: Temp,
    },
    Assign {
        target: Operand,
        value: Operand,
    },
    FunctionCall {
        name: String,
        args: Vec<Operand>,
        result: Option<Temp>,
    },
    Label(Label),
    Jump(Label),
    /// Jumps to `target` when `condition` is false.
    ConditionalJump {
        condition: Operand,
        target: Label,
    },
    Return(Option<Operand>),
    FunctionDefinition {
        name: String,
        params: Vec<(Type, String)>,
    },
    EndFunction(String),
}

impl Quadruple {
    /// The temp this instruction produces, if any. `Assign` never produces
    /// one; it only writes to a join temp allocated earlier.
    pub fn produced_temp(&self) -> Option<Temp> {
        match self {
            Quadruple::BinaryOp { result, .. }
            | Quadruple::UnaryOp { result, .. }
            | Quadruple::LogicalOp { result, .. } => Some(*result),
            Quadruple::FunctionCall { result, .. } => *result,
            _ => None,
        }
    }

    /// Every operand the instruction reads.
    pub fn used_operands(&self) -> Vec<&Operand> {
        match self {
            Quadruple::BinaryOp { left, right, .. } | Quadruple::LogicalOp { left, right, .. } => {
                vec![left, right]
            }
            Quadruple::UnaryOp { operand, .. } => vec![operand],
            Quadruple::Assign { value, .. } => vec![value],
            Quadruple::FunctionCall { args, .. } => args.iter().collect(),
            Quadruple::ConditionalJump { condition, .. } => vec![condition],
            Quadruple::Return(Some(value)) => vec![value],
            Quadruple::Return(None)
            | Quadruple::Label(_)
            | Quadruple::Jump(_)
            | Quadruple::FunctionDefinition { .. }
            | Quadruple::EndFunction(_) => vec![],
        }
    }
}

impl Display for Quadruple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quadruple::BinaryOp {
                operator,
                left,
                right,
                result,
            } => write!(f, "{} = {} {} {}", result, left, operator, right),
            Quadruple::UnaryOp {
                operator,
                operand,
                result,
            } => write!(f, "{} = {}{}", result, operator, operand),
            Quadruple::LogicalOp {
                operator,
                left,
                right,
                result,
            } => write!(f, "{} = {} {} {}", result, left, operator, right),
            Quadruple::Assign { target, value } => write!(f, "{} = {}", target, value),
            Quadruple::FunctionCall { name, args, result } => {
                let args = args
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                match result {
                    Some(result) => write!(f, "{} = call {}({})", result, name, args),
                    None => write!(f, "call {}({})", name, args),
                }
            }
            Quadruple::Label(label) => write!(f, "{}:", label),
            Quadruple::Jump(label) => write!(f, "goto {}", label),
            Quadruple::ConditionalJump { condition, target } => {
                write!(f, "if_false {} goto {}", condition, target)
            }
            Quadruple::Return(Some(value)) => write!(f, "return {}", value),
            Quadruple::Return(None) => write!(f, "return"),
            Quadruple::FunctionDefinition { name, params } => {
                let params = params
                    .iter()
                    .map(|(ty, name)| format!("{} {}", ty, name))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "function {}({}):", name, params)
            }
            Quadruple::EndFunction(name) => write!(f, "end {}", name),
        }
    }
}

/// The ordered instruction stream of a whole program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IrProgram {
    pub quadruples: Vec<Quadruple>,
}

impl IrProgram {
    pub fn new(quadruples: Vec<Quadruple>) -> Self {
        IrProgram { quadruples }
    }

    pub fn len(&self) -> usize {
        self.quadruples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quadruples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quadruple> {
        self.quadruples.iter()
    }

    /// The instructions between `FunctionDefinition(name)` and its
    /// `EndFunction`, both included.
    pub fn function(&self, name: &str) -> Option<&[Quadruple]> {
        let start = self.quadruples.iter().position(|quad| {
            matches!(quad, Quadruple::FunctionDefinition { name: defined, .. } if defined == name)
        })?;
        let length = self.quadruples[start..]
            .iter()
            .position(|quad| matches!(quad, Quadruple::EndFunction(ended) if ended == name))?;

        Some(&self.quadruples[start..=start + length])
    }
}

impl Display for IrProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for quad in &self.quadruples {
            match quad {
                Quadruple::Label(_) | Quadruple::FunctionDefinition { .. } | Quadruple::EndFunction(_) => {
                    writeln!(f, "{}", quad)?
                }
                _ => writeln!(f, "    {}", quad)?,
            }
        }
        Ok(())
    }
}
