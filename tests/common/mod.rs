//! A small interpreter over generated quadruples.
//!
//! Used to observe what the emitted code does at run time: which functions
//! get called, what is printed and what `main` returns.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use latte_midend::{
    ast::expressions::{ArithOp, Literal, RelOp, UnaryOp},
    compiler::ir::{IrProgram, Label, Operand, Quadruple, Temp},
};

const STEP_LIMIT: usize = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Str(String),
}

impl Value {
    fn as_int(&self) -> Result<i32, String> {
        match self {
            Value::Int(value) => Ok(*value),
            other => Err(format!("expected an int, found {:?}", other)),
        }
    }

    fn as_bool(&self) -> Result<bool, String> {
        match self {
            Value::Bool(value) => Ok(*value),
            other => Err(format!("expected a boolean, found {:?}", other)),
        }
    }

    fn as_str(&self) -> Result<&str, String> {
        match self {
            Value::Str(value) => Ok(value),
            other => Err(format!("expected a string, found {:?}", other)),
        }
    }
}

#[derive(Default)]
struct Frame {
    locals: HashMap<String, Value>,
    temps: HashMap<Temp, Value>,
}

impl Frame {
    fn eval(&self, operand: &Operand) -> Result<Value, String> {
        match operand {
            Operand::Literal(Literal::Int(value)) => Ok(Value::Int(*value)),
            Operand::Literal(Literal::Bool(value)) => Ok(Value::Bool(*value)),
            Operand::Literal(Literal::Str(value)) => Ok(Value::Str(value.clone())),
            Operand::Variable(name) => self
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| format!("read of unset variable `{}`", name)),
            Operand::Temp(temp) => self
                .temps
                .get(temp)
                .cloned()
                .ok_or_else(|| format!("read of unset {}", temp)),
        }
    }

    fn write(&mut self, target: &Operand, value: Value) -> Result<(), String> {
        match target {
            Operand::Variable(name) => {
                self.locals.insert(name.clone(), value);
                Ok(())
            }
            Operand::Temp(temp) => {
                self.temps.insert(*temp, value);
                Ok(())
            }
            Operand::Literal(literal) => Err(format!("assignment to literal {}", literal)),
        }
    }
}

pub struct Simulator<'a> {
    ir: &'a IrProgram,
    /// Index of each function's definition and of its end.
    functions: HashMap<String, (usize, usize)>,
    input: VecDeque<String>,
    steps: usize,
    /// Every function called, in call order, built-ins included.
    pub calls: Vec<String>,
    /// Everything printed by `printInt` and `printString`.
    pub output: Vec<String>,
}

impl<'a> Simulator<'a> {
    pub fn new(ir: &'a IrProgram) -> Self {
        let mut functions = HashMap::new();
        let mut open: Option<(String, usize)> = None;

        for (index, quad) in ir.iter().enumerate() {
            match quad {
                Quadruple::FunctionDefinition { name, .. } => open = Some((name.clone(), index)),
                Quadruple::EndFunction(_) => {
                    if let Some((name, start)) = open.take() {
                        functions.insert(name, (start, index));
                    }
                }
                _ => {}
            }
        }

        Simulator {
            ir,
            functions,
            input: VecDeque::new(),
            steps: 0,
            calls: Vec::new(),
            output: Vec::new(),
        }
    }

    pub fn with_input(mut self, lines: &[&str]) -> Self {
        self.input = lines.iter().map(|line| line.to_string()).collect();
        self
    }

    pub fn run_main(&mut self) -> Result<Option<Value>, String> {
        self.run("main", vec![])
    }

    pub fn was_called(&self, name: &str) -> bool {
        self.calls.iter().any(|called| called == name)
    }

    pub fn run(&mut self, name: &str, args: Vec<Value>) -> Result<Option<Value>, String> {
        let (start, end) = *self
            .functions
            .get(name)
            .ok_or_else(|| format!("no function `{}` in the program", name))?;
        let ir = self.ir;
        let quads = &ir.quadruples;

        let mut frame = Frame::default();
        if let Quadruple::FunctionDefinition { params, .. } = &quads[start] {
            if params.len() != args.len() {
                return Err(format!("`{}` called with {} argument(s)", name, args.len()));
            }
            for ((_, param), value) in params.iter().zip(args) {
                frame.locals.insert(param.clone(), value);
            }
        }

        let labels: HashMap<Label, usize> = (start..end)
            .filter_map(|index| match &quads[index] {
                Quadruple::Label(label) => Some((*label, index)),
                _ => None,
            })
            .collect();

        let mut pc = start + 1;
        loop {
            self.steps += 1;
            if self.steps > STEP_LIMIT {
                return Err(String::from("step limit exceeded"));
            }

            match &quads[pc] {
                Quadruple::BinaryOp {
                    operator,
                    left,
                    right,
                    result,
                } => {
                    let left = frame.eval(left)?.as_int()?;
                    let right = frame.eval(right)?.as_int()?;
                    let value = match operator {
                        ArithOp::Add => left.wrapping_add(right),
                        ArithOp::Sub => left.wrapping_sub(right),
                        ArithOp::Mul => left.wrapping_mul(right),
                        ArithOp::Div | ArithOp::Mod if right == 0 => {
                            return Err(String::from("division by zero"))
                        }
                        ArithOp::Div => left.wrapping_div(right),
                        ArithOp::Mod => left.wrapping_rem(right),
                    };
                    frame.temps.insert(*result, Value::Int(value));
                }
                Quadruple::UnaryOp {
                    operator,
                    operand,
                    result,
                } => {
                    let operand = frame.eval(operand)?;
                    let value = match operator {
                        UnaryOp::Not => Value::Bool(!operand.as_bool()?),
                        UnaryOp::Neg => Value::Int(operand.as_int()?.wrapping_neg()),
                    };
                    frame.temps.insert(*result, value);
                }
                Quadruple::LogicalOp {
                    operator,
                    left,
                    right,
                    result,
                } => {
                    let left = frame.eval(left)?;
                    let right = frame.eval(right)?;
                    let value = compare(*operator, &left, &right)?;
                    frame.temps.insert(*result, Value::Bool(value));
                }
                Quadruple::Assign { target, value } => {
                    let value = frame.eval(value)?;
                    frame.write(target, value)?;
                }
                Quadruple::FunctionCall { name, args, result } => {
                    let args = args
                        .iter()
                        .map(|arg| frame.eval(arg))
                        .collect::<Result<Vec<Value>, String>>()?;
                    let value = self.call(name, args)?;

                    if let Some(result) = result {
                        let value =
                            value.ok_or_else(|| format!("`{}` returned no value", name))?;
                        frame.temps.insert(*result, value);
                    }
                }
                Quadruple::Label(_) => {}
                Quadruple::Jump(label) => {
                    pc = *labels.get(label).ok_or_else(|| format!("unknown {}", label))?;
                    continue;
                }
                Quadruple::ConditionalJump { condition, target } => {
                    if !frame.eval(condition)?.as_bool()? {
                        pc = *labels.get(target).ok_or_else(|| format!("unknown {}", target))?;
                        continue;
                    }
                }
                Quadruple::Return(value) => {
                    return match value {
                        Some(value) => frame.eval(value).map(Some),
                        None => Ok(None),
                    };
                }
                Quadruple::EndFunction(_) => return Ok(None),
                Quadruple::FunctionDefinition { name, .. } => {
                    return Err(format!("ran into the definition of `{}`", name))
                }
            }

            pc += 1;
        }
    }

    fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Option<Value>, String> {
        self.calls.push(name.to_string());

        match name {
            "printInt" => {
                self.output.push(args[0].as_int()?.to_string());
                Ok(None)
            }
            "printString" => {
                self.output.push(args[0].as_str()?.to_string());
                Ok(None)
            }
            "error" => Err(String::from("runtime error")),
            "readInt" => {
                let line = self.input.pop_front().ok_or("input exhausted")?;
                let value = line
                    .trim()
                    .parse::<i32>()
                    .map_err(|error| error.to_string())?;
                Ok(Some(Value::Int(value)))
            }
            "readString" => {
                let line = self.input.pop_front().ok_or("input exhausted")?;
                Ok(Some(Value::Str(line)))
            }
            "Concat" => {
                let joined = format!("{}{}", args[0].as_str()?, args[1].as_str()?);
                Ok(Some(Value::Str(joined)))
            }
            _ => self.run(name, args),
        }
    }
}

fn compare(operator: RelOp, left: &Value, right: &Value) -> Result<bool, String> {
    let ordering = match (left, right) {
        (Value::Int(left), Value::Int(right)) => left.cmp(right),
        (Value::Bool(left), Value::Bool(right)) => left.cmp(right),
        (Value::Str(left), Value::Str(right)) => left.cmp(right),
        _ => return Err(format!("cannot compare {:?} with {:?}", left, right)),
    };

    Ok(match operator {
        RelOp::Less => ordering.is_lt(),
        RelOp::LessEq => ordering.is_le(),
        RelOp::Greater => ordering.is_gt(),
        RelOp::GreaterEq => ordering.is_ge(),
        RelOp::Eq => ordering.is_eq(),
        RelOp::NotEq => ordering.is_ne(),
    })
}
