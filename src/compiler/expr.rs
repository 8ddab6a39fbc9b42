use log::trace;

use crate::{
    ast::{
        expressions::{ArithOp, BoolOp, Expr, UnaryOp},
        types::Type,
    },
    errors::errors::Error,
    Span,
};

use super::{
    compiler::Compiler,
    ir::{Operand, Quadruple},
    stdlib::CONCAT,
};

/// Generates the quadruples computing `expression` and returns the operand
/// holding its value.
pub fn gen_expression(compiler: &mut Compiler<'_>, expression: &Expr) -> Result<Operand, Error> {
    match expression {
        Expr::Literal { value, .. } => Ok(Operand::Literal(value.clone())),
        Expr::Symbol { name, span } => {
            let local = compiler.resolve(name, span)?;
            Ok(Operand::Variable(local.unique_name))
        }
        Expr::Paren { inner, .. } => gen_expression(compiler, inner),
        Expr::Binary {
            operator,
            left,
            right,
            ..
        } => {
            let left = gen_expression(compiler, left)?;
            let right = gen_expression(compiler, right)?;

            if *operator == ArithOp::Add && compiler.operand_type(&left)? == Type::String {
                let result = compiler.new_temp(Type::String);
                compiler.emit(Quadruple::FunctionCall {
                    name: CONCAT.to_string(),
                    args: vec![left, right],
                    result: Some(result),
                });
                return Ok(result.into());
            }

            let result = compiler.new_temp(Type::Int);
            compiler.emit(Quadruple::BinaryOp {
                operator: *operator,
                left,
                right,
                result,
            });
            Ok(result.into())
        }
        Expr::Relational {
            operator,
            left,
            right,
            ..
        } => {
            let left = gen_expression(compiler, left)?;
            let right = gen_expression(compiler, right)?;

            let result = compiler.new_temp(Type::Boolean);
            compiler.emit(Quadruple::LogicalOp {
                operator: *operator,
                left,
                right,
                result,
            });
            Ok(result.into())
        }
        Expr::Logical {
            operator,
            left,
            right,
            ..
        } => match operator {
            BoolOp::And => gen_and(compiler, left, right),
            BoolOp::Or => gen_or(compiler, left, right),
        },
        Expr::Prefix {
            operator,
            right_expr,
            ..
        } => {
            let operand = gen_expression(compiler, right_expr)?;
            let result_type = match operator {
                UnaryOp::Not => Type::Boolean,
                UnaryOp::Neg => Type::Int,
            };

            let result = compiler.new_temp(result_type);
            compiler.emit(Quadruple::UnaryOp {
                operator: *operator,
                operand,
                result,
            });
            Ok(result.into())
        }
        Expr::Call {
            callee,
            arguments,
            span,
        } => match gen_call(compiler, callee, arguments, span)? {
            Some(result) => Ok(result),
            None => Err(Error::internal(format!(
                "call to void function `{}` used as a value",
                callee
            ))),
        },
    }
}

/// Generates a call. Returns the operand holding the result, or `None`
/// when the callee returns `void`.
pub fn gen_call(
    compiler: &mut Compiler<'_>,
    callee: &str,
    arguments: &[Expr],
    span: &Span,
) -> Result<Option<Operand>, Error> {
    let Some(signature) = compiler.functions.get(callee) else {
        return Err(Error::internal(format!(
            "call to unknown function `{}` at offset {}",
            callee, span.start.0
        )));
    };
    let return_type = signature.return_type;

    let mut args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        args.push(gen_expression(compiler, argument)?);
    }

    if return_type.is_void() {
        compiler.emit(Quadruple::FunctionCall {
            name: callee.to_string(),
            args,
            result: None,
        });
        return Ok(None);
    }

    let result = compiler.new_temp(return_type);
    compiler.emit(Quadruple::FunctionCall {
        name: callee.to_string(),
        args,
        result: Some(result),
    });
    Ok(Some(result.into()))
}

/// Evaluates an expression whose value is discarded.
pub fn gen_discarded(compiler: &mut Compiler<'_>, expression: &Expr) -> Result<(), Error> {
    match expression.unparenthesized() {
        Expr::Call {
            callee,
            arguments,
            span,
        } => gen_call(compiler, callee, arguments, span).map(|_| ()),
        other => gen_expression(compiler, other).map(|_| ()),
    }
}

//     left
//     if_false left goto Lfalse
//     right
//     t = right
//     goto Lend
// Lfalse:
//     t = false
// Lend:
fn gen_and(compiler: &mut Compiler<'_>, left: &Expr, right: &Expr) -> Result<Operand, Error> {
    let left = gen_expression(compiler, left)?;
    let result = compiler.new_temp(Type::Boolean);
    let false_label = compiler.new_label();
    let end_label = compiler.new_label();
    trace!("lowering && into {} via {} and {}", result, false_label, end_label);

    compiler.emit(Quadruple::ConditionalJump {
        condition: left,
        target: false_label,
    });
    let right = gen_expression(compiler, right)?;
    compiler.emit(Quadruple::Assign {
        target: result.into(),
        value: right,
    });
    compiler.emit(Quadruple::Jump(end_label));
    compiler.emit(Quadruple::Label(false_label));
    compiler.emit(Quadruple::Assign {
        target: result.into(),
        value: false.into(),
    });
    compiler.emit(Quadruple::Label(end_label));

    Ok(result.into())
}

//     left
//     if_false left goto Lrhs
//     t = true
//     goto Lend
// Lrhs:
//     right
//     t = right
// Lend:
fn gen_or(compiler: &mut Compiler<'_>, left: &Expr, right: &Expr) -> Result<Operand, Error> {
    let left = gen_expression(compiler, left)?;
    let result = compiler.new_temp(Type::Boolean);
    let rhs_label = compiler.new_label();
    let end_label = compiler.new_label();
    trace!("lowering || into {} via {} and {}", result, rhs_label, end_label);

    compiler.emit(Quadruple::ConditionalJump {
        condition: left,
        target: rhs_label,
    });
    compiler.emit(Quadruple::Assign {
        target: result.into(),
        value: true.into(),
    });
    compiler.emit(Quadruple::Jump(end_label));
    compiler.emit(Quadruple::Label(rhs_label));
    let right = gen_expression(compiler, right)?;
    compiler.emit(Quadruple::Assign {
        target: result.into(),
        value: right,
    });
    compiler.emit(Quadruple::Label(end_label));

    Ok(result.into())
}
