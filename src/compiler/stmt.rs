use log::debug;

use crate::{
    ast::{
        ast::FnDecl,
        expressions::{ArithOp, Expr, Literal},
        statements::{BlockStmt, Stmt},
        types::Type,
    },
    errors::errors::Error,
};

use super::{
    compiler::Compiler,
    expr::{gen_call, gen_discarded, gen_expression},
    ir::{Operand, Quadruple},
};

pub fn gen_function(compiler: &mut Compiler<'_>, function: &FnDecl) -> Result<(), Error> {
    let Some(signature) = compiler.functions.get(&function.identifier) else {
        return Err(Error::internal(format!(
            "function `{}` missing from the signature table",
            function.identifier
        )));
    };
    let params = signature.params.clone();
    debug!("generating function `{}`", function.identifier);

    compiler.begin_function();
    compiler.emit(Quadruple::FunctionDefinition {
        name: function.identifier.clone(),
        params,
    });

    compiler.enter_block();
    for param in &function.parameters {
        compiler.declare_local(&param.identifier, param.param_type, &param.span)?;
    }
    gen_block(compiler, &function.body)?;
    compiler.exit_block()?;

    // Void functions may fall off the end of their body.
    if function.return_type.is_void()
        && !matches!(compiler.quadruples.last(), Some(Quadruple::Return(_)))
    {
        compiler.emit(Quadruple::Return(None));
    }

    compiler.emit(Quadruple::EndFunction(function.identifier.clone()));
    Ok(())
}

pub fn gen_block(compiler: &mut Compiler<'_>, block: &BlockStmt) -> Result<(), Error> {
    compiler.enter_block();
    for statement in block.iter() {
        gen_statement(compiler, statement)?;
    }
    compiler.exit_block()
}

/// A branch or loop body opens exactly one block.
fn gen_body(compiler: &mut Compiler<'_>, body: &Stmt) -> Result<(), Error> {
    match body {
        Stmt::Block(block) => gen_block(compiler, block),
        _ => {
            compiler.enter_block();
            gen_statement(compiler, body)?;
            compiler.exit_block()
        }
    }
}

pub fn gen_statement(compiler: &mut Compiler<'_>, statement: &Stmt) -> Result<(), Error> {
    match statement {
        Stmt::Empty { .. } => Ok(()),
        Stmt::Block(block) => gen_block(compiler, block),
        Stmt::VarDecl {
            var_type, items, ..
        } => {
            for item in items {
                // The initializer is evaluated before the new name is visible.
                let value = match &item.assigned_value {
                    Some(value) => gen_expression(compiler, value)?,
                    None => compiler.default_value(*var_type)?,
                };

                let unique_name = compiler.declare_local(&item.identifier, *var_type, &item.span)?;
                compiler.emit(Quadruple::Assign {
                    target: Operand::Variable(unique_name),
                    value,
                });
            }
            Ok(())
        }
        Stmt::Assignment {
            identifier,
            value,
            span,
        } => {
            let value = gen_expression(compiler, value)?;
            let local = compiler.resolve(identifier, span)?;

            compiler.emit(Quadruple::Assign {
                target: Operand::Variable(local.unique_name),
                value,
            });
            Ok(())
        }
        Stmt::Increment { identifier, span } | Stmt::Decrement { identifier, span } => {
            let operator = match statement {
                Stmt::Increment { .. } => ArithOp::Add,
                _ => ArithOp::Sub,
            };
            let local = compiler.resolve(identifier, span)?;
            let result = compiler.new_temp(Type::Int);

            compiler.emit(Quadruple::BinaryOp {
                operator,
                left: Operand::Variable(local.unique_name.clone()),
                right: Operand::Literal(Literal::Int(1)),
                result,
            });
            compiler.emit(Quadruple::Assign {
                target: Operand::Variable(local.unique_name),
                value: result.into(),
            });
            Ok(())
        }
        Stmt::Return { value: None, .. } => {
            compiler.emit(Quadruple::Return(None));
            Ok(())
        }
        Stmt::Return {
            value: Some(value), ..
        } => {
            // `return f();` inside a void function calls f and returns nothing.
            if let Expr::Call {
                callee,
                arguments,
                span,
            } = value.unparenthesized()
            {
                let result = gen_call(compiler, callee, arguments, span)?;
                compiler.emit(Quadruple::Return(result));
                return Ok(());
            }

            let value = gen_expression(compiler, value)?;
            compiler.emit(Quadruple::Return(Some(value)));
            Ok(())
        }
        Stmt::If {
            condition,
            then_body,
            else_body: None,
            ..
        } => {
            let condition = gen_expression(compiler, condition)?;
            let end_label = compiler.new_label();

            compiler.emit(Quadruple::ConditionalJump {
                condition,
                target: end_label,
            });
            gen_body(compiler, then_body)?;
            compiler.emit(Quadruple::Label(end_label));
            Ok(())
        }
        Stmt::If {
            condition,
            then_body,
            else_body: Some(else_body),
            ..
        } => {
            let condition = gen_expression(compiler, condition)?;
            let else_label = compiler.new_label();
            let end_label = compiler.new_label();

            compiler.emit(Quadruple::ConditionalJump {
                condition,
                target: else_label,
            });
            gen_body(compiler, then_body)?;
            compiler.emit(Quadruple::Jump(end_label));
            compiler.emit(Quadruple::Label(else_label));
            gen_body(compiler, else_body)?;
            compiler.emit(Quadruple::Label(end_label));
            Ok(())
        }
        Stmt::While {
            condition, body, ..
        } => {
            let start_label = compiler.new_label();
            let end_label = compiler.new_label();

            compiler.emit(Quadruple::Label(start_label));
            let condition = gen_expression(compiler, condition)?;
            compiler.emit(Quadruple::ConditionalJump {
                condition,
                target: end_label,
            });
            gen_body(compiler, body)?;
            compiler.emit(Quadruple::Jump(start_label));
            compiler.emit(Quadruple::Label(end_label));
            Ok(())
        }
        Stmt::Expression { expression, .. } => gen_discarded(compiler, expression),
    }
}
