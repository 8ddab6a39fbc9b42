//! Integration tests for the whole middle end.
//!
//! These tests build syntax trees the way a parser would, run them through
//! type checking, IR generation and verification, and execute the result
//! with the quadruple simulator in `common`.

mod common;

use std::rc::Rc;

use common::{Simulator, Value};
use latte_midend::{
    ast::{
        ast::{FnDecl, Param, Program},
        expressions::{ArithOp, Expr, RelOp},
        statements::{BlockStmt, Item, Stmt},
        types::Type,
    },
    compile,
    compiler::{ir::Quadruple, stdlib::runtime_declarations},
    errors::errors::ErrorImpl,
    format_error, CompileOptions, CompiledProgram, Span,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn function(return_type: Type, name: &str, params: Vec<Param>, body: Vec<Stmt>) -> FnDecl {
    FnDecl::new(return_type, name, params, BlockStmt::new(body))
}

fn main_with(body: Vec<Stmt>) -> FnDecl {
    function(Type::Int, "main", vec![], body)
}

fn compile_ok(functions: Vec<FnDecl>) -> CompiledProgram {
    init_logger();
    compile(&Program::new(functions), &CompileOptions::default()).unwrap()
}

fn rejection(functions: Vec<FnDecl>) -> String {
    init_logger();
    match compile(&Program::new(functions), &CompileOptions::default()) {
        Ok(_) => panic!("Expected compilation to fail"),
        Err(error) => error.get_error_name().to_string(),
    }
}

/// `boolean b() { printString("b"); return true; }`
fn side_effecting_b() -> FnDecl {
    function(
        Type::Boolean,
        "b",
        vec![],
        vec![
            Stmt::expr(Expr::call("printString", vec![Expr::string("b")])),
            Stmt::ret(Expr::boolean(true)),
        ],
    )
}

/// `int main() { boolean a = <a>; if (<a op b()>) printInt(1); return 0; }`
fn short_circuit_program(a: bool, condition: Expr) -> Vec<FnDecl> {
    vec![
        side_effecting_b(),
        main_with(vec![
            Stmt::decl(Type::Boolean, vec![Item::init("a", Expr::boolean(a))]),
            Stmt::if_then(
                condition,
                Stmt::expr(Expr::call("printInt", vec![Expr::int(1)])),
            ),
            Stmt::ret(Expr::int(0)),
        ]),
    ]
}

#[test]
fn test_end_to_end_scenario() {
    let compiled = compile_ok(vec![main_with(vec![
        Stmt::decl(
            Type::Int,
            vec![Item::init("x", Expr::binary(ArithOp::Add, Expr::int(2), Expr::int(3)))],
        ),
        Stmt::expr(Expr::call("printInt", vec![Expr::var("x")])),
        Stmt::ret(Expr::int(0)),
    ])]);

    let main = compiled.functions.get("main").unwrap();
    assert_eq!(main.return_type, Type::Int);
    assert!(main.params.is_empty());

    let lines: Vec<String> = compiled.ir.iter().map(|quad| quad.to_string()).collect();
    let add = lines.iter().position(|line| line == "t1 = 2 + 3").unwrap();
    let assign = lines.iter().position(|line| line == "x = t1").unwrap();
    let print = lines.iter().position(|line| line == "call printInt(x)").unwrap();
    let ret = lines.iter().position(|line| line == "return 0").unwrap();
    assert!(add < assign && assign < print && print < ret);

    let mut simulator = Simulator::new(&compiled.ir);
    assert_eq!(simulator.run_main().unwrap(), Some(Value::Int(0)));
    assert_eq!(simulator.output, vec!["5".to_string()]);
}

#[test]
fn test_rejection_scenario() {
    init_logger();
    let program = Program::new(vec![function(
        Type::Boolean,
        "main",
        vec![],
        vec![Stmt::ret(Expr::int(1))],
    )]);

    let error = compile(&program, &CompileOptions::default()).unwrap_err();
    assert_eq!(error.get_error_name(), "ReturnTypeMismatch");
    assert!(!error.is_internal());
}

#[test]
fn test_and_skips_right_operand_when_left_is_false() {
    let compiled = compile_ok(short_circuit_program(
        false,
        Expr::and(Expr::var("a"), Expr::call("b", vec![])),
    ));

    let mut simulator = Simulator::new(&compiled.ir);
    simulator.run_main().unwrap();

    assert!(!simulator.was_called("b"));
    assert!(simulator.output.is_empty());
}

#[test]
fn test_and_evaluates_right_operand_when_left_is_true() {
    let compiled = compile_ok(short_circuit_program(
        true,
        Expr::and(Expr::var("a"), Expr::call("b", vec![])),
    ));

    let mut simulator = Simulator::new(&compiled.ir);
    simulator.run_main().unwrap();

    assert!(simulator.was_called("b"));
    assert_eq!(simulator.output, vec!["b".to_string(), "1".to_string()]);
}

#[test]
fn test_or_skips_right_operand_when_left_is_true() {
    let compiled = compile_ok(short_circuit_program(
        true,
        Expr::or(Expr::var("a"), Expr::call("b", vec![])),
    ));

    let mut simulator = Simulator::new(&compiled.ir);
    simulator.run_main().unwrap();

    assert!(!simulator.was_called("b"));
    assert_eq!(simulator.output, vec!["1".to_string()]);
}

#[test]
fn test_or_evaluates_right_operand_when_left_is_false() {
    let compiled = compile_ok(short_circuit_program(
        false,
        Expr::or(Expr::var("a"), Expr::call("b", vec![])),
    ));

    let mut simulator = Simulator::new(&compiled.ir);
    simulator.run_main().unwrap();

    assert_eq!(simulator.output, vec!["b".to_string(), "1".to_string()]);
}

#[test]
fn test_short_circuit_value_is_correct() {
    // b() returns true, so `(a || b()) && !a` holds exactly when a is false.
    for a in [false, true] {
        let compiled = compile_ok(short_circuit_program(
            a,
            Expr::and(
                Expr::paren(Expr::or(Expr::var("a"), Expr::call("b", vec![]))),
                Expr::not(Expr::var("a")),
            ),
        ));

        let mut simulator = Simulator::new(&compiled.ir);
        simulator.run_main().unwrap();

        assert_eq!(simulator.was_called("b"), !a);
        assert_eq!(simulator.output.contains(&"1".to_string()), !a);
    }
}

#[test]
fn test_compilation_is_deterministic() {
    let functions = vec![
        side_effecting_b(),
        main_with(vec![
            Stmt::decl(Type::Int, vec![Item::init("i", Expr::int(0))]),
            Stmt::while_loop(
                Expr::and(
                    Expr::relational(RelOp::Less, Expr::var("i"), Expr::int(3)),
                    Expr::call("b", vec![]),
                ),
                Stmt::incr("i"),
            ),
            Stmt::ret(Expr::var("i")),
        ]),
    ];

    let first = compile_ok(functions.clone());
    let second = compile_ok(functions);

    assert_eq!(first.ir.to_string(), second.ir.to_string());
}

#[test]
fn test_recursive_factorial_runs() {
    let compiled = compile_ok(vec![
        function(
            Type::Int,
            "fact",
            vec![Param::new(Type::Int, "n")],
            vec![Stmt::if_else(
                Expr::relational(RelOp::LessEq, Expr::var("n"), Expr::int(1)),
                Stmt::ret(Expr::int(1)),
                Stmt::ret(Expr::binary(
                    ArithOp::Mul,
                    Expr::var("n"),
                    Expr::call(
                        "fact",
                        vec![Expr::binary(ArithOp::Sub, Expr::var("n"), Expr::int(1))],
                    ),
                )),
            )],
        ),
        main_with(vec![
            Stmt::expr(Expr::call("printInt", vec![Expr::call("fact", vec![Expr::int(5)])])),
            Stmt::ret(Expr::int(0)),
        ]),
    ]);

    let mut simulator = Simulator::new(&compiled.ir);
    simulator.run_main().unwrap();

    assert_eq!(simulator.output, vec!["120".to_string()]);
}

#[test]
fn test_loop_with_input_and_shadowing() {
    // int main() {
    //   int n = readInt(); int sum = 0; int i = 1;
    //   while (i <= n) { int i2 = i % 2; if (i2 == 0) { int sum = 100; } else sum = sum + i; i++; }
    //   printInt(sum); return 0;
    // }
    let compiled = compile_ok(vec![main_with(vec![
        Stmt::decl(Type::Int, vec![Item::init("n", Expr::call("readInt", vec![]))]),
        Stmt::decl(
            Type::Int,
            vec![Item::init("sum", Expr::int(0)), Item::init("i", Expr::int(1))],
        ),
        Stmt::while_loop(
            Expr::relational(RelOp::LessEq, Expr::var("i"), Expr::var("n")),
            Stmt::block(vec![
                Stmt::decl(
                    Type::Int,
                    vec![Item::init(
                        "i2",
                        Expr::binary(ArithOp::Mod, Expr::var("i"), Expr::int(2)),
                    )],
                ),
                Stmt::if_else(
                    Expr::relational(RelOp::Eq, Expr::var("i2"), Expr::int(0)),
                    Stmt::block(vec![Stmt::decl(
                        Type::Int,
                        vec![Item::init("sum", Expr::int(100))],
                    )]),
                    Stmt::assign(
                        "sum",
                        Expr::binary(ArithOp::Add, Expr::var("sum"), Expr::var("i")),
                    ),
                ),
                Stmt::incr("i"),
            ]),
        ),
        Stmt::expr(Expr::call("printInt", vec![Expr::var("sum")])),
        Stmt::ret(Expr::int(0)),
    ])]);

    let mut simulator = Simulator::new(&compiled.ir).with_input(&["5"]);
    simulator.run_main().unwrap();

    // 1 + 3 + 5; the inner `sum` never touches the outer one.
    assert_eq!(simulator.output, vec!["9".to_string()]);
}

#[test]
fn test_string_concatenation_runs() {
    let compiled = compile_ok(vec![main_with(vec![
        Stmt::decl(Type::String, vec![Item::init("name", Expr::call("readString", vec![]))]),
        Stmt::expr(Expr::call(
            "printString",
            vec![Expr::binary(ArithOp::Add, Expr::string("hello "), Expr::var("name"))],
        )),
        Stmt::ret(Expr::int(0)),
    ])]);

    assert!(compiled
        .ir
        .iter()
        .any(|quad| matches!(quad, Quadruple::FunctionCall { name, .. } if name == "Concat")));

    let mut simulator = Simulator::new(&compiled.ir).with_input(&["world"]);
    simulator.run_main().unwrap();

    assert_eq!(simulator.output, vec!["hello world".to_string()]);
}

#[test]
fn test_scoping_rules() {
    let invisible = rejection(vec![main_with(vec![
        Stmt::block(vec![Stmt::decl(Type::Int, vec![Item::uninit("x")])]),
        Stmt::ret(Expr::var("x")),
    ])]);
    assert_eq!(invisible, "UndeclaredVariable");

    let same_block = rejection(vec![main_with(vec![
        Stmt::decl(Type::Int, vec![Item::uninit("x")]),
        Stmt::decl(Type::String, vec![Item::uninit("x")]),
        Stmt::ret(Expr::int(0)),
    ])]);
    assert_eq!(same_block, "DuplicateDeclaration");

    compile_ok(vec![main_with(vec![
        Stmt::block(vec![Stmt::decl(Type::Int, vec![Item::uninit("x")])]),
        Stmt::block(vec![Stmt::decl(Type::Int, vec![Item::uninit("x")])]),
        Stmt::ret(Expr::int(0)),
    ])]);
}

#[test]
fn test_all_paths_return() {
    let param = || vec![Param::new(Type::Boolean, "x")];

    let missing = rejection(vec![
        function(
            Type::Int,
            "f",
            param(),
            vec![Stmt::if_then(Expr::var("x"), Stmt::ret(Expr::int(1)))],
        ),
        main_with(vec![Stmt::ret(Expr::int(0))]),
    ]);
    assert_eq!(missing, "MissingReturn");

    compile_ok(vec![
        function(
            Type::Int,
            "f",
            param(),
            vec![Stmt::if_else(
                Expr::var("x"),
                Stmt::ret(Expr::int(1)),
                Stmt::ret(Expr::int(2)),
            )],
        ),
        main_with(vec![Stmt::ret(Expr::call("f", vec![Expr::boolean(true)]))]),
    ]);
}

#[test]
fn test_call_checking() {
    let bad_argument = rejection(vec![main_with(vec![
        Stmt::expr(Expr::call("printInt", vec![Expr::string("a")])),
        Stmt::ret(Expr::int(0)),
    ])]);
    assert_eq!(bad_argument, "ArgumentTypeMismatch");

    let bad_arity = rejection(vec![
        function(
            Type::Int,
            "foo",
            vec![Param::new(Type::Int, "a"), Param::new(Type::Int, "b")],
            vec![Stmt::ret(Expr::binary(ArithOp::Add, Expr::var("a"), Expr::var("b")))],
        ),
        main_with(vec![Stmt::ret(Expr::call("foo", vec![Expr::int(1)]))]),
    ]);
    assert_eq!(bad_arity, "ArityMismatch");
}

#[test]
fn test_library_unit_without_main() {
    init_logger();
    let program = Program::new(vec![function(
        Type::Int,
        "twice",
        vec![Param::new(Type::Int, "n")],
        vec![Stmt::ret(Expr::binary(ArithOp::Mul, Expr::var("n"), Expr::int(2)))],
    )]);

    let missing_main = compile(&program, &CompileOptions::default()).unwrap_err();
    assert_eq!(missing_main.get_kind(), &ErrorImpl::MissingMain);

    let options = CompileOptions::new().require_main(false).verify_ir(false);
    let compiled = compile(&program, &options).unwrap();

    let mut simulator = Simulator::new(&compiled.ir);
    assert_eq!(
        simulator.run("twice", vec![Value::Int(21)]).unwrap(),
        Some(Value::Int(42))
    );
}

#[test]
fn test_function_table_boundary() {
    let compiled = compile_ok(vec![main_with(vec![Stmt::ret(Expr::int(0))])]);

    let names: Vec<&str> = compiled.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["printInt", "printString", "error", "readInt", "readString", "main"]
    );
    assert_eq!(compiled.functions.user_functions().count(), 1);

    let runtime: Vec<String> = runtime_declarations().into_iter().map(|f| f.name).collect();
    assert!(runtime.contains(&"Concat".to_string()));
    assert!(!runtime.contains(&"main".to_string()));
}

#[test]
fn test_diagnostic_points_at_initializer() {
    init_logger();
    let source = "int main() {\n  int x = true;\n  return 0;\n}\n";
    let file = Rc::new(String::from("bad.lat"));

    let program = Program::new(vec![main_with(vec![
        Stmt::decl(
            Type::Int,
            vec![Item::init(
                "x",
                Expr::boolean(true).with_span(Span::new(23, 27, Rc::clone(&file))),
            )],
        ),
        Stmt::ret(Expr::int(0)),
    ])]);

    let error = compile(&program, &CompileOptions::default()).unwrap_err();
    assert_eq!(error.get_position().0, 23);

    let rendered = format_error(&error, "bad.lat", source);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines[0],
        "Error: TypeMismatch (Expected type `int`, received `boolean`)"
    );
    assert_eq!(lines[1], "-> bad.lat");
    assert_eq!(lines[3], "2 | int x = true;");
    assert_eq!(lines[4], "  | --------^");
}
