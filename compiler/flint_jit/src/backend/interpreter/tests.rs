use pretty_assertions::assert_eq;

use flint_ir::{compile, Program, Record, SymbolTypes};

use super::*;

fn program(source: &str) -> Program {
    let ast = match flint_parse::parse(source) {
        Ok(ast) => ast,
        Err(err) => panic!("parse failed for {source:?}: {err}"),
    };
    match compile(&ast, &SymbolTypes::default(), OperatorRegistry::global()) {
        Ok(program) => program,
        Err(err) => panic!("compile failed for {source:?}: {err}"),
    }
}

/// Compile and run a closed expression, returning the raw result word.
fn eval(source: &str) -> u64 {
    let program = program(source);
    let backend = Interpreter::new();
    unsafe {
        let handle = backend.compile(&program.words(), &program.arg_type_bytes());
        assert_ne!(handle, 0, "rejected {source:?}");
        let result = (backend.entry())(handle, std::ptr::null());
        backend.free(handle);
        result
    }
}

fn eval_i64(source: &str) -> i64 {
    eval(source) as i64
}

fn eval_f64(source: &str) -> f64 {
    f64::from_bits(eval(source))
}

fn rejects(code: &[Record], arg_types: &[u8]) -> bool {
    let words: Vec<u64> = code.iter().flat_map(|r| [r.tag, r.payload]).collect();
    unsafe { Interpreter::new().compile(&words, arg_types) == 0 }
}

#[test]
fn integer_arithmetic() {
    assert_eq!(eval_i64("1"), 1);
    assert_eq!(eval_i64("(+ 123000 456)"), 123_456);
    assert_eq!(eval_i64("(/ 1230 10)"), 123);
    assert_eq!(eval_i64("(- 1 2 3)"), -4);
    assert_eq!(eval_i64("(- 5)"), -5);
    assert_eq!(eval_i64("(+ (- (* (/ 4 (% 6 5)) 3) 2) 1)"), 11);
    assert_eq!(eval_i64("(+ true true)"), 2);
    assert_eq!(eval_i64("(* 9223372036854775807 2)"), -2);
}

#[test]
fn division_by_zero_yields_zero() {
    assert_eq!(eval_i64("(% 123000 0)"), 0);
    assert_eq!(eval_i64("(/ 123000 0)"), 0);
    assert_eq!(eval_i64("(/ (- 0 9223372036854775807 1) (- 1))"), i64::MIN);
    assert!(eval_f64("(/ 1.0 0)").is_infinite());
}

#[test]
fn float_arithmetic() {
    assert!((eval_f64("(+ 1.23 0.00456)") - 1.234_56).abs() < 1e-5);
    assert!((eval_f64("(/ 31536000. 365 24 60 60)") - 1.0).abs() < f64::EPSILON);
    assert!((eval_f64("(- 2.5)") + 2.5).abs() < f64::EPSILON);
    assert!((eval_f64("(% 7.5 2)") - 1.5).abs() < f64::EPSILON);
}

#[test]
fn bitwise_and_shifts() {
    assert_eq!(eval_i64("(& 12 10)"), 8);
    assert_eq!(eval_i64("(| 12 10)"), 14);
    assert_eq!(eval_i64("(^ 12 10)"), 6);
    assert_eq!(eval_i64("(^ 0)"), -1);
    assert_eq!(eval_i64("(<< 1 4)"), 16);
    assert_eq!(eval_i64("(>> (- 16) 2)"), -4);
    assert_eq!(eval_i64("(>>> (- 1) 60)"), 15);
}

#[test]
fn comparisons() {
    assert_eq!(eval("(< 1 2)"), 1);
    assert_eq!(eval("(<= 2 2)"), 1);
    assert_eq!(eval("(> 1 2.5)"), 0);
    assert_eq!(eval("(>= 3 2.5)"), 1);
    assert_eq!(eval("(= 2 2.0)"), 1);
    assert_eq!(eval("(!= 2 3)"), 1);
    assert_eq!(eval_i64("(cmpl 1 2)"), -1);
    assert_eq!(eval_i64("(cmpg 2 2)"), 0);
    assert_eq!(eval_i64("(cmpl 3 2)"), 1);
}

#[test]
fn unordered_comparisons() {
    assert_eq!(eval_i64("(cmpl (sqrt (- 1)) 0)"), -1);
    assert_eq!(eval_i64("(cmpg (sqrt (- 1)) 0)"), 1);
    assert_eq!(eval("(< (sqrt (- 1)) 0)"), 0);
    assert_eq!(eval("(nan? (sqrt (- 1)))"), 1);
}

#[test]
fn logic() {
    assert_eq!(eval("(&& 1 2.5)"), 1);
    assert_eq!(eval("(&& 1 0)"), 0);
    assert_eq!(eval("(|| false 0.0 3)"), 1);
    assert_eq!(eval("(! 0)"), 1);
    assert_eq!(eval("(->bool (- 3))"), 1);
}

#[test]
fn math_functions() {
    assert!((eval_f64("(sqrt 16)") - 4.0).abs() < f64::EPSILON);
    assert!((eval_f64("(pow 2 10)") - 1024.0).abs() < f64::EPSILON);
    assert!((eval_f64("(** 2 0.5)") - std::f64::consts::SQRT_2).abs() < 1e-12);
    assert!((eval_f64("(rint 2.5)") - 2.0).abs() < f64::EPSILON);
    assert!((eval_f64("(round 2.5)") - 3.0).abs() < f64::EPSILON);
    assert!((eval_f64("(floor (- 1.5))") + 2.0).abs() < f64::EPSILON);
    assert!((eval_f64("(atan2 1 1)") - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    assert_eq!(eval_i64("(abs (- 7))"), 7);
    assert!((eval_f64("(abs (- 7.5))") - 7.5).abs() < f64::EPSILON);
    assert_eq!(eval_i64("(min 4 (- 2) 9)"), -2);
    assert!((eval_f64("(max 4 9.5)") - 9.5).abs() < f64::EPSILON);
    assert_eq!(eval_i64("(sign (- 0.5))"), -1);
    assert_eq!(eval_i64("(sign 0)"), 0);
    assert_eq!(eval("(finite? 1)"), 1);
    assert_eq!(eval("(inf? (/ 1.0 0))"), 1);
}

#[test]
fn string_operators() {
    assert_eq!(eval("(== \"Hello\" \"Hello\")"), 1);
    assert_eq!(eval("(== \"Hello\" \"hello\")"), 0);
    assert_eq!(eval("(== \"1\" 1)"), 0);
    assert_eq!(eval("(!= \"1\" 1)"), 1);
    assert_eq!(eval_i64("(len \"Hello\")"), 5);
    assert_eq!(eval_i64("(len \"\")"), 0);
    assert_eq!(eval_i64("(index \"The quick brown fox\" \"quick\")"), 4);
    assert_eq!(eval_i64("(index \"The quick brown fox\" \"slow\")"), -1);
}

#[test]
fn string_arguments() {
    let ast = match flint_parse::parse("(index s t)") {
        Ok(ast) => ast,
        Err(err) => panic!("{err}"),
    };
    let symbols: SymbolTypes = [("s", TokenKind::String), ("t", TokenKind::String)]
        .into_iter()
        .map(|(name, kind)| (name.to_owned(), kind))
        .collect();
    let Ok(program) = compile(&ast, &symbols, OperatorRegistry::global()) else {
        panic!("compile failed");
    };

    let haystack = "abcdef";
    let needle = "de";
    let mut args = [0u64; 6];
    args[2] = haystack.as_ptr() as u64;
    args[3] = haystack.len() as u64;
    args[4] = needle.as_ptr() as u64;
    args[5] = needle.len() as u64;
    args[0] = std::ptr::addr_of!(args[2]) as u64;
    args[1] = std::ptr::addr_of!(args[4]) as u64;

    let backend = Interpreter::new();
    unsafe {
        let handle = backend.compile(&program.words(), &program.arg_type_bytes());
        assert_ne!(handle, 0);
        assert_eq!((backend.entry())(handle, args.as_ptr()), 3);
        backend.free(handle);
    }
}

#[test]
fn rejects_ill_typed_programs() {
    for source in ["(+ \"a\" 1)", "(len 5)", "(index \"a\" 1)", "(< \"a\" \"b\")", "\"text\""] {
        let program = program(source);
        let handle = unsafe { Interpreter::new().compile(&program.words(), &program.arg_type_bytes()) };
        assert_eq!(handle, 0, "accepted {source:?}");
    }
}

#[test]
fn rejects_malformed_bytecode() {
    let one = Record::new(TokenKind::Int, 1);
    let add = Record::operator(0x01);

    assert!(rejects(&[], &[]));
    assert!(rejects(&[one, add], &[]));
    assert!(rejects(&[one, one], &[]));
    assert!(rejects(&[one, one, Record::operator(0xfff)], &[]));
    assert!(rejects(&[Record { tag: 0x7f, payload: 0 }], &[]));
    assert!(rejects(&[Record::new(TokenKind::Symbol, 1)], &[2]));
    assert!(rejects(&[Record::new(TokenKind::Symbol, 0)], &[9]));
    assert!(!rejects(&[one, one, add], &[]));

    let odd = unsafe { Interpreter::new().compile(&[2, 1, 0], &[]) };
    assert_eq!(odd, 0);
}

#[test]
fn custom_registry_changes_opcodes() {
    use flint_ir::{OperatorEntry, ResultRule};

    let registry = OperatorRegistry::new([OperatorEntry::arithmetic(
        "plus",
        0x99,
        2,
        "add",
        ResultRule::Promote,
    )]);
    let Ok(registry) = registry else {
        panic!("registry rejected");
    };
    let backend = Interpreter::with_registry(Arc::new(registry));
    let code = [
        Record::new(TokenKind::Int, 2),
        Record::new(TokenKind::Int, 3),
        Record::operator(0x99),
    ];
    let words: Vec<u64> = code.iter().flat_map(|r| [r.tag, r.payload]).collect();
    unsafe {
        let handle = backend.compile(&words, &[]);
        assert_ne!(handle, 0);
        assert_eq!((backend.entry())(handle, std::ptr::null()), 5);
        backend.free(handle);
    }
    assert!(!backend.is_native_backend_available());
}
