use std::fs;

use phlite::{
    Config,
    error::{Error, LexErrorKind, ParseError, RuntimeError},
    interpreter::{
        evaluator::Context,
        host::{Host, OutputBuffer},
        value::Value,
    },
    run_in, run_source,
};
use walkdir::WalkDir;

#[test]
fn fixture_programs_match_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/fixtures").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                                                              panic!("Failed to read \
                                                                      {expected_path:?}: {e}")
                                                          });

        count += 1;
        match run_with_args(&source, &[]) {
            Ok(output) => assert_eq!(output, expected, "unexpected output from {path:?}"),
            Err((e, output)) => {
                panic!("Fixture {path:?} failed:\n{e}\nOutput so far:\n{output}")
            },
        }
    }

    assert!(count > 0, "No fixtures found in tests/fixtures");
}

fn run_with_args(src: &str, args: &[&str]) -> Result<String, (Error, String)> {
    let out = OutputBuffer::new();
    let host = Host::new(out.clone(), args.iter().map(ToString::to_string).collect());
    match run_source(src, host, Config::default()) {
        Ok(_) => Ok(out.contents()),
        Err(e) => Err((e, out.contents())),
    }
}

fn assert_output(src: &str, expected: &str) {
    match run_with_args(src, &[]) {
        Ok(output) => assert_eq!(output, expected, "for script:\n{src}"),
        Err((e, _)) => panic!("Script failed: {e}\n{src}"),
    }
}

fn assert_failure(src: &str) -> (Error, String) {
    match run_with_args(src, &[]) {
        Ok(output) => panic!("Script succeeded but was expected to fail. Output:\n{output}"),
        Err(failure) => failure,
    }
}

fn runtime_error(src: &str) -> RuntimeError {
    match assert_failure(src) {
        (Error::Runtime(e), _) => e,
        (other, _) => panic!("Expected a runtime error, got: {other}"),
    }
}

#[test]
fn fibonacci_sequence() {
    let src = "function fib($n) { if $n < 2 { $n } else { fib($n - 1) + fib($n - 2) } }\n\
               foreach 0..8 as $n { print(fib($n) . \" \") }";
    assert_output(src, "0 1 1 2 3 5 8 13 ");
}

#[test]
fn fizzbuzz_variants_differ() {
    let truthy = "function f($n) { if $n % 3 { print(\"Fizz\") }\nif $n % 5 { print(\"Buzz\") }\nprintln() }\n\
                  foreach [0, 1, 2, 3] as $n { f($n) }";
    let equal = "function f($n) { if $n % 3 == 0 { print(\"Fizz\") }\nif $n % 5 == 0 { print(\"Buzz\") }\nprintln() }\n\
                 foreach [0, 1, 2, 3] as $n { f($n) }";
    assert_output(truthy, "\nFizzBuzz\nFizzBuzz\nBuzz\n");
    assert_output(equal, "FizzBuzz\n\n\nFizz\n");
}

#[test]
fn program_arguments_through_aliased_builtin() {
    let src = fs::read_to_string("tests/fixtures/range_append.php").unwrap();
    let output = run_with_args(&src, &["a", "b"]).unwrap();
    assert_eq!(output, "a\nb\n".repeat(25));

    assert_eq!(run_with_args("println(args()->length())", &["x"]).unwrap(), "1\n");
    assert_eq!(run_with_args("$a = args()\n$a->append(1)\nprintln(args())", &["x"]).unwrap(),
               "[x]\n");
}

#[test]
fn arithmetic_and_precedence() {
    assert_output("println(1 + 2 * 3, (1 + 2) * 3, 10 - 4 - 3, -2 * -3)", "7 9 3 6\n");
    assert_output("println(7 / 2, -7 / 2, 7 % 3, -7 % 3, 7 % -3)", "3 -3 1 -1 1\n");
    assert_output("println(!0, !5, !\"\", ![])", "1 0 1 1\n");
}

#[test]
fn comparisons_and_equality() {
    assert_output("println(1 < 2, 2 < 1, 2 <= 2, 3 >= 4, 1 == 1, 1 != 1)", "1 0 1 0 1 0\n");
    assert_output("println(\"a\" < \"b\", \"abc\" == \"abc\", 1 == \"1\")", "1 1 0\n");
    assert_output("$a = [1]\n$b = $a\nprintln($a == $b, $a == [1])", "1 0\n");
    assert!(matches!(runtime_error("println(1 < \"2\")"), RuntimeError::TypeError { .. }));
}

#[test]
fn logical_operators_short_circuit() {
    assert_output("println(0 && missing(), 1 || missing(), 2 && 3, 0 or \"\")", "0 1 1 0\n");
    assert_output("println(true and false, true or false)", "0 1\n");
}

#[test]
fn assignment_and_compound_assignment() {
    assert_output("$x = 2\n$x += 3\n$x *= 4\n$x -= 1\n$x /= 2\n$x %= 5\nprintln($x)", "4\n");
    assert_output("$a = $b = 3\nprintln($a + $b)", "6\n");
    assert_output("$a = [1, 2, 3]\n$a[1] = 20\n$a[2] += 5\nprintln($a)", "[1, 20, 8]\n");
}

#[test]
fn if_is_an_expression() {
    let src = "$x = if 1 > 2 { \"a\" } else if 2 > 1 { \"b\" } else { \"c\" }\nprintln($x)";
    assert_output(src, "b\n");
    assert_output("$v = { $t = 4\n$t * 2 }\nprintln($v)", "8\n");
}

#[test]
fn ranges_exclude_their_end() {
    assert_output("println(0..3, 3..0, 2..2)", "[0, 1, 2] [3, 2, 1] []\n");
    assert_output("println(1 + 1..4)", "[2, 3]\n");
    assert_output("foreach 3..0 as $i => $n { print($i . \":\" . $n . \" \") }", "0:3 1:2 2:1 ");
}

#[test]
fn arrays_are_shared_between_bindings() {
    let src = "$a = [1]\n$b = $a\n$b->append(2, 3)\nprintln($a, $a->length())";
    assert_output(src, "[1, 2, 3] 3\n");

    let src = "function fill($arr) { $arr->append(\"x\") }\n$a = []\nfill($a)\nfill($a)\nprintln($a)";
    assert_output(src, "[x, x]\n");
}

#[test]
fn append_returns_void() {
    let e = runtime_error("$a = []\nprintln($a->append(1))");
    assert!(matches!(e, RuntimeError::NotPrintable { .. }));
}

#[test]
fn foreach_snapshots_array_length() {
    assert_output("$a = [1, 2]\nforeach $a as $x { $a->append($x * 10) }\nprintln($a)",
                  "[1, 2, 10, 20]\n");
    assert_output("$a = [1, 2, 3]\nforeach $a as $i => $x { if $i == 0 { $a[2] = 30 }\nprint($x . \" \") }",
                  "1 2 30 ");
}

#[test]
fn foreach_bindings_do_not_leak() {
    let e = runtime_error("foreach [1] as $x { $y = $x }\nprintln($x)");
    assert!(matches!(e, RuntimeError::UnknownVariable { ref name, .. } if name == "x"));

    assert_output("$sum = 0\nforeach [1, 2, 3] as $x { $sum += $x }\nprintln($sum)", "6\n");
}

#[test]
fn foreach_rejects_non_arrays() {
    assert!(matches!(runtime_error("foreach 5 as $x { }"), RuntimeError::NotIterable { .. }));
}

#[test]
fn functions_are_hoisted() {
    assert_output("println(later(2))\nfunction later($x) { $x * 3 }", "6\n");
    assert_output("function outer() { $r = inner() + 1\nfunction inner() { 41 }\n$r }\n\
                   println(outer())",
                  "42\n");
}

#[test]
fn later_declarations_win() {
    assert_output("function f() { 1 }\nfunction f() { 2 }\nprintln(f())", "2\n");
}

#[test]
fn arity_is_checked() {
    let e = runtime_error("function run() { 1 }\nrun(1)");
    assert!(matches!(e, RuntimeError::ArgumentCountMismatch { found: 1, .. }));

    let e = runtime_error("function run($a) { $a }\nrun()");
    assert!(matches!(e, RuntimeError::ArgumentCountMismatch { found: 0, .. }));

    let e = runtime_error("print(1, 2)");
    assert!(matches!(e, RuntimeError::ArgumentCountMismatch { ref name, .. } if name == "print"));
}

#[test]
fn division_by_zero_fails() {
    assert!(matches!(runtime_error("println(1 / 0)"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_error("$z = 0\nprintln(5 % $z)"), RuntimeError::DivisionByZero { .. }));
}

#[test]
fn integer_overflow_fails() {
    let e = runtime_error("println(9223372036854775807 + 1)");
    assert!(matches!(e, RuntimeError::Overflow { .. }));
}

#[test]
fn runtime_errors_keep_earlier_output() {
    let (e, output) = assert_failure("println(\"before\")\nprintln(undefined)\nprintln(\"after\")");
    assert_eq!(output, "before\n");
    assert_eq!(e.exit_code(), 70);
    assert!(e.to_string().starts_with("Error on line 2, column 9"), "{e}");
}

#[test]
fn malformed_programs_produce_no_output() {
    let (e, output) = assert_failure("println(1)\n$s = \"open");
    assert_eq!(output, "");
    assert_eq!(e.exit_code(), 65);
    assert!(matches!(e, Error::Lex(ref lex) if lex.kind == LexErrorKind::UnterminatedString));

    let (e, output) = assert_failure("println(1)\nprintln(2");
    assert_eq!(output, "");
    assert_eq!(e.exit_code(), 65);
    assert!(matches!(e, Error::Parse(ParseError::UnclosedDelimiter { .. })), "{e}");

    let (e, _) = assert_failure("function (");
    assert!(matches!(e, Error::Parse(_)));
}

#[test]
fn deep_recursion_reports_stack_overflow() {
    let out = OutputBuffer::new();
    let host = Host::new(out, Vec::new());
    let config = Config::default().with_max_call_depth(16);

    let result = run_source("function down($n) { down($n + 1) }\ndown(0)", host, config);
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::StackOverflow { limit: 16, .. }))));
}

#[test]
fn recursion_near_the_default_limit_runs_on_an_ordinary_thread() {
    let src = "function down($n) { if $n > 0 { down($n - 1) } else { 0 } }\ndown(9000)";
    let host = Host::new(OutputBuffer::new(), Vec::new());
    assert_eq!(run_source(src, host, Config::default()).unwrap(), Value::Int(0));

    let e = runtime_error("function up($n) { up($n + 1) }\nup(0)");
    assert!(matches!(e, RuntimeError::StackOverflow { limit: 10_000, .. }));
}

#[test]
fn builtins_cannot_be_redefined() {
    let e = runtime_error("function println($x) { $x }");
    assert!(matches!(e, RuntimeError::BuiltinFunctionRedefinition { .. }));
}

#[test]
fn void_and_functions_are_not_printable() {
    assert!(matches!(runtime_error("print(if 0 { 1 })"), RuntimeError::NotPrintable { .. }));
    assert!(matches!(runtime_error("$f = function () { 1 }\nprintln($f)"),
                     RuntimeError::NotPrintable { .. }));
}

#[test]
fn closures_capture_their_environment() {
    let src = "function adder($n) { function ($x) { $x + $n } }\n\
               $add2 = adder(2)\n$add5 = adder(5)\nprintln($add2(1), $add5(1))";
    assert_output(src, "3 6\n");

    assert_output("function twice($x) { $x * 2 }\n$f = twice\nprintln($f(21))", "42\n");
    assert!(matches!(runtime_error("$x = 1\n$x(2)"), RuntimeError::NotCallable { .. }));
    assert!(matches!(runtime_error("$p = println"), RuntimeError::BuiltinAsValue { .. }));
}

#[test]
fn blocks_introduce_scopes() {
    let e = runtime_error("{ $inner = 1 }\nprintln($inner)");
    assert!(matches!(e, RuntimeError::UnknownVariable { .. }));

    assert_output("$outer = 1\n{ $outer = 2 }\nprintln($outer)", "2\n");
}

#[test]
fn namespaces_and_use_aliases() {
    let src = "namespace app\\util\nfunction twice($x) { $x * 2 }\n\
               use app\\util\\twice as dbl\nuse app\\util\n\
               println(twice(1), app\\util\\twice(2), dbl(3), util\\twice(4))";
    assert_output(src, "2 4 6 8\n");
}

#[test]
fn oversized_string_repetition_fails() {
    let e = runtime_error("$s = \"ab\" * 9223372036854775807");
    assert!(matches!(e, RuntimeError::Overflow { ref operation, .. } if operation == "string repetition"));

    let e = runtime_error("$s = \"ab\" * 4294967296");
    assert!(matches!(e, RuntimeError::Overflow { .. }));
    assert!(matches!(runtime_error("$s = \"ab\" * -1"), RuntimeError::TypeError { .. }));
    assert_output("println(\"ab\" * 0, \"-\")", " -\n");
}

#[test]
fn string_operations() {
    assert_output("println(\"ab\" . 1 . 2, \"ab\" + \"cd\", \"ab\" * 3)", "ab12 abcd ababab\n");
    assert_output("$s = \"héllo\"\nprintln($s->length(), $s[1], $s[4])", "5 é o\n");
    assert!(matches!(runtime_error("println(\"abc\"[3])"), RuntimeError::IndexOutOfBounds { .. }));
}

#[test]
fn array_indexing_is_bounds_checked() {
    assert!(matches!(runtime_error("$a = [1]\nprintln($a[1])"),
                     RuntimeError::IndexOutOfBounds { index: 1, len: 1, .. }));
    assert!(matches!(runtime_error("$a = [1]\nprintln($a[-1])"),
                     RuntimeError::IndexOutOfBounds { index: -1, .. }));
}

#[test]
fn methods_are_checked() {
    assert!(matches!(runtime_error("$x = 5\n$x->append(1)"), RuntimeError::ExpectedArray { .. }));
    assert!(matches!(runtime_error("$a = []\n$a->pop()"), RuntimeError::UnknownMethod { .. }));
    assert!(matches!(runtime_error("$a = []\n$a->append()"),
                     RuntimeError::ArgumentCountMismatch { .. }));
}

#[test]
fn temporary_arrays_are_released() {
    let mut context = Context::new(Host::new(OutputBuffer::new(), Vec::new()), Config::default());

    run_in(&mut context, "$keep = [0]\nforeach 0..100000 as $i { $t = [$i]\n$r = 0..3 }").unwrap();
    assert_eq!(context.heap().allocated(), 1);

    run_in(&mut context, "foreach 0..1000 as $i { $a = args()\n$keep->append([$i]) }").unwrap();
    assert_eq!(context.heap().allocated(), 1001);

    run_in(&mut context, "$keep = []").unwrap();
    assert_eq!(context.heap().allocated(), 1);
}

#[test]
fn cyclic_arrays_render() {
    assert_output("$a = [1]\n$a->append($a)\nprintln($a)", "[1, [...]]\n");
}

#[test]
fn result_is_the_last_value() {
    let host = Host::new(OutputBuffer::new(), Vec::new());
    let value = run_source("1 + 2\nprintln(0)", host, Config::default()).unwrap();
    assert_eq!(value, Value::Int(3));
}

#[test]
fn semicolons_are_optional_separators() {
    assert_output("$a = 1; $b = 2;;\nprintln($a + $b);", "3\n");
}

#[test]
fn trailing_commas_are_accepted() {
    assert_output("$a = [1, 2,]\nfunction add($x, $y,) { $x + $y }\nprintln($a, add(1, 2,))",
                  "[1, 2] 3\n");
    assert!(matches!(assert_failure("$a = [,]"), (Error::Parse(_), _)));
}

#[test]
fn a_leading_minus_continues_the_previous_expression() {
    assert_output("$y = 2\n$x = 5\n-$y\nprintln($x)", "3\n");
    assert_output("$y = 2\n$x = 5;\n-$y\nprintln($x)", "5\n");
}

#[test]
fn constants_are_global() {
    let src = "const LIMIT = 3\nfunction scaled($x) { $x * LIMIT }\nprintln(LIMIT, scaled(2))";
    assert_output(src, "3 6\n");
    assert_output("{ const INNER = \"in\" }\nprintln(INNER)", "in\n");

    let e = runtime_error("const A = 1\nconst A = 2");
    assert!(matches!(e, RuntimeError::ConstantRedefinition { ref name, .. } if name == "A"));
    assert!(matches!(runtime_error("println(MISSING)"), RuntimeError::UnknownIdentifier { .. }));
}

#[test]
fn identity_operators() {
    assert_output("println(1 === 1, 1 !== 1, 1 === \"1\", \"a\" !== \"b\")", "1 0 0 1\n");
    assert_output("$a = [1]\n$b = $a\nprintln($a === $b, $a === [1], $a !== [1])", "1 0 1\n");
}

#[test]
fn strings_convert_to_integers() {
    assert_output("$n = \"42\"\n$m = \"-7\"\nprintln($n->toInt() + 1, $m->toInt())", "43 -7\n");

    let e = runtime_error("$s = \"4x\"\n$s->toInt()");
    assert!(matches!(e, RuntimeError::InvalidInteger { ref text, .. } if text == "4x"));
    assert!(matches!(runtime_error("$s = \"1\"\n$s->toInt(1)"),
                     RuntimeError::ArgumentCountMismatch { .. }));
}
