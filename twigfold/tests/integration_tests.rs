use itertools::Itertools;
use twigfold::expr::{Budget, FactoringEngine, Parser, SliceReader};

fn run(input: &str) -> (Vec<String>, Vec<String>) {
    let mut parser = Parser::new();
    let mut reader = SliceReader::new(input);
    parser.parse(&mut reader).expect("input should parse");
    let mut engine = FactoringEngine::new(parser.take_finished());
    let mut substitutions = Vec::new();
    engine
        .simplify(&mut Budget::unlimited(), |sub| substitutions.push(sub.to_string()))
        .expect("unlimited budget should never fail");
    let expressions = engine.trees().iter().map(ToString::to_string).collect_vec();
    (substitutions, expressions)
}

#[test]
fn end_to_end_leaves_a_bare_operand_untouched() {
    // A single operand has no twig at all: is_twig requires at least one
    // child, so a leaf alone never triggers a substitution.
    let (substitutions, expressions) = run("a");
    assert!(substitutions.is_empty());
    assert_eq!(expressions, vec!["a"]);
}

#[test]
fn end_to_end_folds_every_twig_down_to_a_single_variable() {
    let (substitutions, expressions) = run("a+b*c");
    assert_eq!(substitutions, vec!["#0 = b*c", "#1 = a+#0"]);
    assert_eq!(expressions, vec!["#1"]);
}

#[test]
fn end_to_end_factors_a_twig_shared_between_two_expressions() {
    let (substitutions, expressions) = run("a+b,(a+b)*c");
    assert_eq!(substitutions, vec!["#0 = a+b", "#1 = #0*c"]);
    assert_eq!(expressions, vec!["#0", "#1"]);
}

#[test]
fn end_to_end_handles_nested_repetition_across_rounds() {
    // Folding the first twig can turn its parent into a fresh twig, so a
    // single input can take several rounds to fully collapse.
    let (substitutions, expressions) = run("(x*y)+(x*y)*(x*y)");
    assert_eq!(
        substitutions,
        vec!["#0 = x*y", "#1 = #0*#0", "#2 = #0+#1"]
    );
    assert_eq!(expressions, vec!["#2"]);
}

#[test]
fn end_to_end_respects_left_associativity_of_same_precedence_operators() {
    // a-b+c must group as (a-b)+c: the first twig folded out is a-b, not
    // b+c, which would be the case under right-associative grouping.
    let (substitutions, _) = run("a-b+c");
    assert_eq!(substitutions[0], "#0 = a-b");
}

#[test]
fn end_to_end_accepts_mixed_bracket_styles_as_equivalent() {
    let (_, left) = run("[a+b}*c");
    let (_, right) = run("(a+b)*c");
    assert_eq!(left, right);
}

#[test]
fn end_to_end_rejects_unparseable_input() {
    let mut parser = Parser::new();
    let mut reader = SliceReader::new("a+");
    assert!(parser.parse(&mut reader).is_err());
}

#[test]
fn end_to_end_substitutions_are_valid_input_for_a_second_pass() {
    let (_, expressions) = run("a+b,(a+b)*c");
    let fed_back = expressions.join(",");
    let (substitutions, _) = run(&fed_back);
    // #0 and #0*c parse cleanly (# is a valid identifier-start byte) and
    // share no further twig, so nothing new gets factored.
    assert!(substitutions.is_empty());
}
