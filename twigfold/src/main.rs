use std::process::ExitCode;
use twigfold::expr::diagnostics::Diagnostic;
use twigfold::expr::{Budget, Dump, FactoringEngine, Parser, StdinReader, Token};

const SUBSYSTEM: &str = "Factor";

fn main() -> ExitCode {
    let mut reader = match StdinReader::from_stdin() {
        Ok(reader) => reader,
        Err(err) => {
            eprintln!("{SUBSYSTEM}: failed to read stdin: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut parser = Parser::new();
    if let Err(diag) = parser.parse(&mut reader) {
        eprintln!("{diag}");
        return ExitCode::FAILURE;
    }

    let assembly = parser.assembly_token().clone();
    let operator_stack: Vec<Token> = parser.operator_stack().to_vec();
    let operand_stack = parser.operand_stack().to_vec();

    let mut engine = FactoringEngine::new(parser.take_finished());
    let engine_result = engine.simplify(&mut Budget::unlimited(), |sub| println!("{sub}"));

    let exit_code = match engine_result {
        Ok(()) => ExitCode::SUCCESS,
        Err(kind) => {
            eprintln!("{}", Diagnostic::new(SUBSYSTEM, to_parse_error(kind)));
            ExitCode::FAILURE
        }
    };

    let dump = Dump {
        assembly: &assembly,
        operator_stack: &operator_stack,
        operand_stack: &operand_stack,
        expressions: engine.trees(),
    };
    print!("{dump}");

    exit_code
}

/// The factoring engine only raises `InsufficientMemory`; map it onto the
/// same `ParseErrorKind` variant so both subsystems render identically.
fn to_parse_error(kind: twigfold::expr::EngineErrorKind) -> twigfold::expr::ParseErrorKind {
    match kind {
        twigfold::expr::EngineErrorKind::InsufficientMemory => {
            twigfold::expr::ParseErrorKind::InsufficientMemory
        }
    }
}
