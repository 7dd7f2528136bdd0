pub mod diagnostics;
pub mod factor;
pub mod operator;
pub mod parser;
pub mod printer;
pub mod reader;
pub mod token;
pub mod tree;

pub use diagnostics::{Diagnostic, EngineErrorKind, ParseErrorKind};
pub use factor::{Dump, FactoringEngine, Substitution};
pub use parser::Parser;
pub use reader::{Reader, SliceReader, StdinReader};
pub use token::{Token, TokenKind};
pub use tree::{Budget, TreeNode};
