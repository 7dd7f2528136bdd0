use crate::expr::operator;
use crate::expr::tree::TreeNode;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Infix rendering of a tree (spec §5). Parentheses are never reinserted,
/// so a tree built from `(a+b)*c` prints as `a+b*c` — lossy by design, not
/// a bug: the printer exists to label factored-out patterns, not to
/// round-trip back to parseable input.
impl Display for TreeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.children() {
            [] => write!(f, "{}", self.token()),
            [only] => write!(f, "{}{}", operator::lexeme(self.token().kind), only),
            children => {
                let lexeme = operator::lexeme(self.token().kind);
                write!(f, "{}", children.iter().map(ToString::to_string).join(lexeme))
            }
        }
    }
}
