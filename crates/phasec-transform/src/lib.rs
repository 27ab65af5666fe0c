//! The checked-tree transform framework and the return-lifting pass
//! (spec.md §4.5): a generic walker drives `pre`/`post` hooks a `Transform`
//! implements over expressions, statements, and declarations, letting a
//! pass rewrite nodes without hand-rolling its own descent. The one shipped
//! transform, [`ReturnLift`], is built on top of it.

mod return_lift;
mod walker;

pub use return_lift::ReturnLift;
pub use walker::{walk_block, walk_decl, walk_expr, walk_file, walk_stmt, Transform};
