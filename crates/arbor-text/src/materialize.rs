//! Lowering a parsed tree into storage.

use arbor_store::{Descriptor, Storage};
use tracing::debug;

use crate::ast::AstNode;
use crate::value::{Dispatch, ValueParsers};

/// Counters collected over one [`materialize`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Values a parser or the text fallback stored.
    pub values_written: usize,
    /// Values no parser claimed or the claiming parser rejected.
    pub values_skipped: usize,
    /// Named nodes walked.
    pub nodes_visited: usize,
}

/// Write `ast` below `target`.
///
/// Each child named `n` lands at `target.child(n)`; a node's value goes
/// through `parsers` before its own children are visited. A value on `ast`
/// itself is written to `target`.
pub fn materialize<S: Storage>(
    ast: &AstNode,
    target: &Descriptor<'_, S>,
    parsers: &ValueParsers<S>,
) -> MaterializeReport {
    let mut report = MaterializeReport::default();
    visit(ast, target, parsers, &mut report);
    debug!(
        root = %target.key(),
        written = report.values_written,
        skipped = report.values_skipped,
        nodes = report.nodes_visited,
        "materialized text"
    );
    report
}

fn visit<S: Storage>(
    node: &AstNode,
    target: &Descriptor<'_, S>,
    parsers: &ValueParsers<S>,
    report: &mut MaterializeReport,
) {
    if let Some(value) = &node.value {
        match parsers.dispatch(target, node.explicit_type.as_deref(), value) {
            Dispatch::Written(_) | Dispatch::Fallback => report.values_written += 1,
            Dispatch::Rejected(_) | Dispatch::Unmatched => report.values_skipped += 1,
        }
    }
    for (name, child) in &node.children {
        report.nodes_visited += 1;
        visit(child, &target.child(name.as_str()), parsers, report);
    }
}
