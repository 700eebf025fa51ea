//! trace.rs
//! Text tree of what a view depends on: the view, then every selection it
//! reads, each followed up its parent chain.

use crate::graph::ViewId;
use crate::selection::{SelectionId, SelectionNode};
use crate::sync::ViewSynchronizer;
use std::collections::HashMap;
use std::fmt::Write;

pub fn format_trace(sync: &ViewSynchronizer, view: ViewId) -> String {
    let mut tracer = Tracer { sync, visited_at_level: HashMap::new(), output: String::new() };

    if view.index() < sync.view_count() {
        let _ = writeln!(tracer.output, "DEPENDENCY TRACE for view '{}':", sync.view_name(view));
        let _ = writeln!(tracer.output, "--------------------------------------------------");
        tracer.trace_view(view);
    } else {
        let _ = writeln!(tracer.output, "Error: Invalid View ID {:?}", view);
    }
    tracer.output
}

struct Tracer<'a> {
    sync: &'a ViewSynchronizer,
    visited_at_level: HashMap<SelectionId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_view(&mut self, view: ViewId) {
        let state = if self.sync.is_dirty(view) { "dirty" } else { "clean" };
        let outcome = match self.sync.last_output(view) {
            Some(Ok(out)) => format!(" series={}", out.chart.series.len()),
            Some(Err(e)) => format!(" [Err: {}]", e),
            None => String::new(),
        };
        let labels = self.sync.resolve(view).labels;
        let _ = writeln!(self.output, "[L1] {} ({}){} filters=[{}]", self.sync.view_name(view), state, outcome, labels.join(", "));

        let reads = self.sync.dependency_set(view);
        self.recurse(reads, "", 1);
    }

    fn trace_selection(&mut self, id: SelectionId, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&id) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(id, level);

        let node = self.sync.selection_by_id(id);
        let _ = writeln!(self.output, "{}[L{}] {} = {}", prefix, level, node.name, format_values(node));

        if let Some(parent) = self.sync.graph().parent_of(id) {
            self.recurse(&[parent], prefix, level);
        }
    }

    fn recurse(&mut self, children: &[SelectionId], prefix: &str, level: usize) {
        let stem = build_child_stem(prefix);
        for (i, &child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_selection(child, level + 1, &full_prefix);
        }
    }
}

fn format_values(node: &SelectionNode) -> String {
    format!("[{}] of {}", node.current_values().join(", "), node.available_options().len())
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`--", "   ").replace("|--", "|  ")
}
