//! Conversion of a compiled automaton to the graphviz dot format.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use crate::context::ContextInner;

/// Render the context's automaton to a graphviz dot graph.
///
/// The start state is drawn blue, accepting states red with the name of
/// their first indexed pattern; default transitions are labeled `*`.
pub(crate) fn context_render<W: Write>(ctxt: &ContextInner, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for state in ctxt.dfa.states() {
        let node_name = format!("node_{}", state.id());
        {
            let mut node = digraph.node_named(&node_name);
            if state.id() == ctxt.dfa.start() {
                node.set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            }
            if state.is_accepting() {
                node.set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0);
            }
            let node_label = match ctxt.index.patterns(state.id()) {
                Some([pattern, ..]) => format!("{}:{}", state.id(), pattern.name()),
                _ => state.id().to_string(),
            };
            node.set_label(&node_label);
        }
        for (set, target) in state.transitions() {
            digraph
                .edge(node_name.clone(), format!("node_{}", target))
                .attributes()
                .set_label(&set.to_string().escape_default().to_string());
        }
        digraph
            .edge(node_name.clone(), format!("node_{}", state.default_target()))
            .attributes()
            .set_label("*");
    }
}
