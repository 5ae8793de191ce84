//! The `dot` module contains the conversion from an NFA or a DFA to a graphviz dot format.
//! The functions in this module are used for testing and debugging purposes.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use crate::{Dfa, Nfa, Symbol};

/// Render the NFA to a graphviz dot format.
pub fn nfa_render_to<S: Symbol, W: Write>(nfa: &Nfa<S>, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for node in nfa.nodes() {
        let source_id = {
            let mut source_node = digraph.node_auto();
            source_node.set_label(&node.id().as_usize().to_string());
            if node.flags().source {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            }
            if node.flags().sink {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0);
            }
            source_node.id()
        };
        for transition in node.transitions() {
            digraph
                .edge(
                    source_id.clone(),
                    &format!("node_{}", transition.target_state().as_usize()),
                )
                .attributes()
                .set_label(&transition.label().label().escape_default().to_string());
        }
    }
}

/// Render a DFA to a graphviz dot format.
/// Transitions between the same pair of states are drawn as a single edge.
pub fn dfa_render_to<S: Symbol, W: Write>(dfa: &Dfa<S>, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    // Render the states of the DFA
    for state in dfa.states() {
        let mut source_node = digraph.node_auto();
        source_node.set_label(&state.id().as_usize().to_string());
        if state.id() == dfa.start_state() {
            source_node
                .set_shape(dot_writer::Shape::Circle)
                .set_color(dot_writer::Color::Blue)
                .set_pen_width(3.0);
        }
        if state.is_accepting() {
            source_node
                .set_color(dot_writer::Color::Red)
                .set_pen_width(3.0);
        }
    }
    // Render the transitions of the DFA
    for state in dfa.states() {
        for (symbols, target_id) in dfa.grouped_transitions(state.id()) {
            digraph
                .edge(
                    &format!("node_{}", state.id().as_usize()),
                    &format!("node_{}", target_id.as_usize()),
                )
                .attributes()
                .set_label(&symbols.label().escape_default().to_string());
        }
    }
}
