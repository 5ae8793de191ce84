//! This module contains the NFA (Non-deterministic Finite Automaton) implementation.
//! The NFA is built with the Thompson construction from four composition primitives.
//! The NFA is later converted to a DFA (Deterministic Finite Automaton) for matching strings.
//!
//! The nodes of an NFA live in an arena and are addressed by dense [`StateID`]s. In a non-empty
//! NFA node 0 is always the only source and the last node is always the only sink. The
//! numbering is stable and observable: ids are assigned in construction order and merged
//! automata are renumbered by adding the receiver's size to the imported ids.

use std::collections::BTreeSet;

use log::trace;

use crate::{StateID, Symbol, SymbolSet};

/// The label of an NFA transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label<S> {
    /// A transition that is taken without consuming input.
    Epsilon,
    /// A transition that consumes the given symbol.
    Symbol(S),
}

impl<S: Symbol> Label<S> {
    /// Returns true for epsilon transitions.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// The consumed symbol, if any.
    pub fn symbol(&self) -> Option<&S> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(s) => Some(s),
        }
    }

    /// A human readable label.
    pub fn label(&self) -> String {
        match self {
            Label::Epsilon => "ε".to_string(),
            Label::Symbol(s) => s.label(),
        }
    }
}

/// The boundary flags of an NFA node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// The node is the start node.
    pub source: bool,
    /// The node is the accepting node.
    pub sink: bool,
}

impl NodeFlags {
    const SINK: NodeFlags = NodeFlags {
        source: false,
        sink: true,
    };
    const SOURCE_AND_SINK: NodeFlags = NodeFlags {
        source: true,
        sink: true,
    };
}

/// An outgoing transition of an NFA node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NfaTransition<S> {
    label: Label<S>,
    target_state: StateID,
}

impl<S: Symbol> NfaTransition<S> {
    /// Create a new transition.
    pub fn new(label: Label<S>, target_state: StateID) -> Self {
        Self {
            label,
            target_state,
        }
    }

    /// The label of the transition.
    pub fn label(&self) -> &Label<S> {
        &self.label
    }

    /// The state the transition leads to.
    pub fn target_state(&self) -> StateID {
        self.target_state
    }
}

/// A node of an NFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaNode<S> {
    id: StateID,
    flags: NodeFlags,
    transitions: Vec<NfaTransition<S>>,
}

impl<S: Symbol> NfaNode<S> {
    fn new(id: StateID, flags: NodeFlags) -> Self {
        Self {
            id,
            flags,
            transitions: Vec::new(),
        }
    }

    /// The id of the node.
    pub fn id(&self) -> StateID {
        self.id
    }

    /// The boundary flags of the node.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// The outgoing transitions in insertion order.
    pub fn transitions(&self) -> &[NfaTransition<S>] {
        &self.transitions
    }

    /// Apply an offset to the node id and to all transition targets.
    fn offset(&mut self, offset: usize) {
        self.id += offset;
        for transition in self.transitions.iter_mut() {
            transition.target_state += offset;
        }
    }
}

/// A Thompson NFA over the alphabet `S`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa<S: Symbol = u8> {
    nodes: Vec<NfaNode<S>>,
}

impl<S: Symbol> Default for Nfa<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> Nfa<S> {
    /// Create an uninitialized NFA without any nodes.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Returns true if the NFA has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the NFA has no transitions, i.e. it has at most a lone start node.
    /// Such an NFA accepts only the empty input and is neutral in concatenation and branching.
    pub fn has_no_transitions(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// The number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The start node. This is always node 0.
    pub fn start_state(&self) -> StateID {
        StateID::default()
    }

    /// The accepting node. This is always the last node.
    pub fn end_state(&self) -> StateID {
        StateID::new(self.nodes.len().saturating_sub(1))
    }

    /// All nodes, indexed by their id.
    pub fn nodes(&self) -> &[NfaNode<S>] {
        &self.nodes
    }

    /// The node with the given id.
    pub fn node(&self, id: StateID) -> Option<&NfaNode<S>> {
        self.nodes.get(id.as_usize())
    }

    /// All symbols that label a transition.
    pub fn symbols(&self) -> SymbolSet<S> {
        self.nodes
            .iter()
            .flat_map(|node| node.transitions.iter())
            .filter_map(|transition| transition.label.symbol().cloned())
            .collect()
    }

    fn new_node(&mut self, flags: NodeFlags) -> StateID {
        let id = StateID::new(self.nodes.len());
        self.nodes.push(NfaNode::new(id, flags));
        id
    }

    fn add_transition(&mut self, from: StateID, label: Label<S>, target_state: StateID) {
        self.nodes[from]
            .transitions
            .push(NfaTransition::new(label, target_state));
    }

    fn clear_sink(&mut self, id: StateID) {
        self.nodes[id].flags.sink = false;
    }

    /// Moves all nodes of `nfa` into this NFA, renumbered by this NFA's current size.
    /// The imported nodes lose their source flag. Returns the new ids of the imported start
    /// and end nodes.
    fn import(&mut self, nfa: Nfa<S>) -> (StateID, StateID) {
        let offset = self.nodes.len();
        let imported_len = nfa.nodes.len();
        for mut node in nfa.nodes {
            node.offset(offset);
            node.flags.source = false;
            self.nodes.push(node);
        }
        (
            StateID::new(offset),
            StateID::new(offset + imported_len - 1),
        )
    }

    /// Adds a transition from the current sink to a new sink.
    /// On an uninitialized NFA the start node is created first.
    pub fn append_transition(&mut self, label: Label<S>) {
        if self.nodes.is_empty() {
            self.new_node(NodeFlags::SOURCE_AND_SINK);
        }
        let old_sink = self.end_state();
        self.clear_sink(old_sink);
        let new_sink = self.new_node(NodeFlags::SINK);
        self.add_transition(old_sink, label, new_sink);
    }

    /// Concatenates the current NFA with another NFA.
    ///
    /// All nodes of `nfa` are imported with their ids offset by the size of this NFA. The
    /// current sink takes over the start transitions of `nfa` and the last imported node
    /// becomes the new sink.
    pub fn append_nfa(&mut self, nfa: Nfa<S>) {
        if nfa.has_no_transitions() {
            return;
        }
        if self.nodes.is_empty() {
            *self = nfa;
            return;
        }

        let old_sink = self.end_state();
        let (imported_start, _) = self.import(nfa);
        let start_transitions = self.nodes[imported_start].transitions.clone();
        self.clear_sink(old_sink);
        self.nodes[old_sink].transitions = start_transitions;
    }

    /// Returns true if the NFA already has the shape produced by [`Nfa::apply_kleene`].
    fn is_closure(&self) -> bool {
        let len = self.nodes.len();
        if len < 4 {
            return false;
        }
        let expected = [
            NfaTransition::new(Label::Epsilon, StateID::new(len - 2)),
            NfaTransition::new(Label::Epsilon, StateID::new(len - 1)),
        ];
        self.nodes[0].transitions == expected && self.nodes[len - 3].transitions == expected
    }

    /// Applies the Kleene closure to the whole NFA: it then matches zero or more repetitions.
    ///
    /// The transitions of the start node move to a new loop node. The start node and the old
    /// sink both get an epsilon transition to the loop node and one to a new sink.
    /// Applying the closure to an NFA that is already a closure does nothing.
    pub fn apply_kleene(&mut self) {
        if self.has_no_transitions() {
            return;
        }
        if self.is_closure() {
            trace!("Kleene closure already applied");
            return;
        }

        let start = self.start_state();
        let old_sink = self.end_state();
        let loop_state = self.new_node(NodeFlags::default());
        self.nodes[loop_state].transitions = std::mem::take(&mut self.nodes[start].transitions);
        let new_sink = self.new_node(NodeFlags::SINK);
        self.clear_sink(old_sink);
        for from in [start, old_sink] {
            self.add_transition(from, Label::Epsilon, loop_state);
            self.add_transition(from, Label::Epsilon, new_sink);
        }
    }

    /// Adds an alternative branch to the NFA.
    ///
    /// The start node is shared: it takes over the start transitions of the imported `nfa`.
    /// Both former sinks get an epsilon transition to a new shared sink.
    pub fn add_branch(&mut self, nfa: Nfa<S>) {
        if nfa.has_no_transitions() {
            return;
        }
        if self.has_no_transitions() {
            *self = nfa;
            return;
        }

        let own_sink = self.end_state();
        let (imported_start, imported_sink) = self.import(nfa);
        let start_transitions = self.nodes[imported_start].transitions.clone();
        let start = self.start_state();
        self.nodes[start].transitions.extend(start_transitions);

        let new_sink = self.new_node(NodeFlags::SINK);
        for from in [own_sink, imported_sink] {
            self.clear_sink(from);
            self.add_transition(from, Label::Epsilon, new_sink);
        }
    }

    /// The set of states reachable from the given states by epsilon transitions only,
    /// including the given states themselves.
    pub fn epsilon_closure<I>(&self, states: I) -> BTreeSet<StateID>
    where
        I: IntoIterator<Item = StateID>,
    {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<StateID> = states.into_iter().collect();
        while let Some(state) = stack.pop() {
            if state.as_usize() >= self.nodes.len() || !closure.insert(state) {
                continue;
            }
            for transition in &self.nodes[state].transitions {
                if transition.label.is_epsilon() && !closure.contains(&transition.target_state) {
                    stack.push(transition.target_state);
                }
            }
        }
        closure
    }

    /// The set of states reachable from the given states by one transition on `symbol`.
    pub fn move_set(&self, states: &BTreeSet<StateID>, symbol: &S) -> BTreeSet<StateID> {
        states
            .iter()
            .flat_map(|state| self.nodes[*state].transitions.iter())
            .filter(|transition| transition.label.symbol() == Some(symbol))
            .map(|transition| transition.target_state)
            .collect()
    }

    /// Simulates the NFA on the input and returns true if it ends in the sink.
    /// An NFA without transitions accepts only the empty input.
    pub fn accepts<I>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = S>,
    {
        let mut input = input.into_iter();
        if self.has_no_transitions() {
            return input.next().is_none();
        }
        let mut current = self.epsilon_closure([self.start_state()]);
        for symbol in input {
            current = self.epsilon_closure(self.move_set(&current, &symbol));
            if current.is_empty() {
                return false;
            }
        }
        current.contains(&self.end_state())
    }
}
