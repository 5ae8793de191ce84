//! This module contains the DFA implementation.
//! The DFA is used to match a string against a regex pattern.
//! The DFA is generated from the NFA using the subset construction algorithm.
//!
//! The DFA is partial: a state has at most one transition per alphabet symbol and a missing
//! transition means that no match is possible anymore.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::{debug, trace};

use crate::{DfaStateID, Nfa, StateID, Symbol, SymbolSet};

/// The DFA implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa<S: Symbol = u8> {
    // The states of the DFA. The start state is always the first state in the vector, i.e. state 0.
    states: Vec<DfaState>,
    // All symbols the DFA has transitions for.
    alphabet: SymbolSet<S>,
    // The transitions of the DFA, indexed by the source state.
    transitions: Vec<BTreeMap<S, DfaStateID>>,
}

impl<S: Symbol> Dfa<S> {
    /// Get the states of the DFA.
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// The start state. This is always state 0.
    pub fn start_state(&self) -> DfaStateID {
        DfaStateID::default()
    }

    /// The alphabet of the DFA.
    pub fn alphabet(&self) -> &SymbolSet<S> {
        &self.alphabet
    }

    /// Returns true if the given state is an accepting state.
    pub fn is_accepting(&self, state_id: DfaStateID) -> bool {
        self.states
            .get(state_id.as_usize())
            .is_some_and(|state| state.accepting)
    }

    /// Iterate over the accepting states.
    pub fn accepting_states(&self) -> impl Iterator<Item = DfaStateID> + '_ {
        self.states
            .iter()
            .filter(|state| state.accepting)
            .map(|state| state.id)
    }

    /// The target of the transition from `state_id` on `symbol`, if there is one.
    #[inline]
    pub fn transition(&self, state_id: DfaStateID, symbol: &S) -> Option<DfaStateID> {
        self.transitions
            .get(state_id.as_usize())
            .and_then(|targets| targets.get(symbol))
            .copied()
    }

    /// The transitions of a state.
    pub fn transitions(&self, state_id: DfaStateID) -> &BTreeMap<S, DfaStateID> {
        &self.transitions[state_id]
    }

    /// The transitions of a state, with all symbols that lead to the same target merged into
    /// one set. The result is ordered by target state.
    pub fn grouped_transitions(&self, state_id: DfaStateID) -> Vec<(SymbolSet<S>, DfaStateID)> {
        let chunks = self.transitions[state_id]
            .iter()
            .sorted_by_key(|(_, target)| **target)
            .chunk_by(|(_, target)| **target);
        chunks
            .into_iter()
            .map(|(target, group)| {
                let symbols: SymbolSet<S> = group.map(|(symbol, _)| symbol.clone()).collect();
                (symbols, target)
            })
            .collect()
    }

    /// Runs the DFA on the input and returns true if it ends in an accepting state.
    pub fn accepts<I>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = S>,
    {
        let mut state = self.start_state();
        for symbol in input {
            match self.transition(state, &symbol) {
                Some(next_state) => state = next_state,
                None => return false,
            }
        }
        self.is_accepting(state)
    }

    /// Create a DFA from an NFA.
    /// The DFA is created using the subset construction algorithm. The NFA is left untouched.
    pub fn from_nfa(nfa: &Nfa<S>) -> Self {
        let mut dfa = Dfa {
            states: Vec::new(),
            alphabet: nfa.symbols(),
            transitions: Vec::new(),
        };
        // An NFA without nodes accepts the empty input only, like an NFA with a lone start node.
        let accepts_at_start = nfa.nodes().is_empty();
        let mut known_states: BTreeMap<Vec<StateID>, DfaStateID> = BTreeMap::new();

        // The initial state of the DFA is the epsilon closure of the start state of the NFA.
        let start_state = nfa.epsilon_closure([nfa.start_state()]);
        let (initial_state, _) = dfa.add_state_if_new(start_state, nfa, &mut known_states);
        if accepts_at_start {
            dfa.states[initial_state].accepting = true;
        }
        // The work list is used to keep track of the states that need to be processed.
        let mut work_list = vec![initial_state];

        while let Some(state_id) = work_list.pop() {
            let nfa_states: BTreeSet<StateID> =
                dfa.states[state_id].nfa_states.iter().copied().collect();
            for symbol in dfa.alphabet.clone().iter() {
                let target_states = nfa.epsilon_closure(nfa.move_set(&nfa_states, symbol));
                if target_states.is_empty() {
                    continue;
                }
                let (target_state, is_new) =
                    dfa.add_state_if_new(target_states, nfa, &mut known_states);
                dfa.transitions[state_id].insert(symbol.clone(), target_state);
                if is_new {
                    work_list.push(target_state);
                }
            }
        }

        debug!(
            "Subset construction: {} NFA nodes, {} DFA states",
            nfa.len(),
            dfa.states.len()
        );
        dfa
    }

    /// Add a state to the DFA if it does not already exist.
    /// The state is identified by the NFA states that constitute the DFA state.
    /// Returns the state id and whether the state was added.
    fn add_state_if_new(
        &mut self,
        nfa_states: BTreeSet<StateID>,
        nfa: &Nfa<S>,
        known_states: &mut BTreeMap<Vec<StateID>, DfaStateID>,
    ) -> (DfaStateID, bool) {
        let nfa_states: Vec<StateID> = nfa_states.into_iter().collect();
        if let Some(state_id) = known_states.get(&nfa_states) {
            return (*state_id, false);
        }

        let state_id = DfaStateID::new(self.states.len());
        // The state is accepting if it contains the sink of the NFA.
        let accepting = !nfa.nodes().is_empty() && nfa_states.contains(&nfa.end_state());
        trace!(
            "Add state {}: {:?}{}",
            state_id,
            nfa_states,
            if accepting { " (accepting)" } else { "" }
        );
        known_states.insert(nfa_states.clone(), state_id);
        self.states.push(DfaState {
            id: state_id,
            nfa_states,
            accepting,
        });
        self.transitions.push(BTreeMap::new());
        (state_id, true)
    }

    /// Minimize the DFA.
    ///
    /// The states are partitioned into groups of equivalent states by repeatedly splitting
    /// groups whose members disagree on the group their transitions lead to. Each group
    /// becomes one state of the minimized DFA; the group of the start state becomes state 0.
    /// The NFA states are removed from the DFA states during minimization. They are not needed
    /// anymore after the DFA is created.
    pub fn minimize(&self) -> Self {
        let mut group_of: Vec<usize> = Self::number_by_first_appearance(
            self.states.iter().map(|state| state.accepting),
        );
        let mut group_count = group_of.iter().max().map_or(0, |max| max + 1);

        loop {
            let signatures = self.states.iter().map(|state| {
                let targets = self
                    .alphabet
                    .iter()
                    .map(|symbol| {
                        self.transition(state.id, symbol)
                            .map(|target| group_of[target.as_usize()])
                    })
                    .collect::<Vec<_>>();
                (group_of[state.id.as_usize()], targets)
            });
            let new_group_of = Self::number_by_first_appearance(signatures);
            let new_group_count = new_group_of.iter().max().map_or(0, |max| max + 1);
            group_of = new_group_of;
            if new_group_count == group_count {
                break;
            }
            group_count = new_group_count;
        }

        let mut minimized = Dfa {
            states: Vec::with_capacity(group_count),
            alphabet: self.alphabet.clone(),
            transitions: Vec::with_capacity(group_count),
        };
        for (state_index, group_id) in group_of.iter().copied().enumerate() {
            if group_id < minimized.states.len() {
                continue;
            }
            // Groups are numbered by first appearance, so this is the representative.
            let representative = DfaStateID::new(state_index);
            minimized.states.push(DfaState {
                id: DfaStateID::new(group_id),
                nfa_states: Vec::new(),
                accepting: self.states[representative].accepting,
            });
            minimized.transitions.push(
                self.transitions[representative]
                    .iter()
                    .map(|(symbol, target)| {
                        (symbol.clone(), DfaStateID::new(group_of[target.as_usize()]))
                    })
                    .collect(),
            );
        }

        debug!(
            "Minimized DFA from {} to {} states",
            self.states.len(),
            minimized.states.len()
        );
        minimized
    }

    /// Assigns consecutive numbers to the distinct keys in the order they first appear.
    fn number_by_first_appearance<K, I>(keys: I) -> Vec<usize>
    where
        K: Ord,
        I: IntoIterator<Item = K>,
    {
        let mut numbers: BTreeMap<K, usize> = BTreeMap::new();
        keys.into_iter()
            .map(|key| {
                let next = numbers.len();
                *numbers.entry(key).or_insert(next)
            })
            .collect()
    }
}

impl<S: Symbol> From<&Nfa<S>> for Dfa<S> {
    fn from(nfa: &Nfa<S>) -> Self {
        Dfa::from_nfa(nfa)
    }
}

/// A state of a DFA.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DfaState {
    id: DfaStateID,
    // The ids of the NFA states that constitute this DFA state. The id can only be used as indices
    // into the NFA states.
    nfa_states: Vec<StateID>,
    accepting: bool,
}

impl DfaState {
    /// Get the id of the DFA state.
    pub fn id(&self) -> DfaStateID {
        self.id
    }

    /// Get the NFA states that constitute the DFA state, in ascending order.
    /// Empty for states of a minimized DFA.
    pub fn nfa_states(&self) -> &[StateID] {
        &self.nfa_states
    }

    /// Returns true if the state is an accepting state.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

impl<S: Symbol> std::fmt::Display for Dfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "States:")?;
        for state in &self.states {
            writeln!(
                f,
                "{}{}: {:?}",
                state.id,
                if state.accepting { "*" } else { "" },
                state.nfa_states.iter().map(StateID::as_usize).collect_vec()
            )?;
        }
        writeln!(f, "Transitions:")?;
        for state in &self.states {
            write!(f, "{} -> ", state.id)?;
            for (symbols, target_id) in self.grouped_transitions(state.id) {
                write!(f, "{}:{} ", symbols.label(), target_id)?;
            }
            writeln!(f)?
        }
        Ok(())
    }
}
