use pacman_core::model::Direction;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// A reached state and how it was reached.
#[derive(Debug, Clone)]
pub struct PathNode<S> {
    pub state: S,
    pub moves: Vec<Direction>,
    /// Accumulated step cost from the start.
    pub backward: u32,
    /// Heuristic estimate of the remaining cost (zero outside A*).
    pub forward: u32,
    sequence: u64,
}

impl<S> PathNode<S> {
    pub fn root(state: S, forward: u32) -> Self {
        Self {
            state,
            moves: Vec::new(),
            backward: 0,
            forward,
            sequence: 0,
        }
    }

    pub fn child(&self, state: S, action: Direction, step_cost: u32, forward: u32) -> Self {
        let mut moves = Vec::with_capacity(self.moves.len() + 1);
        moves.extend_from_slice(&self.moves);
        moves.push(action);
        Self {
            state,
            moves,
            backward: self.backward + step_cost,
            forward,
            sequence: 0,
        }
    }

    pub fn priority(&self) -> u32 {
        self.backward + self.forward
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

// Min-heap on (priority, sequence): cheapest first, then oldest.
impl<S> Ord for PathNode<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority()
            .cmp(&self.priority())
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<S> PartialOrd for PathNode<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for PathNode<S> {
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority() && self.sequence == other.sequence
    }
}

impl<S> Eq for PathNode<S> {}

/// Open list shared by the planners: FIFO for breadth-first, a priority
/// queue for cost-ordered search. Equal priorities leave in insertion order.
#[derive(Debug)]
pub enum Frontier<S> {
    Fifo(VecDeque<PathNode<S>>),
    Priority {
        heap: BinaryHeap<PathNode<S>>,
        next_sequence: u64,
    },
}

impl<S> Frontier<S> {
    pub fn fifo() -> Self {
        Frontier::Fifo(VecDeque::new())
    }

    pub fn priority() -> Self {
        Frontier::Priority {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, mut node: PathNode<S>) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(node),
            Frontier::Priority {
                heap,
                next_sequence,
            } => {
                node.sequence = *next_sequence;
                *next_sequence += 1;
                heap.push(node);
            }
        }
    }

    pub fn pop(&mut self) -> Option<PathNode<S>> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Priority { heap, .. } => heap.pop(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Priority { heap, .. } => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
