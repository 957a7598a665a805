//! This module implements the search loops shared by the solvers: a breadth-first loop and a
//! best-first loop in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html),
//! changed to keep a settled set and to record the order in which nodes are expanded.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::debug;
use num_traits::{One, Zero};

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::hash::Hash;
use std::ops::Add;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Parent index recorded for the start node.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Everything a single search leaves behind: the expansion order and, for every discovered node,
/// the index of its predecessor in the same map together with the best known cost.
#[derive(Clone, Debug)]
pub struct SearchResult<N, C> {
    pub(crate) expanded: Vec<N>,
    pub(crate) parents: FxIndexMap<N, (usize, C)>,
}

struct SmallestCostHolder<K> {
    estimated_cost: K,
    heuristic: K,
    sequence: usize,
    index: usize,
}

fn cmp_cost<K: PartialOrd>(a: &K, b: &K) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

impl<K: PartialOrd> Eq for SmallestCostHolder<K> {}

impl<K: PartialOrd> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest element, so every comparison is reversed. Orders per
        // estimated cost first, then favours the smaller heuristic (the node closer to the goal),
        // then the node that was pushed first.
        cmp_cost(&other.estimated_cost, &self.estimated_cost)
            .then_with(|| cmp_cost(&other.heuristic, &self.heuristic))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Expands nodes in order of `cost + heuristic` until `success` holds for an expanded node or
/// the frontier runs dry. A popped node that is already settled is skipped, which discards the
/// stale entries left behind by relaxations. Costs must be non-negative.
pub(crate) fn best_first<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> SearchResult<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + PartialOrd + Copy + Add<Output = C>,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    let start_h = heuristic(start);
    to_see.push(SmallestCostHolder {
        estimated_cost: start_h,
        heuristic: start_h,
        sequence: 0,
        index: 0,
    });
    let mut sequence = 0;
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (NO_PARENT, Zero::zero()));
    let mut settled: FxHashSet<usize> = FxHashSet::default();
    let mut expanded = Vec::new();

    while let Some(SmallestCostHolder { index, .. }) = to_see.pop() {
        if !settled.insert(index) {
            continue;
        }
        let Some((node, &(_, cost))) = parents.get_index(index) else {
            continue;
        };
        let node = node.clone();
        expanded.push(node.clone());
        if success(&node) {
            debug!("Goal settled after {} expansions", expanded.len());
            return SearchResult { expanded, parents };
        }
        for (successor, move_cost) in successors(&node) {
            let new_cost = cost + move_cost;
            let h;
            let n;
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if !settled.contains(&e.index()) && new_cost < e.get().1 {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            sequence += 1;
            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                heuristic: h,
                sequence,
                index: n,
            });
        }
    }
    debug!("Frontier exhausted after {} expansions", expanded.len());
    SearchResult { expanded, parents }
}

/// First-in-first-out search counting one unit of cost per hop. Nodes are marked as seen when
/// they are enqueued, so each node enters the queue at most once.
pub(crate) fn breadth_first<N, C, FN, IN, FS>(
    start: &N,
    mut successors: FN,
    mut success: FS,
) -> SearchResult<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + One + Copy + Add<Output = C>,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
    FS: FnMut(&N) -> bool,
{
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (NO_PARENT, Zero::zero()));
    let mut queue = VecDeque::from([0]);
    let mut expanded = Vec::new();

    while let Some(index) = queue.pop_front() {
        let Some((node, &(_, hops))) = parents.get_index(index) else {
            continue;
        };
        let node = node.clone();
        expanded.push(node.clone());
        if success(&node) {
            debug!("Goal dequeued after {} expansions", expanded.len());
            return SearchResult { expanded, parents };
        }
        for successor in successors(&node) {
            if let Vacant(e) = parents.entry(successor) {
                queue.push_back(e.index());
                e.insert((index, hops + One::one()));
            }
        }
    }
    debug!("Queue exhausted after {} expansions", expanded.len());
    SearchResult { expanded, parents }
}

impl<N: Eq + Hash + Clone, C: Copy> SearchResult<N, C> {
    /// Nodes in the order they were expanded (dequeued or settled).
    pub fn expanded(&self) -> &[N] {
        &self.expanded
    }
    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }
    pub fn into_expanded(self) -> Vec<N> {
        self.expanded
    }
    /// Whether the search discovered `node` at all.
    pub fn reached(&self, node: &N) -> bool {
        self.parents.contains_key(node)
    }
    /// Best cost known for `node` when the search stopped. For breadth-first searches this is the
    /// hop count.
    pub fn cost_to(&self, node: &N) -> Option<C> {
        self.parents.get(node).map(|&(_, c)| c)
    }
    /// The node `node` was reached from; [None] for the start and for undiscovered nodes.
    pub fn predecessor(&self, node: &N) -> Option<&N> {
        let &(parent, _) = self.parents.get(node)?;
        self.parents.get_index(parent).map(|(p, _)| p)
    }
    /// See [reconstruct_path].
    pub fn path_to(&self, goal: &N) -> Vec<N> {
        reconstruct_path(self, goal)
    }
}

/// Follows the predecessors from `goal` back to the start and returns the nodes in start to
/// goal order. Returns an empty path if the goal was never discovered.
pub fn reconstruct_path<N, C>(result: &SearchResult<N, C>, goal: &N) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let Some(goal_ix) = result.parents.get_index_of(goal) else {
        return Vec::new();
    };
    let mut path = std::iter::successors(Some(goal_ix), |&i| {
        result
            .parents
            .get_index(i)
            .map(|(_, &(parent, _))| parent)
            .filter(|&parent| parent != NO_PARENT)
    })
    .filter_map(|i| result.parents.get_index(i).map(|(node, _)| node.clone()))
    .collect::<Vec<N>>();
    path.reverse();
    path
}
