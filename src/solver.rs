//! Graph search over puzzle states.
//!
//! Breadth-first, depth-first and iterative-deepening search all run on one
//! engine. They differ only in two places:
//! - the [`Frontier`] discipline (FIFO queue or LIFO stack)
//! - the [`DuplicatePolicy`] deciding whether a generated child is new
//!
//! Duplicates are detected through each state's canonical grid, kept in an
//! `FxHashSet` / `FxHashMap` index instead of scanning every seen state.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::grid::Grid;
use crate::state::{SearchTree, Solution, StateId};

/// Optional ceilings that keep a search from running forever.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest state that may be generated.
    pub max_depth: Option<usize>,
    /// Maximum number of states to expand, summed over every pass.
    pub max_states: Option<usize>,
}

/// Why a search ended without a solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exhaustion {
    /// Every reachable configuration was explored.
    FrontierEmpty,
    /// States beyond `max_depth` were pruned.
    DepthCeiling,
    /// `max_states` expansions were spent.
    StateBudget,
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Exhaustion::FrontierEmpty => "search space exhausted",
            Exhaustion::DepthCeiling => "depth ceiling reached",
            Exhaustion::StateBudget => "state budget spent",
        })
    }
}

/// Terminal result of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    Exhausted(Exhaustion),
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::Exhausted(_) => None,
        }
    }
}

/// Diagnostic counters of one search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier, the solved one included.
    pub expanded: usize,
    /// Children created, duplicates included.
    pub generated: usize,
    pub elapsed: Duration,
}

/// Outcome and statistics of one strategy on one board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: Outcome,
    pub stats: SearchStats,
}

/// Order in which generated states are expanded.
pub trait Frontier {
    fn push(&mut self, id: StateId);
    fn pop(&mut self) -> Option<StateId>;
}

/// Breadth-first order.
impl Frontier for VecDeque<StateId> {
    fn push(&mut self, id: StateId) {
        self.push_back(id);
    }

    fn pop(&mut self) -> Option<StateId> {
        self.pop_front()
    }
}

/// Depth-first order.
impl Frontier for Vec<StateId> {
    fn push(&mut self, id: StateId) {
        Vec::push(self, id);
    }

    fn pop(&mut self) -> Option<StateId> {
        Vec::pop(self)
    }
}

/// Decides whether a configuration reached at some depth is worth keeping.
///
/// `admit` records the configuration when it returns `true`.
pub trait DuplicatePolicy {
    fn admit(&mut self, key: &Grid, depth: usize) -> bool;
}

/// Rejects any configuration seen before, whatever its depth.
#[derive(Default)]
pub struct SeenOnce {
    seen: FxHashSet<Grid>,
}

impl DuplicatePolicy for SeenOnce {
    fn admit(&mut self, key: &Grid, _depth: usize) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.clone());
        true
    }
}

/// Accepts a revisit only when it is strictly shallower than every earlier
/// visit of the same configuration.
#[derive(Default)]
pub struct ShallowerRevisit {
    shallowest: FxHashMap<Grid, usize>,
}

impl DuplicatePolicy for ShallowerRevisit {
    fn admit(&mut self, key: &Grid, depth: usize) -> bool {
        match self.shallowest.get_mut(key) {
            Some(best) if depth >= *best => false,
            Some(best) => {
                *best = depth;
                true
            }
            None => {
                self.shallowest.insert(key.clone(), depth);
                true
            }
        }
    }
}

/// How a single pass over the state graph ended.
enum PassEnd {
    Solved(StateId),
    /// The frontier emptied; `cutoff` tells whether the depth limit pruned anything.
    Drained { cutoff: bool },
    OutOfBudget,
}

/// Runs one search pass from the root of `tree`.
///
/// States at `depth_limit` are tested but not expanded. `budget` is the
/// number of expansions left and is decremented in place. Only children
/// admitted by `duplicates` are stored in `tree`.
fn run_pass<F, D>(
    tree: &mut SearchTree,
    mut frontier: F,
    duplicates: &mut D,
    depth_limit: Option<usize>,
    budget: &mut Option<usize>,
    stats: &mut SearchStats,
) -> PassEnd
where
    F: Frontier,
    D: DuplicatePolicy,
{
    let root = tree.root();
    duplicates.admit(tree.get(root).canonical(), 0);
    frontier.push(root);

    let mut cutoff = false;

    while let Some(id) = frontier.pop() {
        if let Some(left) = budget {
            if *left == 0 {
                return PassEnd::OutOfBudget;
            }
            *left -= 1;
        }
        stats.expanded += 1;

        let state = tree.get(id);
        if state.is_solved() {
            return PassEnd::Solved(id);
        }
        if depth_limit.is_some_and(|limit| state.depth() >= limit) {
            cutoff = true;
            continue;
        }

        for child in tree.successors(id) {
            stats.generated += 1;
            if duplicates.admit(child.canonical(), child.depth()) {
                frontier.push(tree.insert(id, child));
            }
        }
    }

    PassEnd::Drained { cutoff }
}

/// Searches with one frontier discipline and the strict duplicate rule.
fn single_pass<F: Frontier + Default>(root: &Grid, limits: &SearchLimits) -> SearchReport {
    let start = Instant::now();
    let mut stats = SearchStats::default();
    let mut budget = limits.max_states;
    let mut tree = SearchTree::new(root.clone());

    let end = run_pass(
        &mut tree,
        F::default(),
        &mut SeenOnce::default(),
        limits.max_depth,
        &mut budget,
        &mut stats,
    );

    let outcome = match end {
        PassEnd::Solved(id) => Outcome::Solved(tree.solution(id)),
        PassEnd::Drained { cutoff: true } => Outcome::Exhausted(Exhaustion::DepthCeiling),
        PassEnd::Drained { cutoff: false } => Outcome::Exhausted(Exhaustion::FrontierEmpty),
        PassEnd::OutOfBudget => Outcome::Exhausted(Exhaustion::StateBudget),
    };

    stats.elapsed = start.elapsed();
    SearchReport { outcome, stats }
}

/// Breadth-first search. The first solution found uses the fewest moves.
pub fn breadth_first(root: &Grid, limits: &SearchLimits) -> SearchReport {
    single_pass::<VecDeque<StateId>>(root, limits)
}

/// Depth-first search. Follows move generation order, without optimality.
pub fn depth_first(root: &Grid, limits: &SearchLimits) -> SearchReport {
    single_pass::<Vec<StateId>>(root, limits)
}

/// Iterative-deepening search.
///
/// Runs depth-limited passes with limits 0, 1, 2, ... and sums their
/// expansions. Stops without a solution when a pass drains without cutting
/// anything off, when the next limit would pass `max_depth`, or when the
/// state budget is spent.
pub fn iterative_deepening(root: &Grid, limits: &SearchLimits) -> SearchReport {
    let start = Instant::now();
    let mut stats = SearchStats::default();
    let mut budget = limits.max_states;
    let mut depth_limit = 0;

    let outcome = loop {
        if limits.max_depth.is_some_and(|max| depth_limit > max) {
            break Outcome::Exhausted(Exhaustion::DepthCeiling);
        }

        // every pass rebuilds its tree and duplicate index from scratch
        let before = stats.expanded;
        let mut tree = SearchTree::new(root.clone());
        let end = run_pass(
            &mut tree,
            Vec::<StateId>::new(),
            &mut ShallowerRevisit::default(),
            Some(depth_limit),
            &mut budget,
            &mut stats,
        );
        debug!(
            "depth limit {depth_limit}: expanded {} states",
            stats.expanded - before
        );

        match end {
            PassEnd::Solved(id) => break Outcome::Solved(tree.solution(id)),
            PassEnd::Drained { cutoff: true } => depth_limit += 1,
            PassEnd::Drained { cutoff: false } => {
                break Outcome::Exhausted(Exhaustion::FrontierEmpty)
            }
            PassEnd::OutOfBudget => break Outcome::Exhausted(Exhaustion::StateBudget),
        }
    };

    stats.elapsed = start.elapsed();
    SearchReport { outcome, stats }
}

/// Selectable search strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    IterativeDeepening,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::IterativeDeepening,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "breadth-first",
            Strategy::DepthFirst => "depth-first",
            Strategy::IterativeDeepening => "iterative-deepening",
        }
    }

    /// Runs this strategy on `root`.
    pub fn search(self, root: &Grid, limits: &SearchLimits) -> SearchReport {
        let report = match self {
            Strategy::BreadthFirst => breadth_first(root, limits),
            Strategy::DepthFirst => depth_first(root, limits),
            Strategy::IterativeDeepening => iterative_deepening(root, limits),
        };

        match &report.outcome {
            Outcome::Solved(solution) => info!(
                "{}: solved in {} moves, {} states expanded in {:?}",
                self.name(),
                solution.len(),
                report.stats.expanded,
                report.stats.elapsed
            ),
            Outcome::Exhausted(why) => info!(
                "{}: no solution ({why}), {} states expanded in {:?}",
                self.name(),
                report.stats.expanded,
                report.stats.elapsed
            ),
        }

        report
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brick::{apply_move, Direction, Move};
    use crate::grid::{Cell, MASTER};

    fn grid(rows: &[&[Cell]]) -> Grid {
        Grid::from_rows(rows.iter().map(|row| row.to_vec()).collect()).unwrap()
    }

    fn line() -> Grid {
        grid(&[&[2, 0, -1]])
    }

    /// A walled board where brick 3 has to step aside before the master can
    /// reach the goal on the right.
    fn blocked_board() -> Grid {
        grid(&[
            &[1, 1, 1, 1, 1, 1],
            &[1, 0, 0, 0, 0, 1],
            &[1, 2, 0, 3, 0, -1],
            &[1, 0, 0, 0, 0, 1],
            &[1, 1, 1, 1, 1, 1],
        ])
    }

    /// A walled 4x4 board with several interacting bricks.
    fn crowded_board() -> Grid {
        grid(&[
            &[1, 1, 1, 1, 1, 1],
            &[1, 3, 4, 4, 0, 1],
            &[1, 2, 2, 5, 0, 1],
            &[1, 6, 0, 5, 7, 1],
            &[1, 0, 8, 8, 0, -1],
            &[1, 1, 1, 1, 1, 1],
        ])
    }

    fn level(text: &str) -> Grid {
        crate::loader::parse(text).unwrap()
    }

    fn level0() -> Grid {
        level(include_str!("../levels/SBP-level0.txt"))
    }

    fn level1() -> Grid {
        level(include_str!("../levels/SBP-level1.txt"))
    }

    /// Counts the configurations a policy lets through.
    struct Counting<D> {
        inner: D,
        admitted: usize,
    }

    impl<D: DuplicatePolicy> DuplicatePolicy for Counting<D> {
        fn admit(&mut self, key: &Grid, depth: usize) -> bool {
            let admitted = self.inner.admit(key, depth);
            if admitted {
                self.admitted += 1;
            }
            admitted
        }
    }

    fn unsolvable() -> Grid {
        grid(&[&[2, 1, -1]])
    }

    fn solved(report: &SearchReport) -> &Solution {
        report
            .outcome
            .solution()
            .unwrap_or_else(|| panic!("expected a solution, got {:?}", report.outcome))
    }

    fn replay(root: &Grid, moves: &[Move]) -> Grid {
        moves
            .iter()
            .fold(root.clone(), |grid, &mv| apply_move(&grid, mv).unwrap())
    }

    #[test]
    fn test_breadth_first_line() {
        let report = breadth_first(&line(), &SearchLimits::default());
        let solution = solved(&report);
        let right = Move::new(MASTER, Direction::Right);
        assert_eq!(solution.moves, vec![right, right]);
        assert_eq!(solution.grid.cells(), &[0, 0, 2]);
        assert_eq!(report.stats.expanded, 3);
    }

    #[test]
    fn test_depth_first_line() {
        let report = depth_first(&line(), &SearchLimits::default());
        assert_eq!(solved(&report).len(), 2);
        assert_eq!(report.stats.expanded, 3);
    }

    #[test]
    fn test_iterative_deepening_line_sums_passes() {
        let report = iterative_deepening(&line(), &SearchLimits::default());
        assert_eq!(solved(&report).len(), 2);
        // passes with limit 0, 1 and 2 expand 1, 2 and 3 states
        assert_eq!(report.stats.expanded, 6);
    }

    #[test]
    fn test_already_solved_root() {
        let root = grid(&[&[0, 2, 0]]);
        for strategy in Strategy::ALL {
            let report = strategy.search(&root, &SearchLimits::default());
            assert!(solved(&report).is_empty(), "{strategy}");
            assert_eq!(report.stats.expanded, 1, "{strategy}");
        }
    }

    #[test]
    fn test_iterative_deepening_matches_breadth_first_length() {
        for board in [line(), blocked_board(), crowded_board()] {
            let bfs = breadth_first(&board, &SearchLimits::default());
            let ids = iterative_deepening(&board, &SearchLimits::default());
            assert_eq!(solved(&bfs).len(), solved(&ids).len(), "\n{board}");
        }
    }

    #[test]
    fn test_breadth_first_is_no_longer_than_depth_first() {
        for board in [blocked_board(), crowded_board()] {
            let bfs = breadth_first(&board, &SearchLimits::default());
            let dfs = depth_first(&board, &SearchLimits::default());
            assert!(solved(&bfs).len() <= solved(&dfs).len(), "\n{board}");
        }
    }

    #[test]
    fn test_solutions_replay_from_root() {
        for board in [line(), blocked_board(), crowded_board()] {
            for strategy in Strategy::ALL {
                let report = strategy.search(&board, &SearchLimits::default());
                let solution = solved(&report);
                let end = replay(&board, &solution.moves);
                assert_eq!(end, solution.grid, "{strategy}\n{board}");
                assert!(end.is_solved(), "{strategy}\n{board}");
            }
        }
    }

    #[test]
    fn test_blocked_board_needs_a_side_step() {
        let report = breadth_first(&blocked_board(), &SearchLimits::default());
        let solution = solved(&report);
        // brick 3 moves once, the master walks four cells to the goal
        assert_eq!(solution.len(), 5);
        assert!(solution.moves.iter().any(|mv| mv.brick == 3));
    }

    #[test]
    fn test_unsolvable_is_exhausted() {
        for strategy in Strategy::ALL {
            let report = strategy.search(&unsolvable(), &SearchLimits::default());
            assert_eq!(
                report.outcome,
                Outcome::Exhausted(Exhaustion::FrontierEmpty),
                "{strategy}"
            );
        }
    }

    #[test]
    fn test_iterative_deepening_stops_on_finite_unsolvable_space() {
        // the master shuttles between two cells, the goal is walled off
        let root = grid(&[&[2, 0, 1, -1]]);
        let report = iterative_deepening(&root, &SearchLimits::default());
        assert_eq!(report.outcome, Outcome::Exhausted(Exhaustion::FrontierEmpty));
    }

    #[test]
    fn test_depth_ceiling() {
        let limits = SearchLimits {
            max_depth: Some(1),
            max_states: None,
        };
        for strategy in Strategy::ALL {
            let report = strategy.search(&line(), &limits);
            assert_eq!(
                report.outcome,
                Outcome::Exhausted(Exhaustion::DepthCeiling),
                "{strategy}"
            );
        }
    }

    #[test]
    fn test_state_budget() {
        let limits = SearchLimits {
            max_depth: None,
            max_states: Some(2),
        };
        for strategy in Strategy::ALL {
            let report = strategy.search(&line(), &limits);
            assert_eq!(
                report.outcome,
                Outcome::Exhausted(Exhaustion::StateBudget),
                "{strategy}"
            );
            assert!(report.stats.expanded <= 2, "{strategy}");
        }
    }

    #[test]
    fn test_bundled_level_counts() {
        // (strategy, moves, expanded) for level 0 and level 1
        let cases = [
            (level0(), Strategy::BreadthFirst, 5, 74),
            (level0(), Strategy::DepthFirst, 47, 145),
            (level0(), Strategy::IterativeDeepening, 5, 229),
            (level1(), Strategy::BreadthFirst, 5, 107),
            (level1(), Strategy::DepthFirst, 619, 625),
            (level1(), Strategy::IterativeDeepening, 5, 206),
        ];
        for (board, strategy, moves, expanded) in cases {
            let report = strategy.search(&board, &SearchLimits::default());
            assert_eq!(solved(&report).len(), moves, "{strategy}\n{board}");
            assert_eq!(report.stats.expanded, expanded, "{strategy}\n{board}");
        }
    }

    #[test]
    fn test_pass_stores_only_admitted_states() {
        let mut stats = SearchStats::default();
        let mut tree = SearchTree::new(level1());
        let mut seen = SeenOnce::default();
        let end = run_pass(
            &mut tree,
            Vec::<StateId>::new(),
            &mut seen,
            None,
            &mut None,
            &mut stats,
        );

        assert!(matches!(end, PassEnd::Solved(_)));
        assert_eq!(tree.len(), seen.seen.len());
        // rejected duplicates were generated but never stored
        assert!(stats.generated > tree.len() - 1);
    }

    #[test]
    fn test_deepening_pass_stores_only_admitted_states() {
        for limit in [2, 4] {
            let mut stats = SearchStats::default();
            let mut tree = SearchTree::new(level1());
            let mut policy = Counting {
                inner: ShallowerRevisit::default(),
                admitted: 0,
            };
            run_pass(
                &mut tree,
                Vec::<StateId>::new(),
                &mut policy,
                Some(limit),
                &mut None,
                &mut stats,
            );
            assert_eq!(tree.len(), policy.admitted, "limit {limit}");
        }
    }

    #[test]
    fn test_seen_once_policy() {
        let mut policy = SeenOnce::default();
        let key = line();
        assert!(policy.admit(&key, 3));
        assert!(!policy.admit(&key, 1));
        assert!(!policy.admit(&key, 5));
    }

    #[test]
    fn test_shallower_revisit_policy() {
        let mut policy = ShallowerRevisit::default();
        let key = line();
        assert!(policy.admit(&key, 3));
        assert!(!policy.admit(&key, 3));
        assert!(!policy.admit(&key, 4));
        assert!(policy.admit(&key, 2));
        assert!(!policy.admit(&key, 2));
    }

    #[test]
    fn test_frontier_disciplines() {
        let mut queue: VecDeque<StateId> = VecDeque::new();
        let mut stack: Vec<StateId> = Vec::new();
        for id in 0..3 {
            Frontier::push(&mut queue, id);
            Frontier::push(&mut stack, id);
        }
        assert_eq!(Frontier::pop(&mut queue), Some(0));
        assert_eq!(Frontier::pop(&mut stack), Some(2));
    }
}
