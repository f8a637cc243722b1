use std::collections::HashSet;
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use percolate_graph::{Direction, EdgeTable, TableError};

// ─────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────

/// Configuration for probabilistic layer sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Which way expansion follows the edge columns.
    pub direction: Direction,
    /// Name of the weight column holding per-edge activation propensities.
    pub weight_column: String,
    /// Rescaling divisor in (0, 1]: an edge activates iff
    /// `weight / correction` exceeds its uniform draw, so any weight
    /// ≥ correction activates with certainty.
    pub correction: f64,
    /// Seed for the expander-owned random generator.
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Pre,
            weight_column: "weight".into(),
            correction: 0.3,
            seed: 0,
        }
    }
}

// ─────────────────────────────────────────────
// Deterministic expansion
// ─────────────────────────────────────────────

/// Exact reachability frontier, one layer per round.
///
/// Owns its visited set, seeded from the caller's start ids at
/// construction. Never terminates on its own: once the frontier is
/// exhausted every further layer is empty, so stop pulling at the first
/// empty layer or bound the iterator externally (`.take(n)`).
pub struct DeterministicExpander<'a, N> {
    table: &'a EdgeTable<N>,
    direction: Direction,
    visited: HashSet<N>,
}

impl<'a, N: Clone + Eq + Hash> DeterministicExpander<'a, N> {
    pub fn new<I>(table: &'a EdgeTable<N>, start_ids: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = N>,
    {
        Self {
            table,
            direction,
            visited: start_ids.into_iter().collect(),
        }
    }

    /// All node identifiers that have entered any layer so far.
    pub fn visited(&self) -> &HashSet<N> {
        &self.visited
    }

    /// Nodes first reached this round.
    pub fn next_layer(&mut self) -> HashSet<N> {
        let frontier = self.table.frontier_targets(self.direction, &self.visited);
        let new_nodes: HashSet<N> = frontier.difference(&self.visited).cloned().collect();
        self.visited.extend(new_nodes.iter().cloned());
        new_nodes
    }
}

impl<N: Clone + Eq + Hash> Iterator for DeterministicExpander<'_, N> {
    type Item = HashSet<N>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_layer())
    }
}

// ─────────────────────────────────────────────
// Probabilistic expansion
// ─────────────────────────────────────────────

/// One probabilistic expansion round.
#[derive(Debug, Clone)]
pub struct LayerSample<N> {
    /// Nodes first reached this round. May be empty on unlucky draws even
    /// while candidate edges remain.
    pub new_nodes: HashSet<N>,
    /// Candidate edges eligible for activation this round, counted before
    /// sampling. Zero means the frontier has no unexplored edges left.
    pub candidate_count: usize,
}

/// Randomly sampled frontier, one layer per [`step`](Self::step) call.
///
/// Owns its visited set and its generator, both fixed at construction;
/// generator state advances across calls, so results depend on call order
/// and on the table's row order staying stable.
pub struct ProbabilisticExpander<'a, N> {
    table: &'a EdgeTable<N>,
    config: SampleConfig,
    visited: HashSet<N>,
    rng: StdRng,
}

impl<'a, N: Clone + Eq + Hash> ProbabilisticExpander<'a, N> {
    pub fn new<I>(table: &'a EdgeTable<N>, start_ids: I, config: SampleConfig) -> Self
    where
        I: IntoIterator<Item = N>,
    {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            table,
            config,
            visited: start_ids.into_iter().collect(),
            rng,
        }
    }

    /// All node identifiers that have entered any layer so far.
    pub fn visited(&self) -> &HashSet<N> {
        &self.visited
    }

    /// Sample one layer.
    ///
    /// Draws one uniform value in [0, 1) per candidate edge, in row order;
    /// an edge activates iff `weight / correction > draw`. Weight values
    /// are read as-is; nothing clamps them into [0, correction], so
    /// malformed weight data propagates silently.
    ///
    /// Fails when the configured weight column does not exist.
    pub fn step(&mut self) -> Result<LayerSample<N>, TableError> {
        let candidates = self
            .table
            .candidate_rows(self.config.direction, &self.visited);
        let weights = self.table.weight_column(&self.config.weight_column)?;
        let (_, to) = self.table.endpoints(self.config.direction);

        // Candidate targets are not yet visited, so activated targets are
        // new by construction; the set dedups parallel edges.
        let mut new_nodes = HashSet::new();
        for &row in &candidates {
            let draw: f64 = self.rng.gen();
            if weights[row] / self.config.correction > draw {
                new_nodes.insert(to[row].clone());
            }
        }

        self.visited.extend(new_nodes.iter().cloned());
        Ok(LayerSample {
            new_nodes,
            candidate_count: candidates.len(),
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
