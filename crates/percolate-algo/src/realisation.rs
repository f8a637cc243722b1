use std::collections::HashSet;
use std::hash::Hash;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use percolate_graph::{EdgeTable, TableError};

use crate::expand::{ProbabilisticExpander, SampleConfig};

// ─────────────────────────────────────────────
// Config / result types
// ─────────────────────────────────────────────

/// Configuration for a full layer realisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealisationConfig {
    /// Sampling parameters handed to the probabilistic expander.
    pub sample: SampleConfig,
    /// Consecutive rounds with an unchanged candidate-edge count required
    /// to stop. The comparison is count-based, not content-based:
    /// coincidentally repeating counts over different candidate edges also
    /// read as stable.
    pub stability_window: usize,
}

impl Default for RealisationConfig {
    fn default() -> Self {
        Self {
            sample: SampleConfig::default(),
            stability_window: 2,
        }
    }
}

/// Why a realisation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A round had zero candidate edges: nothing left to explore.
    Exhausted,
    /// The candidate-edge count held steady for the full stability window.
    Stable,
}

/// Full layer history of one probabilistic run.
#[derive(Debug, Clone)]
pub struct Realisation<N> {
    /// Layer index → nodes first visited at that layer. Layer 0 is exactly
    /// the start set; later layers may be empty.
    pub layers: Vec<HashSet<N>>,
    pub termination: Termination,
    pub duration_ms: u64,
}

impl<N: Clone + Eq + Hash> Realisation<N> {
    /// Expansion rounds performed (layers beyond layer 0).
    pub fn rounds(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    /// Union of all layers: the final visited set.
    pub fn visited(&self) -> HashSet<N> {
        self.layers.iter().flatten().cloned().collect()
    }
}

// ─────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────

/// Run the probabilistic expander round by round until the termination
/// policy fires, recording every layer (empty ones included).
///
/// Terminates immediately when a round has zero candidate edges, or once
/// the candidate-edge count is unchanged for `stability_window` consecutive
/// rounds. An empty start set therefore terminates after one round.
///
/// Identical seed, table and parameters reproduce the layer map exactly,
/// provided the caller keeps the table's row order stable: draws are
/// assigned to candidate edges in row order.
pub fn realise<N, I>(
    table: &EdgeTable<N>,
    start_ids: I,
    config: &RealisationConfig,
) -> Result<Realisation<N>, TableError>
where
    N: Clone + Eq + Hash,
    I: IntoIterator<Item = N>,
{
    let started = Instant::now();

    let start_set: HashSet<N> = start_ids.into_iter().collect();
    let mut expander =
        ProbabilisticExpander::new(table, start_set.iter().cloned(), config.sample.clone());

    let mut layers = vec![start_set];
    let mut stable_rounds = 0usize;
    let mut prev_candidates = 0usize;

    let termination = loop {
        let sample = expander.step()?;
        debug!(
            round = layers.len(),
            candidates = sample.candidate_count,
            new_nodes = sample.new_nodes.len(),
            "expansion round"
        );
        layers.push(sample.new_nodes);

        stable_rounds += 1;
        if sample.candidate_count != prev_candidates {
            stable_rounds = 0;
        }
        if sample.candidate_count == 0 {
            break Termination::Exhausted;
        }
        if stable_rounds == config.stability_window {
            break Termination::Stable;
        }
        prev_candidates = sample.candidate_count;
    };

    debug!(
        rounds = layers.len() - 1,
        ?termination,
        "realisation finished"
    );

    Ok(Realisation {
        layers,
        termination,
        duration_ms: started.elapsed().as_millis() as u64,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use percolate_graph::Direction;

    fn certain(window: usize) -> RealisationConfig {
        RealisationConfig {
            sample: SampleConfig {
                correction: 1.0,
                ..Default::default()
            },
            stability_window: window,
        }
    }

    #[test]
    fn layer_zero_is_the_start_set() {
        let t = EdgeTable::from_pairs([("a", "b")])
            .with_weight_column("weight", vec![1.0])
            .unwrap();
        let r = realise(&t, ["a"], &certain(2)).unwrap();
        assert_eq!(r.layers[0], ["a"].into_iter().collect());
    }

    #[test]
    fn empty_start_terminates_after_one_round() {
        let t = EdgeTable::from_pairs([("a", "b")])
            .with_weight_column("weight", vec![1.0])
            .unwrap();
        let r = realise(&t, [], &certain(2)).unwrap();
        assert_eq!(r.rounds(), 1);
        assert_eq!(r.termination, Termination::Exhausted);
        assert!(r.layers.iter().all(HashSet::is_empty));
    }

    #[test]
    fn stops_at_the_first_zero_candidate_round() {
        // a→b fires in round 1; round 2 is the first zero-candidate round
        // and the run records it and stops exactly there.
        let t = EdgeTable::from_pairs([("a", "b")])
            .with_weight_column("weight", vec![1.0])
            .unwrap();
        let r = realise(&t, ["a"], &certain(1)).unwrap();
        assert_eq!(r.rounds(), 2);
        assert_eq!(r.termination, Termination::Exhausted);
        assert_eq!(r.layers[1], ["b"].into_iter().collect());
        assert!(r.layers[2].is_empty());
    }

    #[test]
    fn stable_candidate_count_stops_after_window() {
        // Two zero-weight edges: every round sees the same two candidates
        // and activates nothing, so the count never changes.
        let t = EdgeTable::from_pairs([("a", "b"), ("a", "c")])
            .with_weight_column("weight", vec![0.0, 0.0])
            .unwrap();

        let r = realise(&t, ["a"], &certain(2)).unwrap();
        // round 1 resets the counter (2 ≠ initial 0), rounds 2 and 3 match
        assert_eq!(r.rounds(), 3);
        assert_eq!(r.termination, Termination::Stable);

        let r = realise(&t, ["a"], &certain(1)).unwrap();
        assert_eq!(r.rounds(), 2);
        assert_eq!(r.termination, Termination::Stable);
    }

    #[test]
    fn post_direction_realises_reverse_reachability() {
        let t = EdgeTable::from_pairs([("a", "b"), ("b", "c")])
            .with_weight_column("weight", vec![1.0, 1.0])
            .unwrap();
        let cfg = RealisationConfig {
            sample: SampleConfig {
                direction: Direction::Post,
                correction: 1.0,
                ..Default::default()
            },
            stability_window: 2,
        };
        let r = realise(&t, ["c"], &cfg).unwrap();
        assert_eq!(r.layers[1], ["b"].into_iter().collect());
        assert_eq!(r.layers[2], ["a"].into_iter().collect());
    }

    #[test]
    fn missing_weight_column_surfaces_from_first_round() {
        let t = EdgeTable::from_pairs([("a", "b")]);
        let err = realise(&t, ["a"], &RealisationConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::WeightColumnNotFound(_)));
    }

    #[test]
    fn rounds_and_visited_accessors() {
        let t = EdgeTable::from_pairs([("a", "b"), ("b", "c")])
            .with_weight_column("weight", vec![1.0, 1.0])
            .unwrap();
        let r = realise(&t, ["a"], &certain(2)).unwrap();
        assert_eq!(r.rounds(), r.layers.len() - 1);
        assert_eq!(r.visited(), ["a", "b", "c"].into_iter().collect());
    }
}
