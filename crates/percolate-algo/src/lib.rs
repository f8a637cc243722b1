//! Layer-expansion algorithms for percolate.
//!
//! Expands a directed edge table outward from a seed set in discrete
//! layers, simulating hop-by-hop propagation where each edge fires with
//! some probability:
//!
//! - **Deterministic**: [`DeterministicExpander`] — the exact reachability
//!   frontier, one layer per round.
//! - **Probabilistic**: [`ProbabilisticExpander`] — each candidate edge
//!   activates against a uniform draw from a seeded generator, weighted by
//!   a per-edge propensity column.
//! - **Realisation**: [`realise`] — drives the probabilistic expander
//!   across rounds and stops on the count-based stability policy.

pub mod expand;
pub mod realisation;

pub use expand::{DeterministicExpander, LayerSample, ProbabilisticExpander, SampleConfig};
pub use realisation::{realise, Realisation, RealisationConfig, Termination};
