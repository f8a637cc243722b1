use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

// ─────────────────────────────────────────────
// Direction
// ─────────────────────────────────────────────

/// Which way expansion follows the two identifier columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Edges flow `from → to`; expansion follows the `to` column.
    Pre,
    /// The two columns are swapped before expansion: expansion follows
    /// the original `from` column in reverse.
    Post,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Pre
    }
}

// ─────────────────────────────────────────────
// EdgeTable
// ─────────────────────────────────────────────

/// Read-only, row-ordered view of a directed edge set.
///
/// Rows keep their construction order and duplicates are preserved:
/// parallel edges are independent activation trials, and the row index is
/// what ties a random draw back to its edge. Weight columns are stored by
/// name, one `f64` per row; weight *values* are never validated, only the
/// column shape is checked at attach time.
///
/// Node identifiers are any `Clone + Eq + Hash` type (integers, strings,
/// UUIDs, …).
#[derive(Debug, Clone)]
pub struct EdgeTable<N> {
    from: Vec<N>,
    to: Vec<N>,
    weights: HashMap<String, Vec<f64>>,
}

impl<N: Clone + Eq + Hash> EdgeTable<N> {
    /// Build a table from an ordered sequence of `(from, to)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut from = Vec::new();
        let mut to = Vec::new();
        for (f, t) in pairs {
            from.push(f);
            to.push(t);
        }
        Self { from, to, weights: HashMap::new() }
    }

    /// Attach a named weight column holding exactly one value per row.
    pub fn with_weight_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        if values.len() != self.from.len() {
            return Err(TableError::ColumnLengthMismatch {
                column: name,
                expected: self.from.len(),
                got: values.len(),
            });
        }
        self.weights.insert(name, values);
        Ok(self)
    }

    // ── Queries ────────────────────────────────────────

    /// Number of edge rows (duplicates counted).
    pub fn len(&self) -> usize {
        self.from.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_empty()
    }

    /// The logical (from, to) columns under `direction`.
    pub fn endpoints(&self, direction: Direction) -> (&[N], &[N]) {
        match direction {
            Direction::Pre => (&self.from, &self.to),
            Direction::Post => (&self.to, &self.from),
        }
    }

    /// Weight column by name.
    pub fn weight_column(&self, name: &str) -> Result<&[f64], TableError> {
        self.weights
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| TableError::WeightColumnNotFound(name.to_string()))
    }

    /// Names of the attached weight columns.
    pub fn weight_columns(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(|s| s.as_str())
    }

    /// Ordered row indices of candidate edges: "from" endpoint already
    /// visited, "to" endpoint not yet. Preserves original row order and
    /// duplicates.
    pub fn candidate_rows(&self, direction: Direction, visited: &HashSet<N>) -> Vec<usize> {
        let (from, to) = self.endpoints(direction);
        (0..self.len())
            .filter(|&i| visited.contains(&from[i]) && !visited.contains(&to[i]))
            .collect()
    }

    /// All "to" endpoints of rows whose "from" endpoint is visited.
    /// Already-visited targets are included; callers subtract `visited`.
    pub fn frontier_targets(&self, direction: Direction, visited: &HashSet<N>) -> HashSet<N> {
        let (from, to) = self.endpoints(direction);
        (0..self.len())
            .filter(|&i| visited.contains(&from[i]))
            .map(|i| to[i].clone())
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
