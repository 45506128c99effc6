//! Second-order regression trees
//!
//! Trees are grown greedily on per-row gradients `g` and hessians `h`. For a
//! node holding rows with sums `G` and `H`, the optimal leaf weight is
//!
//! w* = -G / (H + λ)
//!
//! and splitting it into left and right children gains
//!
//! gain = ½ [ G_L² / (H_L + λ) + G_R² / (H_R + λ) - G² / (H + λ) ]
//!
//! Every distinct feature value is a candidate threshold (exact greedy). Rows
//! whose feature is `NaN` always follow the right branch.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Growth parameters for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth, root at depth 0
    pub max_depth: usize,
    /// L2 regularisation on leaf weights (λ)
    pub lambda: f64,
    /// Minimum hessian sum in each child
    pub min_child_weight: f64,
    /// Multiplier applied to every leaf weight
    pub shrinkage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// A fitted regression tree stored as a flat node arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grow a tree on `x` from gradients and hessians.
    pub fn grow(
        x: &Array2<f64>,
        gradients: &[f64],
        hessians: &[f64],
        params: &TreeParams,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let rows: Vec<usize> = (0..x.nrows()).collect();
        tree.grow_node(x, gradients, hessians, params, rows, 0);
        tree
    }

    /// Number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + walk(nodes, left).max(walk(nodes, right))
                }
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Predict a single row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = row[*feature];
                    idx = if v < *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }

    fn grow_node(
        &mut self,
        x: &Array2<f64>,
        gradients: &[f64],
        hessians: &[f64],
        params: &TreeParams,
        rows: Vec<usize>,
        depth: usize,
    ) -> usize {
        let g: f64 = rows.iter().map(|&i| gradients[i]).sum();
        let h: f64 = rows.iter().map(|&i| hessians[i]).sum();

        let idx = self.nodes.len();
        let leaf = Node::Leaf {
            value: -g / (h + params.lambda) * params.shrinkage,
        };
        self.nodes.push(leaf);

        if depth >= params.max_depth || rows.len() < 2 {
            return idx;
        }

        let Some(best) = best_split(x, gradients, hessians, params, &rows, g, h) else {
            return idx;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&i| x[[i, best.feature]] < best.threshold);

        let left = self.grow_node(x, gradients, hessians, params, left_rows, depth + 1);
        let right = self.grow_node(x, gradients, hessians, params, right_rows, depth + 1);

        self.nodes[idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        idx
    }
}

fn score(g: f64, h: f64, lambda: f64) -> f64 {
    g * g / (h + lambda)
}

/// Exact greedy search over every feature and distinct value.
fn best_split(
    x: &Array2<f64>,
    gradients: &[f64],
    hessians: &[f64],
    params: &TreeParams,
    rows: &[usize],
    g_total: f64,
    h_total: f64,
) -> Option<Candidate> {
    let parent = score(g_total, h_total, params.lambda);
    let mut best: Option<Candidate> = None;
    let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(rows.len());

    for feature in 0..x.ncols() {
        sorted.clear();
        sorted.extend(
            rows.iter()
                .map(|&i| (x[[i, feature]], i))
                .filter(|(v, _)| !v.is_nan()),
        );
        if sorted.len() < 2 {
            continue;
        }
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut g_left = 0.0;
        let mut h_left = 0.0;
        for k in 0..sorted.len() - 1 {
            let (value, i) = sorted[k];
            g_left += gradients[i];
            h_left += hessians[i];

            let next = sorted[k + 1].0;
            if next <= value {
                continue;
            }

            let g_right = g_total - g_left;
            let h_right = h_total - h_left;
            if h_left < params.min_child_weight || h_right < params.min_child_weight {
                continue;
            }

            let left_score = score(g_left, h_left, params.lambda);
            let right_score = score(g_right, h_right, params.lambda);
            let gain = 0.5 * (left_score + right_score - parent);
            if gain > best.map_or(0.0, |b| b.gain) {
                best = Some(Candidate {
                    feature,
                    threshold: value + (next - value) / 2.0,
                    gain,
                });
            }
        }
    }

    best
}
