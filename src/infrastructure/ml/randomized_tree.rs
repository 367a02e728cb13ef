//! Decision tree grown with randomized splits
//!
//! At every node one threshold per feature is drawn uniformly between the
//! node's minimum and maximum for that feature; the candidate with the lowest
//! weighted Gini impurity wins. Features that are constant at a node are
//! skipped. Growth stops at pure nodes, nodes below `min_samples_split`, or
//! `max_depth`.

use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Hyperparameters for the randomized tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomizedTreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for RandomizedTreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        class: u32,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Fitted randomized-split tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomizedTree {
    nodes: Vec<Node>,
    n_features: usize,
    n_classes: usize,
    depth: usize,
}

struct Builder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [u32],
    n_classes: usize,
    params: &'a RandomizedTreeParams,
    rng: StdRng,
    nodes: Vec<Node>,
    depth: usize,
}

fn class_counts(y: &[u32], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in indices {
        counts[y[i] as usize] += 1;
    }
    counts
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Most frequent class; ties go to the lowest class id
fn majority(counts: &[usize]) -> u32 {
    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best as u32
}

impl Builder<'_> {
    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn leaf(&mut self, counts: &[usize], samples: usize) -> usize {
        self.push(Node::Leaf {
            class: majority(counts),
            samples,
        })
    }

    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        self.depth = self.depth.max(depth);
        let counts = class_counts(self.y, &indices, self.n_classes);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);

        if pure || depth_reached || indices.len() < self.params.min_samples_split {
            return self.leaf(&counts, indices.len());
        }

        let Some((feature, threshold)) = self.random_split(&indices) else {
            return self.leaf(&counts, indices.len());
        };

        let x = self.x;
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[i][feature] <= threshold);

        let id = self.push(Node::Split {
            feature,
            threshold,
            left: 0,
            right: 0,
        });
        let left_id = self.grow(left, depth + 1);
        let right_id = self.grow(right, depth + 1);

        if let Node::Split { left, right, .. } = &mut self.nodes[id] {
            *left = left_id;
            *right = right_id;
        }

        id
    }

    fn random_split(&mut self, indices: &[usize]) -> Option<(usize, f64)> {
        let n_features = self.x[0].len();
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(&mut self.rng);

        let mut best: Option<(usize, f64, f64)> = None;

        for feature in features {
            let (min, max) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                let v = self.x[i][feature];
                (lo.min(v), hi.max(v))
            });

            if max <= min {
                continue;
            }

            let threshold = self.rng.gen_range(min..max);

            let mut left = vec![0usize; self.n_classes];
            let mut right = vec![0usize; self.n_classes];
            let (mut n_left, mut n_right) = (0usize, 0usize);

            for &i in indices {
                if self.x[i][feature] <= threshold {
                    left[self.y[i] as usize] += 1;
                    n_left += 1;
                } else {
                    right[self.y[i] as usize] += 1;
                    n_right += 1;
                }
            }

            let total = indices.len() as f64;
            let impurity = (n_left as f64 / total) * gini(&left, n_left)
                + (n_right as f64 / total) * gini(&right, n_right);

            if best.is_none_or(|(_, _, b)| impurity < b) {
                best = Some((feature, threshold, impurity));
            }
        }

        best.map(|(feature, threshold, _)| (feature, threshold))
    }
}

impl RandomizedTree {
    /// Grow a tree on encoded labels `y` in `0..n_classes`
    pub fn fit(
        x: &[Vec<f64>],
        y: &[u32],
        n_classes: usize,
        params: &RandomizedTreeParams,
    ) -> Result<Self, DomainError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(DomainError::model(format!(
                "Cannot fit tree on {} rows and {} labels",
                x.len(),
                y.len()
            )));
        }

        if y.iter().any(|&c| c as usize >= n_classes) {
            return Err(DomainError::model("Label id outside class range"));
        }

        let n_features = x[0].len();
        let mut builder = Builder {
            x,
            y,
            n_classes,
            params,
            rng: StdRng::seed_from_u64(params.seed),
            nodes: Vec::new(),
            depth: 0,
        };

        builder.grow((0..x.len()).collect(), 0);

        Ok(Self {
            nodes: builder.nodes,
            n_features,
            n_classes,
            depth: builder.depth,
        })
    }

    pub fn predict_one(&self, row: &[f64]) -> Result<u32, DomainError> {
        if row.len() != self.n_features {
            return Err(DomainError::model(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        let mut node = 0;
        loop {
            match &self.nodes[node] {
                Node::Leaf { class, .. } => return Ok(*class),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Render the decision rules as indented text
    pub fn export_rules(&self, feature_names: &[String], class_names: &[String]) -> String {
        let mut out = String::new();
        self.write_node(0, 0, feature_names, class_names, &mut out);
        out
    }

    fn write_node(
        &self,
        node: usize,
        depth: usize,
        feature_names: &[String],
        class_names: &[String],
        out: &mut String,
    ) {
        let indent = "|   ".repeat(depth);

        match &self.nodes[node] {
            Node::Leaf { class, samples } => {
                let name = class_names
                    .get(*class as usize)
                    .map(String::as_str)
                    .unwrap_or("?");
                let _ = writeln!(out, "{indent}|--- class: {name} (samples: {samples})");
            }
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let name = feature_names
                    .get(*feature)
                    .map(String::as_str)
                    .unwrap_or("?");
                let _ = writeln!(out, "{indent}|--- {name} <= {threshold:.2}");
                self.write_node(*left, depth + 1, feature_names, class_names, out);
                let _ = writeln!(out, "{indent}|--- {name} >  {threshold:.2}");
                self.write_node(*right, depth + 1, feature_names, class_names, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f64>>, Vec<u32>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            x.push(vec![i as f64, 1.0]);
            y.push(if i < 10 { 0 } else { 1 });
        }
        (x, y)
    }

    #[test]
    fn test_fits_training_data() {
        let (x, y) = separable();
        let tree = RandomizedTree::fit(&x, &y, 2, &RandomizedTreeParams::default()).unwrap();

        assert_eq!(tree.predict(&x).unwrap(), y);
        assert!(tree.n_leaves() >= 2);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let (x, y) = separable();
        let params = RandomizedTreeParams::default();

        let a = RandomizedTree::fit(&x, &y, 2, &params).unwrap();
        let b = RandomizedTree::fit(&x, &y, 2, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_depth_zero_is_single_leaf() {
        let (x, y) = separable();
        let params = RandomizedTreeParams {
            max_depth: Some(0),
            ..Default::default()
        };
        let tree = RandomizedTree::fit(&x, &y, 2, &params).unwrap();

        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_constant_features_yield_leaf() {
        let x = vec![vec![1.0, 1.0]; 4];
        let y = vec![0, 1, 1, 1];
        let tree = RandomizedTree::fit(&x, &y, 2, &RandomizedTreeParams::default()).unwrap();

        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.predict_one(&[1.0, 1.0]).unwrap(), 1);
    }

    #[test]
    fn test_wrong_width_rejected() {
        let (x, y) = separable();
        let tree = RandomizedTree::fit(&x, &y, 2, &RandomizedTreeParams::default()).unwrap();
        assert!(tree.predict_one(&[1.0]).is_err());
    }

    #[test]
    fn test_export_rules() {
        let (x, y) = separable();
        let tree = RandomizedTree::fit(&x, &y, 2, &RandomizedTreeParams::default()).unwrap();
        let rules = tree.export_rules(
            &["N".to_string(), "P".to_string()],
            &["maize".to_string(), "rice".to_string()],
        );

        assert!(rules.starts_with("|--- N <="));
        assert!(rules.contains("class: maize"));
        assert!(rules.contains("class: rice"));
    }
}
