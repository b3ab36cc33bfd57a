//! CART decision trees, the building block of both forests.
//!
//! Trees are stored as a flat node arena and grown with an explicit work stack,
//! so unbounded depth on long monotone series cannot overflow the call stack.

use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Split quality measure; also decides what a leaf predicts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Criterion {
    /// Gini impurity over class codes `0..n_classes`; leaves predict the majority class.
    Gini { n_classes: usize },
    /// Sum of squared deviations; leaves predict the mean target.
    SquaredError,
}

#[derive(Debug, Clone, PartialEq)]
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

#[derive(Debug, Clone, Copy, PartialEq)]
struct Split {
    feature: usize,
    threshold: f64,
}

/// A fitted tree. Rows with `row[feature] <= threshold` go left.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    pub(crate) fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub(crate) fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }
}

/// Grows trees with fixed settings.
#[derive(Debug, Clone)]
pub(crate) struct TreeGrower {
    pub criterion: Criterion,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub n_features: usize,
    /// Features drawn per split before the search may stop.
    pub n_try: usize,
}

// A node waiting to be resolved into a leaf or a split.
struct Pending {
    slot: usize,
    depth: usize,
    samples: Vec<usize>,
}

impl TreeGrower {
    /// Grows a tree on the rows of `x`/`y` selected by `samples` (a bootstrap
    /// draw, so indices may repeat). `samples` must not be empty.
    pub(crate) fn grow<X: AsRef<[f64]>>(
        &self,
        x: &[X],
        y: &[f64],
        samples: Vec<usize>,
        rng: &mut StdRng,
    ) -> DecisionTree {
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut stack = vec![Pending {
            slot: 0,
            depth: 0,
            samples,
        }];

        while let Some(task) = stack.pop() {
            let splittable = task.samples.len() >= self.min_samples_split.max(2)
                && self.max_depth.map_or(true, |max| task.depth < max)
                && !is_pure(y, &task.samples);
            let split = if splittable {
                self.best_split(x, y, &task.samples, rng)
            } else {
                None
            };

            let Some(split) = split else {
                nodes[task.slot] = Node::Leaf {
                    value: self.leaf_value(y, &task.samples),
                };
                continue;
            };

            let (left, right): (Vec<usize>, Vec<usize>) = task
                .samples
                .iter()
                .partition(|&&i| x[i].as_ref()[split.feature] <= split.threshold);

            let left_slot = nodes.len();
            let right_slot = left_slot + 1;
            nodes.push(Node::Leaf { value: 0.0 });
            nodes.push(Node::Leaf { value: 0.0 });
            nodes[task.slot] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: left_slot,
                right: right_slot,
            };
            stack.push(Pending {
                slot: right_slot,
                depth: task.depth + 1,
                samples: right,
            });
            stack.push(Pending {
                slot: left_slot,
                depth: task.depth + 1,
                samples: left,
            });
        }

        DecisionTree { nodes }
    }

    fn leaf_value(&self, y: &[f64], samples: &[usize]) -> f64 {
        match self.criterion {
            Criterion::Gini { n_classes } => majority(&class_counts(y, samples, n_classes)) as f64,
            Criterion::SquaredError => {
                samples.iter().map(|&i| y[i]).sum::<f64>() / samples.len() as f64
            }
        }
    }

    /// Visits features in random order. At least `n_try` are examined, and the
    /// search keeps going past that until some feature yields a valid split.
    fn best_split<X: AsRef<[f64]>>(
        &self,
        x: &[X],
        y: &[f64],
        samples: &[usize],
        rng: &mut StdRng,
    ) -> Option<Split> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(rng);

        let mut best: Option<(f64, Split)> = None;
        for (visited, &feature) in features.iter().enumerate() {
            if visited >= self.n_try && best.is_some() {
                break;
            }
            if let Some((score, threshold)) = self.scan_feature(x, y, samples, feature) {
                if best.as_ref().map_or(true, |(best_score, _)| score < *best_score) {
                    best = Some((score, Split { feature, threshold }));
                }
            }
        }
        best.map(|(_, split)| split)
    }

    /// Best `(weighted child impurity, threshold)` along one feature, or `None`
    /// if the feature is constant over `samples`.
    fn scan_feature<X: AsRef<[f64]>>(
        &self,
        x: &[X],
        y: &[f64],
        samples: &[usize],
        feature: usize,
    ) -> Option<(f64, f64)> {
        let value = |i: usize| x[i].as_ref()[feature];
        let mut order = samples.to_vec();
        order.sort_by_key(|&i| OrderedFloat(value(i)));

        let n = order.len();
        let mut best: Option<(f64, f64)> = None;
        let mut consider = |score: f64, lo: f64, hi: f64| {
            if best.map_or(true, |(best_score, _)| score < best_score) {
                best = Some((score, midpoint(lo, hi)));
            }
        };

        match self.criterion {
            Criterion::Gini { n_classes } => {
                let mut left = vec![0usize; n_classes];
                let mut right = class_counts(y, &order, n_classes);
                for pos in 0..n - 1 {
                    let class = y[order[pos]] as usize;
                    left[class] += 1;
                    right[class] -= 1;

                    let (lo, hi) = (value(order[pos]), value(order[pos + 1]));
                    if lo == hi {
                        continue;
                    }
                    let n_left = pos + 1;
                    let score = weighted_gini(&left, n_left) + weighted_gini(&right, n - n_left);
                    consider(score, lo, hi);
                }
            }
            Criterion::SquaredError => {
                let total_sum: f64 = order.iter().map(|&i| y[i]).sum();
                let total_sq: f64 = order.iter().map(|&i| y[i] * y[i]).sum();
                let (mut left_sum, mut left_sq) = (0.0, 0.0);
                for pos in 0..n - 1 {
                    let target = y[order[pos]];
                    left_sum += target;
                    left_sq += target * target;

                    let (lo, hi) = (value(order[pos]), value(order[pos + 1]));
                    if lo == hi {
                        continue;
                    }
                    let n_left = (pos + 1) as f64;
                    let n_right = (n - pos - 1) as f64;
                    let right_sum = total_sum - left_sum;
                    let right_sq = total_sq - left_sq;
                    let score = (left_sq - left_sum * left_sum / n_left)
                        + (right_sq - right_sum * right_sum / n_right);
                    consider(score, lo, hi);
                }
            }
        }
        best
    }
}

fn is_pure(y: &[f64], samples: &[usize]) -> bool {
    match samples.first() {
        Some(&first) => samples.iter().all(|&i| y[i] == y[first]),
        None => true,
    }
}

fn class_counts(y: &[f64], samples: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in samples {
        counts[y[i] as usize] += 1;
    }
    counts
}

/// Index of the largest count; the lowest index wins ties.
pub(crate) fn majority(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .fold((0, 0), |best, (class, &count)| {
            if count > best.1 {
                (class, count)
            } else {
                best
            }
        })
        .0
}

// n * gini(counts) = n - sum(c^2) / n
fn weighted_gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let sum_sq: f64 = counts.iter().map(|&c| (c * c) as f64).sum();
    n - sum_sq / n
}

fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    // rounding can land the midpoint on `hi`, which would send `hi` left
    if mid >= hi {
        lo
    } else {
        mid
    }
}
