use rand::{Rng, SeedableRng, rngs::StdRng};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Centroid-clustering options. The seed makes every run reproducible.
pub struct KMeansConfig {
    /// Seed for k-means++ initialization.
    pub seed: u64,
    /// Independent initializations; the lowest-inertia run wins.
    pub n_init: usize,
    /// Lloyd iterations per run.
    pub max_iter: usize,
    /// Convergence threshold on squared centroid shift, relative to the data variance.
    pub tol: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Result of clustering scalar values.
pub struct Clustering {
    /// Cluster label per input value. Labels are ordered by ascending centroid.
    pub labels: Vec<usize>,
    /// Centroid per label, ascending.
    pub centroids: Vec<f64>,
    /// Sum of squared distances to the assigned centroids.
    pub inertia: f64,
}

/// Partition scalar values into `k` clusters (clamped to `[1, values.len()]`).
pub fn kmeans_1d(values: &[f64], k: usize, cfg: &KMeansConfig) -> Clustering {
    if values.is_empty() {
        return Clustering::default();
    }
    let k = k.clamp(1, values.len());
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let shift_tol = cfg.tol * variance(values);

    let mut best: Option<Clustering> = None;
    for _ in 0..cfg.n_init.max(1) {
        let init = init_plus_plus(values, k, &mut rng);
        let run = lloyd(values, init, cfg.max_iter.max(1), shift_tol);
        if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }
    let best = best.unwrap_or_default();
    tracing::trace!(k, inertia = best.inertia, "kmeans finished");
    sorted_by_centroid(best)
}

fn init_plus_plus(values: &[f64], k: usize, rng: &mut StdRng) -> Vec<f64> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(values[rng.random_range(0..values.len())]);

    while centroids.len() < k {
        let dists: Vec<f64> = values
            .iter()
            .map(|&v| nearest(&centroids, v).1)
            .collect();
        let total: f64 = dists.iter().sum();
        if total <= 0.0 {
            centroids.push(values[rng.random_range(0..values.len())]);
            continue;
        }
        let threshold = rng.random::<f64>() * total;
        let mut acc = 0.0;
        let mut pick = values.len() - 1;
        for (i, d) in dists.iter().enumerate() {
            acc += d;
            if acc >= threshold && *d > 0.0 {
                pick = i;
                break;
            }
        }
        centroids.push(values[pick]);
    }
    centroids
}

fn lloyd(values: &[f64], mut centroids: Vec<f64>, max_iter: usize, shift_tol: f64) -> Clustering {
    let k = centroids.len();
    let mut labels = vec![0usize; values.len()];

    for _ in 0..max_iter {
        for (label, &v) in labels.iter_mut().zip(values) {
            *label = nearest(&centroids, v).0;
        }

        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];
        for (&label, &v) in labels.iter().zip(values) {
            sums[label] += v;
            counts[label] += 1;
        }

        let mut max_shift = 0.0f64;
        for c in 0..k {
            let next = if counts[c] > 0 {
                sums[c] / counts[c] as f64
            } else {
                // Empty cluster: move it onto the worst-fitting value.
                farthest_value(values, &labels, &centroids)
            };
            max_shift = max_shift.max((next - centroids[c]).powi(2));
            centroids[c] = next;
        }
        if max_shift <= shift_tol {
            break;
        }
    }

    for (label, &v) in labels.iter_mut().zip(values) {
        *label = nearest(&centroids, v).0;
    }
    let inertia = labels
        .iter()
        .zip(values)
        .map(|(&l, &v)| (v - centroids[l]).powi(2))
        .sum();
    Clustering {
        labels,
        centroids,
        inertia,
    }
}

/// Index of the nearest centroid (lowest index on ties) and the squared distance to it.
fn nearest(centroids: &[f64], v: f64) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, &c) in centroids.iter().enumerate() {
        let d = (v - c).powi(2);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn farthest_value(values: &[f64], labels: &[usize], centroids: &[f64]) -> f64 {
    values
        .iter()
        .zip(labels)
        .max_by(|(a, la), (b, lb)| {
            let da = (*a - centroids[**la]).powi(2);
            let db = (*b - centroids[**lb]).powi(2);
            da.total_cmp(&db)
        })
        .map(|(v, _)| *v)
        .unwrap_or(0.0)
}

fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn sorted_by_centroid(c: Clustering) -> Clustering {
    let mut order: Vec<usize> = (0..c.centroids.len()).collect();
    order.sort_by(|&a, &b| c.centroids[a].total_cmp(&c.centroids[b]).then(a.cmp(&b)));
    let mut relabel = vec![0usize; order.len()];
    for (new, &old) in order.iter().enumerate() {
        relabel[old] = new;
    }
    Clustering {
        labels: c.labels.iter().map(|&l| relabel[l]).collect(),
        centroids: order.iter().map(|&i| c.centroids[i]).collect(),
        inertia: c.inertia,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/alignment/kmeans.rs"]
mod tests;
