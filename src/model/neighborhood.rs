/// One entry of a contestant's neighborhood: an opponent it faced (by dense
/// index) and the recency weight of that match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub opponent: usize,
    pub weight: f64
}

/// Opponent lists for every contestant of a fitting set, derived once per fit.
#[derive(Debug, Clone)]
pub struct Neighborhoods {
    lists: Vec<Vec<Neighbor>>,
    total_weights: Vec<f64>
}

impl Neighborhoods {
    /// Buckets both participants of every pair into each other's list in a
    /// single pass. `pairs[i]` was played with weight `weights[i]`.
    ///
    /// Panics if any of the `n_contestants` ends up with no opponents: callers
    /// must have rejected non-concise contestants already.
    pub fn build(pairs: &[(usize, usize)], weights: &[f64], n_contestants: usize) -> Neighborhoods {
        if pairs.len() != weights.len() {
            panic!("Expected one weight per match!")
        }

        let mut lists: Vec<Vec<Neighbor>> = vec![Vec::new(); n_contestants];
        let mut total_weights = vec![0.0; n_contestants];

        for (&(a, b), &weight) in pairs.iter().zip(weights) {
            lists[a].push(Neighbor { opponent: b, weight });
            lists[b].push(Neighbor { opponent: a, weight });
            total_weights[a] += weight;
            total_weights[b] += weight;
        }

        for (idx, list) in lists.iter().enumerate() {
            assert!(
                !list.is_empty(),
                "Contestant at index {} has an empty neighborhood; non-concise ids must be filtered before fitting",
                idx
            );
        }

        Neighborhoods { lists, total_weights }
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Number of matches the contestant appears in.
    pub fn size(&self, idx: usize) -> usize {
        self.lists[idx].len()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.lists.iter().map(Vec::len).collect()
    }

    pub fn total_weight(&self, idx: usize) -> f64 {
        self.total_weights[idx]
    }

    pub fn neighbors(&self, idx: usize) -> &[Neighbor] {
        &self.lists[idx]
    }

    /// Weighted average opponent rating per contestant under `ratings`.
    ///
    /// A contestant whose matches all carry zero weight averages to its own
    /// rating, which switches its regularization pull off.
    pub fn averages(&self, ratings: &[f64]) -> Vec<f64> {
        self.lists
            .iter()
            .zip(&self.total_weights)
            .enumerate()
            .map(|(idx, (list, total))| {
                if *total <= 0.0 {
                    return ratings[idx];
                }

                let weighted: f64 = list.iter().map(|n| ratings[n.opponent] * n.weight).sum();
                weighted / total
            })
            .collect()
    }
}
