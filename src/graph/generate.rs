//! Random DAG generation and the flattened-adjacency genome encoding.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::dag::Dag;
use super::domain::Domain;
use crate::error::{BnslError, Result};
use crate::random::shuffle;

impl Dag {
    /// Samples a random DAG in which every variable has at most
    /// `max_parents` parents.
    ///
    /// A random topological order is drawn first; each variable then takes a
    /// uniformly sized random subset of its predecessors in that order as
    /// parents, so the result is acyclic by construction.
    pub fn random<R: Rng>(domain: Domain, max_parents: usize, rng: &mut R) -> Self {
        let n = domain.len();
        let mut order: Vec<usize> = (0..n).collect();
        shuffle(&mut order, rng);

        let mut dag = Dag::empty(domain);
        for i in 1..n {
            let child = order[i];
            let k = rng.random_range(0..=i.min(max_parents));
            for &parent in order[..i].choose_multiple(rng, k) {
                // `parent` precedes `child` in `order`, so no cycle can form.
                let _ = dag.add_arc(parent, child);
            }
        }
        dag
    }

    /// Row-major 0/1 adjacency vector of length n²: gene `i * n + j` is 1
    /// iff `i → j`.
    pub fn genome(&self) -> Vec<u8> {
        let n = self.node_count();
        let mut genes = vec![0u8; n * n];
        for (u, v) in self.arcs() {
            genes[u * n + v] = 1;
        }
        genes
    }

    /// Decodes a genome produced by [`genome`](Self::genome).
    ///
    /// Fails with [`BnslError::InvalidConfig`] on a length mismatch and
    /// [`BnslError::InvalidStructure`] if the adjacency is cyclic.
    pub fn from_genome(domain: Domain, genes: &[u8]) -> Result<Self> {
        let n = domain.len();
        if genes.len() != n * n {
            return Err(BnslError::InvalidConfig(format!(
                "genome of length {} does not match {n} variables",
                genes.len()
            )));
        }
        let arcs = genes
            .iter()
            .enumerate()
            .filter(|&(_, &g)| g != 0)
            .map(|(idx, _)| (idx / n, idx % n));
        Dag::from_arcs(domain, arcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn domain(n: usize) -> Domain {
        Domain::new((0..n).map(|i| format!("x{i}"))).unwrap()
    }

    #[test]
    fn test_random_respects_parent_cap() {
        let mut rng = create_rng(42);
        for _ in 0..50 {
            let dag = Dag::random(domain(8), 2, &mut rng);
            for v in 0..8 {
                assert!(dag.parents(v).len() <= 2);
            }
        }
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = Dag::random(domain(6), 3, &mut create_rng(7));
        let b = Dag::random(domain(6), 3, &mut create_rng(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_zero_parents_is_empty() {
        let dag = Dag::random(domain(5), 0, &mut create_rng(1));
        assert_eq!(dag.edge_count(), 0);
    }

    #[test]
    fn test_genome_layout() {
        let d = Domain::new(["a", "b", "c"]).unwrap();
        let dag = Dag::from_edges(d.clone(), [("a", "c"), ("b", "a")]).unwrap();
        let genes = dag.genome();
        assert_eq!(genes, vec![0, 0, 1, 1, 0, 0, 0, 0, 0]);
        assert_eq!(Dag::from_genome(d, &genes).unwrap(), dag);
    }

    #[test]
    fn test_from_genome_rejects_cycle_and_bad_length() {
        let d = Domain::new(["a", "b"]).unwrap();
        assert!(matches!(
            Dag::from_genome(d.clone(), &[0, 1, 1, 0]),
            Err(BnslError::InvalidStructure { .. })
        ));
        assert!(matches!(
            Dag::from_genome(d, &[0, 1, 0]),
            Err(BnslError::InvalidConfig(_))
        ));
    }
}
