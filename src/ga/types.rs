//! Population members.

use crate::error::Result;
use crate::graph::Dag;
use crate::oracle::ScoringOracle;

/// A scored candidate structure.
///
/// `genes` is the row-major 0/1 adjacency vector of `dag` (see
/// [`Dag::genome`]); both are kept so crossover works on genes while scoring
/// and decoding reuse the graph.
#[derive(Debug, Clone)]
pub struct Genome {
    genes: Vec<u8>,
    score: f64,
    dag: Dag,
}

impl Genome {
    /// Encodes and scores `dag`.
    pub fn new<O: ScoringOracle + ?Sized>(dag: Dag, oracle: &O) -> Result<Self> {
        let score = dag.score_unchecked(oracle)?;
        Ok(Self {
            genes: dag.genome(),
            score,
            dag,
        })
    }

    /// Row-major adjacency genes.
    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// The decoded structure.
    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    pub fn into_dag(self) -> Dag {
        self.dag
    }
}
