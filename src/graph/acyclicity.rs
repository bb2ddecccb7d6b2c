//! Continuous acyclicity measure on dense adjacency matrices.
//!
//! `h(A) = tr(e^A) - n` is zero exactly when the weighted adjacency `A`
//! (non-negative entries) encodes an acyclic graph: every closed walk adds a
//! positive term `tr(A^k) / k!` to the trace.

/// Row-major square matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { n, data }
    }

    fn mul(&self, other: &Matrix) -> Matrix {
        let n = self.n;
        let mut out = vec![0.0; n * n];
        for i in 0..n {
            for k in 0..n {
                let a = self.data[i * n + k];
                if a == 0.0 {
                    continue;
                }
                let row = &other.data[k * n..(k + 1) * n];
                for (o, &b) in out[i * n..(i + 1) * n].iter_mut().zip(row) {
                    *o += a * b;
                }
            }
        }
        Matrix { n, data: out }
    }

    fn trace(&self) -> f64 {
        (0..self.n).map(|i| self.data[i * self.n + i]).sum()
    }

    /// Max absolute row sum.
    fn norm_inf(&self) -> f64 {
        (0..self.n)
            .map(|i| self.data[i * self.n..(i + 1) * self.n].iter().map(|x| x.abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }
}

/// Matrix exponential by scaling and squaring with a truncated Taylor series.
fn expm(a: &Matrix) -> Matrix {
    const TAYLOR_TERMS: usize = 18;

    let norm = a.norm_inf();
    let squarings = if norm > 0.5 {
        (norm / 0.5).log2().ceil() as u32
    } else {
        0
    };
    let scale = 0.5f64.powi(squarings as i32);
    let scaled = Matrix {
        n: a.n,
        data: a.data.iter().map(|x| x * scale).collect(),
    };

    let mut result = Matrix::identity(a.n);
    let mut term = Matrix::identity(a.n);
    for k in 1..=TAYLOR_TERMS {
        term = term.mul(&scaled);
        let inv_k = 1.0 / k as f64;
        term.data.iter_mut().for_each(|x| *x *= inv_k);
        result
            .data
            .iter_mut()
            .zip(&term.data)
            .for_each(|(r, t)| *r += t);
    }

    for _ in 0..squarings {
        result = result.mul(&result);
    }
    result
}

/// `tr(e^A) - n` for the 0/1 row-major adjacency vector `genes` of an
/// `n`-variable graph.
///
/// Zero for acyclic graphs (exactly: acyclic adjacency keeps every diagonal
/// product at zero), strictly positive otherwise.
///
/// # Panics
/// Panics if `genes.len() != n * n`.
pub fn acyclicity_violation(genes: &[u8], n: usize) -> f64 {
    assert_eq!(genes.len(), n * n, "genome length must be n * n");
    let a = Matrix {
        n,
        data: genes.iter().map(|&g| if g != 0 { 1.0 } else { 0.0 }).collect(),
    };
    expm(&a).trace() - n as f64
}

/// Returns `true` if the genome passes the acyclicity test at `threshold`.
pub fn is_acyclic_genome(genes: &[u8], n: usize, threshold: f64) -> bool {
    acyclicity_violation(genes, n) < threshold
}
