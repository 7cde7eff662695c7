use crate::error::{Error, Result};

/// A dense, square, row-major matrix of pairwise similarity scores.
///
/// Row and column `i` both refer to song `i` of the catalog the matrix
/// was built from. Writes go through [`set_pair`](Self::set_pair), which
/// keeps the matrix symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// A `dim` x `dim` matrix with ones on the diagonal and zeros elsewhere.
    #[must_use]
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { dim, data }
    }

    /// Assemble a matrix from stored rows.
    ///
    /// Fails if the rows do not form a square matrix.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(Error::InvalidData(format!(
                    "similarity row {} has {} entries, expected {}",
                    idx,
                    row.len(),
                    dim
                )));
            }
            data.extend(row);
        }
        Ok(Self { dim, data })
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.dim && j < self.dim {
            Some(self.data[i * self.dim + j])
        } else {
            None
        }
    }

    /// The similarity of song `i` to every song, indexed by row position.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i < self.dim {
            Some(&self.data[i * self.dim..(i + 1) * self.dim])
        } else {
            None
        }
    }

    /// Set the score for the pair `(i, j)` and its mirror `(j, i)`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn set_pair(&mut self, i: usize, j: usize, score: f32) {
        assert!(i < self.dim && j < self.dim, "index out of bounds");
        self.data[i * self.dim + j] = score;
        self.data[j * self.dim + i] = score;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on a zero chunk size, which an empty matrix would ask for
        self.data.chunks_exact(self.dim.max(1))
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.dim).all(|i| {
            (i + 1..self.dim).all(|j| self.data[i * self.dim + j] == self.data[j * self.dim + i])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let m = SimilarityMatrix::identity(3);
        assert_eq!(m.dim(), 3);
        assert_eq!(m.get(1, 1), Some(1.0));
        assert_eq!(m.get(0, 2), Some(0.0));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_set_pair_keeps_symmetry() {
        let mut m = SimilarityMatrix::identity(3);
        m.set_pair(0, 2, 0.25);
        assert_eq!(m.get(2, 0), Some(0.25));
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let result = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5]]);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_rows_round_trip() {
        let mut m = SimilarityMatrix::identity(2);
        m.set_pair(0, 1, 0.75);
        let rows: Vec<Vec<f32>> = m.rows().map(<[f32]>::to_vec).collect();
        assert_eq!(SimilarityMatrix::from_rows(rows).unwrap(), m);
    }

    #[test]
    fn test_empty_matrix() {
        let m = SimilarityMatrix::identity(0);
        assert_eq!(m.rows().count(), 0);
        assert!(m.row(0).is_none());
    }
}
