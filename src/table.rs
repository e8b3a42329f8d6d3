use crate::error::{AceError, Result};

//=====================================================================
// Rectangular multi-dimensional tables backed by a single flat buffer.
//
// Rows are addressed by computed offsets, so a table is one allocation
// no matter how many dimensions it has. Row-major: the last index
// varies fastest.
//=====================================================================

// Product of the dimensions, or None on overflow
fn checked_len(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

fn check_len(what: &'static str, dims: &[usize], data_len: usize) -> Result<()> {
    match checked_len(dims) {
        Some(expected) if expected == data_len => Ok(()),
        Some(expected) => Err(AceError::shape(
            what,
            format!("dimensions {:?} need {} values, got {}", dims, expected, data_len),
        )),
        None => Err(AceError::shape(what, format!("dimensions {:?} overflow", dims))),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table2 {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl Table2 {
    pub fn new(what: &'static str, n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self> {
        check_len(what, &[n_rows, n_cols], data.len())?;
        Ok(Self { n_rows, n_cols, data })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_cols;
        &self.data[start..start + self.n_cols]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n_cols + j]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table3 {
    dims: [usize; 3],
    data: Vec<f64>,
}

impl Table3 {
    pub fn new(what: &'static str, dims: [usize; 3], data: Vec<f64>) -> Result<Self> {
        check_len(what, &dims, data.len())?;
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        (i * self.dims[1] + j) * self.dims[2]
    }

    // Innermost row at [i][j]
    #[inline]
    pub fn row(&self, i: usize, j: usize) -> &[f64] {
        let start = self.offset(i, j);
        &self.data[start..start + self.dims[2]]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.data[self.offset(i, j) + k]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
