use crate::error::{try_copy, AceError, Result};
use crate::interpolation::InterpolationScheme;

//=====================================================================
// ENDF TAB1 record: a piecewise interpolated 1-D function.
//
// `nbt[i]` is the (1-based) index of the last point of region `i` and
// `interp[i]` is the scheme used inside that region, exactly as ENDF
// stores them. The last boundary is always `n_pairs`.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct Tab1 {
    nbt: Vec<usize>,
    interp: Vec<InterpolationScheme>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Tab1 {
    pub fn new(nbt: Vec<usize>, interp: Vec<InterpolationScheme>, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        // Ensure that the x and y vectors are of the same length
        if x.len() != y.len() {
            return Err(AceError::shape(
                "Tab1",
                format!("x ({}) and y ({}) must be of the same length", x.len(), y.len()),
            ));
        }
        if x.len() < 2 {
            return Err(AceError::shape("Tab1", format!("at least 2 pairs are required, got {}", x.len())));
        }
        if let Some(i) = x.windows(2).position(|w| !(w[0] < w[1])) {
            return Err(AceError::shape(
                "Tab1",
                format!("x must be strictly increasing, x[{}] = {} and x[{}] = {}", i, x[i], i + 1, x[i + 1]),
            ));
        }

        // Region boundaries must partition [1, n_pairs]
        if nbt.is_empty() {
            return Err(AceError::shape("Tab1", "at least one interpolation region is required"));
        }
        if nbt.len() != interp.len() {
            return Err(AceError::shape(
                "Tab1",
                format!("nbt ({}) and interp ({}) must be of the same length", nbt.len(), interp.len()),
            ));
        }
        if nbt[0] < 2 {
            return Err(AceError::shape("Tab1", format!("first region must span 2 points, nbt[0] = {}", nbt[0])));
        }
        if nbt.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AceError::shape("Tab1", "region boundaries must be strictly increasing"));
        }
        if nbt[nbt.len() - 1] != x.len() {
            return Err(AceError::shape(
                "Tab1",
                format!("last region boundary {} does not match {} pairs", nbt[nbt.len() - 1], x.len()),
            ));
        }

        Ok(Self { nbt, interp, x, y })
    }

    // A single lin-lin region, ACE's shorthand for NR = 0
    pub fn linear(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        let n_pairs = x.len();
        Self::new(vec![n_pairs], vec![InterpolationScheme::LinLin], x, y)
    }

    // Copy borrowed slices into a new table
    pub fn from_slices(nbt: &[usize], interp: &[InterpolationScheme], x: &[f64], y: &[f64]) -> Result<Self> {
        Self::new(
            try_copy("Tab1 nbt", nbt)?,
            try_copy("Tab1 interp", interp)?,
            try_copy("Tab1 x", x)?,
            try_copy("Tab1 y", y)?,
        )
    }

    pub fn n_regions(&self) -> usize {
        self.nbt.len()
    }

    pub fn n_pairs(&self) -> usize {
        self.x.len()
    }

    pub fn nbt(&self) -> &[usize] {
        &self.nbt
    }

    pub fn interp(&self) -> &[InterpolationScheme] {
        &self.interp
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    #[inline]
    pub fn contains(&self, x_val: f64) -> bool {
        let (low, high) = self.domain();
        low <= x_val && x_val <= high
    }

    // Evaluate the function at x_val
    pub fn evaluate(&self, x_val: f64) -> Result<f64> {
        if !self.contains(x_val) {
            let (min, max) = self.domain();
            return Err(AceError::OutOfRange { what: "Tab1 abscissa", value: x_val, min, max });
        }

        // Find the index of the bin that x_val falls into
        let idx = match self.x.binary_search_by(|x| x.total_cmp(&x_val)) {
            // We are exactly on a data point, exit early by returning the value
            Ok(idx) => return Ok(self.y[idx]),
            // We are inside a bin
            Err(idx) => idx - 1,
        };

        // The bin [idx, idx + 1] belongs to the first region whose boundary
        // reaches its upper point (1-based idx + 2)
        let region = self.nbt.iter().position(|&boundary| boundary >= idx + 2).unwrap_or(self.nbt.len() - 1);

        self.interp[region].apply(x_val, self.x[idx], self.x[idx + 1], self.y[idx], self.y[idx + 1])
    }
}

impl std::fmt::Display for Tab1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tab1({} regions, {} pairs)", self.n_regions(), self.n_pairs())
    }
}
