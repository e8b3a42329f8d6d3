use strum_macros::{Display, EnumIter};

use crate::error::{AceError, Result};
use crate::grid;
use crate::interpolation::InterpolationScheme;

pub const N_URR_DATA_TYPES: usize = 6;

//=====================================================================
// Rows stored for every (incident energy, probability bin) pair of an
// unresolved resonance probability table, in storage order.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum UrrDataType {
    CumulativeProbability = 0,
    Total = 1,
    Elastic = 2,
    Fission = 3,
    NGamma = 4,
    Heating = 5,
}

//=====================================================================
// Unresolved resonance probability tables.
//
// `prob` is shaped [n_energy][N_URR_DATA_TYPES][n_prob] but lives in a
// single buffer addressed by computed offsets. Fields are declared in
// reverse acquisition order so the table is released before the energy
// grid it is indexed by.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct UrrData {
    prob: Vec<f64>,
    energy: Vec<f64>,
    n_prob: usize,
    interp: InterpolationScheme,
    inelastic_flag: i32,
    absorption_flag: i32,
    multiply_smooth: bool,
}

impl UrrData {
    pub fn new(
        energy: Vec<f64>,
        n_prob: usize,
        interp: InterpolationScheme,
        inelastic_flag: i32,
        absorption_flag: i32,
        multiply_smooth: bool,
        prob: Vec<f64>,
    ) -> Result<Self> {
        grid::check_increasing("UrrData energy", &energy)?;
        if interp != InterpolationScheme::LinLin && interp != InterpolationScheme::LogLog {
            return Err(AceError::shape(
                "UrrData",
                format!("interpolation must be LinLin or LogLog, got {}", interp),
            ));
        }
        if n_prob == 0 {
            return Err(AceError::shape("UrrData", "at least one probability bin is required"));
        }
        let expected = energy
            .len()
            .checked_mul(N_URR_DATA_TYPES)
            .and_then(|n| n.checked_mul(n_prob))
            .ok_or_else(|| AceError::shape("UrrData", "table dimensions overflow"))?;
        if prob.len() != expected {
            return Err(AceError::shape(
                "UrrData",
                format!(
                    "[{}][{}][{}] table needs {} values, got {}",
                    energy.len(),
                    N_URR_DATA_TYPES,
                    n_prob,
                    expected,
                    prob.len()
                ),
            ));
        }

        let table = Self { prob, energy, n_prob, interp, inelastic_flag, absorption_flag, multiply_smooth };

        // Every cumulative probability row must be a CDF
        for i in 0..table.n_energy() {
            let cdf = table.row(i, UrrDataType::CumulativeProbability);
            if cdf.windows(2).any(|w| w[0] > w[1]) || cdf.iter().any(|p| !(0.0..=1.0).contains(p)) {
                return Err(AceError::shape(
                    "UrrData",
                    format!("cumulative probabilities at energy point {} are not a CDF", i),
                ));
            }
        }
        Ok(table)
    }

    pub fn n_energy(&self) -> usize {
        self.energy.len()
    }

    pub fn n_prob(&self) -> usize {
        self.n_prob
    }

    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    pub fn interp(&self) -> InterpolationScheme {
        self.interp
    }

    pub fn inelastic_flag(&self) -> i32 {
        self.inelastic_flag
    }

    pub fn absorption_flag(&self) -> i32 {
        self.absorption_flag
    }

    pub fn multiply_smooth(&self) -> bool {
        self.multiply_smooth
    }

    #[inline]
    fn offset(&self, i_energy: usize, data_type: UrrDataType) -> usize {
        (i_energy * N_URR_DATA_TYPES + data_type as usize) * self.n_prob
    }

    // All probability bins of one data type at incident energy point `i_energy`
    #[inline]
    pub fn row(&self, i_energy: usize, data_type: UrrDataType) -> &[f64] {
        let start = self.offset(i_energy, data_type);
        &self.prob[start..start + self.n_prob]
    }

    #[inline]
    pub fn prob(&self, i_energy: usize, data_type: UrrDataType, i_prob: usize) -> f64 {
        self.prob[self.offset(i_energy, data_type) + i_prob]
    }

    // Lower bracketing incident-energy index for `energy`
    #[inline]
    pub fn bracket(&self, energy: f64) -> usize {
        grid::search(&self.energy, energy)
    }
}

impl std::fmt::Display for UrrData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UrrData({} energies, {} bins, {})", self.n_energy(), self.n_prob, self.interp)
    }
}
