use crate::distributions::{DistAngle, EnergyDistChain};
use crate::error::{try_copy, AceError, Result};
use crate::helpers::{is_fission_MT, reaction_type_from_MT};

//=====================================================================
// A single reaction channel of a nuclide: its cross section above
// threshold and the optional secondary angle and energy distributions.
//
// `sigma` holds values for grid points `threshold..n_grid` of the
// owning nuclide's energy grid; below threshold the cross section is
// zero.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    mt: u32,
    q_value: f64,
    multiplicity: u32,
    threshold: usize,
    scatter_in_cm: bool,
    sigma: Vec<f64>,
    adist: Option<DistAngle>,
    edist: Option<EnergyDistChain>,
}

impl Reaction {
    pub fn new(
        mt: u32,
        q_value: f64,
        multiplicity: u32,
        threshold: usize,
        scatter_in_cm: bool,
        sigma: Vec<f64>,
        n_grid: usize,
    ) -> Result<Self> {
        if threshold >= n_grid {
            return Err(AceError::shape(
                "Reaction",
                format!("MT={} threshold index {} is outside a grid of {} points", mt, threshold, n_grid),
            ));
        }
        if sigma.len() != n_grid - threshold {
            return Err(AceError::shape(
                "Reaction",
                format!(
                    "MT={} expects {} cross section values above threshold {}, got {}",
                    mt,
                    n_grid - threshold,
                    threshold,
                    sigma.len()
                ),
            ));
        }
        Ok(Self { mt, q_value, multiplicity, threshold, scatter_in_cm, sigma, adist: None, edist: None })
    }

    // Build from borrowed cross section values
    pub fn from_slice(
        mt: u32,
        q_value: f64,
        multiplicity: u32,
        threshold: usize,
        scatter_in_cm: bool,
        sigma: &[f64],
        n_grid: usize,
    ) -> Result<Self> {
        Self::new(mt, q_value, multiplicity, threshold, scatter_in_cm, try_copy("Reaction sigma", sigma)?, n_grid)
    }

    pub fn with_angle_dist(mut self, adist: DistAngle) -> Self {
        self.adist = Some(adist);
        self
    }

    pub fn with_energy_dist(mut self, edist: EnergyDistChain) -> Self {
        self.edist = Some(edist);
        self
    }

    pub fn mt(&self) -> u32 {
        self.mt
    }

    pub fn q_value(&self) -> f64 {
        self.q_value
    }

    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn scatter_in_cm(&self) -> bool {
        self.scatter_in_cm
    }

    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    pub fn adist(&self) -> Option<&DistAngle> {
        self.adist.as_ref()
    }

    pub fn edist(&self) -> Option<&EnergyDistChain> {
        self.edist.as_ref()
    }

    pub fn has_angle_dist(&self) -> bool {
        self.adist.is_some()
    }

    pub fn has_energy_dist(&self) -> bool {
        self.edist.is_some()
    }

    pub fn is_fission(&self) -> bool {
        is_fission_MT(self.mt)
    }

    // Cross section at nuclide grid index `g`
    #[inline]
    pub fn xs(&self, g: usize) -> f64 {
        if g < self.threshold {
            0.0
        } else {
            self.sigma[g - self.threshold]
        }
    }

    // Check this reaction against the grid of the nuclide that will own it
    pub(crate) fn check_grid(&self, n_grid: usize) -> Result<()> {
        if self.threshold + self.sigma.len() != n_grid {
            return Err(AceError::shape(
                "Reaction",
                format!(
                    "MT={} covers {} grid points from threshold {}, nuclide grid has {}",
                    self.mt,
                    self.sigma.len(),
                    self.threshold,
                    n_grid
                ),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reaction(MT={} {})", self.mt, reaction_type_from_MT(self.mt))
    }
}
