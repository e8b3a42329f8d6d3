use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumIter};

use crate::distributions::EnergyDistChain;
use crate::error::{AceError, Result};
use crate::interpolation::Tab1;

//=====================================================================
// Fission neutron multiplicity (nu) records.
//
// Total and prompt nu may be given as a polynomial in incident energy
// or as a tabulated function. Delayed nu is always tabulated and
// additionally carries the precursor groups and the energy spectrum of
// the delayed neutrons.
//=====================================================================

// ACE LNU flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, TryFromPrimitive)]
#[repr(i64)]
pub enum NuType {
    Polynomial = 1,
    Tabulated = 2,
}

impl NuType {
    pub fn from_code(code: i64) -> Result<Self> {
        Self::try_from(code).map_err(|_| AceError::UnknownCode { what: "nu formulation", code })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NuData {
    Polynomial(PolynomialNu),
    Tabulated(Tab1),
}

impl NuData {
    pub fn polynomial(coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(AceError::shape("PolynomialNu", "at least one coefficient is required"));
        }
        Ok(NuData::Polynomial(PolynomialNu { coefficients }))
    }

    pub fn nu_type(&self) -> NuType {
        match self {
            NuData::Polynomial(_) => NuType::Polynomial,
            NuData::Tabulated(_) => NuType::Tabulated,
        }
    }

    // Evaluate nu at an incident energy (given in MeV)
    pub fn evaluate(&self, energy: f64) -> Result<f64> {
        match self {
            NuData::Polynomial(nu) => Ok(nu.evaluate(energy)),
            NuData::Tabulated(table) => table.evaluate(energy),
        }
    }
}

// Polynomial formulation for nu
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialNu {
    coefficients: Vec<f64>,
}

impl PolynomialNu {
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    // Horner's rule, lowest order coefficient first
    pub fn evaluate(&self, energy: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |nu, coef| nu * energy + coef)
    }
}

//=====================================================================
// Delayed neutron precursor group: decay constant and the probability
// that a delayed neutron comes from this group, as a function of
// incident energy.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct PrecursorGroup {
    pub decay_constant: f64,
    pub probability: Tab1,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelayedNu {
    nu: Tab1,
    precursors: Vec<PrecursorGroup>,
    edist: EnergyDistChain,
}

impl DelayedNu {
    pub fn new(nu: Tab1, precursors: Vec<PrecursorGroup>, edist: EnergyDistChain) -> Result<Self> {
        if let Some(group) = precursors.iter().position(|g| !(g.decay_constant > 0.0)) {
            return Err(AceError::shape(
                "DelayedNu",
                format!("precursor group {} has a non-positive decay constant", group),
            ));
        }
        Ok(Self { nu, precursors, edist })
    }

    pub fn nu(&self) -> &Tab1 {
        &self.nu
    }

    pub fn n_precursor(&self) -> usize {
        self.precursors.len()
    }

    pub fn precursors(&self) -> &[PrecursorGroup] {
        &self.precursors
    }

    pub fn edist(&self) -> &EnergyDistChain {
        &self.edist
    }

    pub fn evaluate(&self, energy: f64) -> Result<f64> {
        self.nu.evaluate(energy)
    }
}

impl std::fmt::Display for DelayedNu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DelayedNu({} precursor groups, {} laws)", self.n_precursor(), self.edist.len())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::distributions::{DistEnergy, EnergyLaw};
    use crate::interpolation::InterpolationScheme;

    #[test]
    fn test_polynomial_nu() {
        let nu = NuData::polynomial(vec![1.0, 1.1, 1.2]).unwrap();
        assert_eq!(nu.nu_type(), NuType::Polynomial);
        assert_abs_diff_eq!(nu.evaluate(1.0).unwrap(), 3.3, epsilon = 1e-12);
        assert_abs_diff_eq!(nu.evaluate(1.5).unwrap(), 5.35, epsilon = 1e-12);
        assert_abs_diff_eq!(nu.evaluate(2.0).unwrap(), 8.0, epsilon = 1e-12);
        assert!(NuData::polynomial(vec![]).is_err());
    }

    #[test]
    fn test_tabulated_nu() {
        let table = Tab1::new(
            vec![2, 3],
            vec![InterpolationScheme::Histogram, InterpolationScheme::LinLin],
            vec![1e-11, 1.0, 10.0],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap();
        let nu = NuData::Tabulated(table);
        assert_eq!(nu.nu_type(), NuType::Tabulated);
        assert_eq!(nu.evaluate(1e-11).unwrap(), 1.0);
        assert_eq!(nu.evaluate(1e-5).unwrap(), 1.0);
        assert_eq!(nu.evaluate(1.0).unwrap(), 2.0);
        assert_eq!(nu.evaluate(5.5).unwrap(), 2.5);
        assert!(nu.evaluate(11.0).is_err());
    }

    #[test]
    fn test_delayed_nu() {
        let groups: Vec<PrecursorGroup> = [0.01, 0.03, 0.05, 0.09, 0.3, 0.5]
            .iter()
            .map(|&decay_constant| PrecursorGroup {
                decay_constant,
                probability: Tab1::linear(vec![1e-11, 20.0], vec![1.0 / 6.0, 1.0 / 6.0]).unwrap(),
            })
            .collect();
        let edist = EnergyDistChain::single(DistEnergy::new(
            EnergyLaw::ContinuousTabular,
            Tab1::linear(vec![1e-11, 20.0], vec![1.0, 1.0]).unwrap(),
            vec![0.0; 8],
        ));
        let delayed = DelayedNu::new(
            Tab1::linear(vec![1e-11, 20.0], vec![0.0167, 0.0100]).unwrap(),
            groups,
            edist,
        )
        .unwrap();

        assert_eq!(delayed.n_precursor(), 6);
        assert_eq!(delayed.edist().len(), 1);
        assert_eq!(delayed.evaluate(1e-11).unwrap(), 0.0167);
        assert_eq!(format!("{}", delayed), "DelayedNu(6 precursor groups, 1 laws)");
    }

    #[test]
    fn test_delayed_nu_rejects_bad_decay_constant() {
        let group = PrecursorGroup {
            decay_constant: 0.0,
            probability: Tab1::linear(vec![1e-11, 20.0], vec![1.0, 1.0]).unwrap(),
        };
        let result = DelayedNu::new(
            Tab1::linear(vec![1e-11, 20.0], vec![0.01, 0.01]).unwrap(),
            vec![group],
            EnergyDistChain::default(),
        );
        assert!(matches!(result, Err(AceError::InvalidShape { what: "DelayedNu", .. })));
    }
}
