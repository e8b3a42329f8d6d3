use std::sync::Arc;
use std::time::Instant;

use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumIter};

use crate::error::{AceError, Result};
use crate::grid;
use crate::helpers::compute_temperature_from_kT;
use crate::table::{Table2, Table3};

// Representation of secondary energies and cosines for inelastic scattering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, TryFromPrimitive)]
#[repr(i64)]
pub enum SecondaryMode {
    Equal = 0,
    Skewed = 1,
    Continuous = 2,
}

impl SecondaryMode {
    pub fn from_code(code: i64) -> Result<Self> {
        Self::try_from(code).map_err(|_| AceError::UnknownCode { what: "S(a,b) secondary mode", code })
    }
}

// Discrete: incoherent elastic with tabulated cosines.
// Exact: coherent elastic from Bragg edges, no cosine table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, TryFromPrimitive)]
#[repr(i64)]
pub enum ElasticMode {
    Discrete = 3,
    Exact = 4,
}

impl ElasticMode {
    pub fn from_code(code: i64) -> Result<Self> {
        Self::try_from(code).map_err(|_| AceError::UnknownCode { what: "S(a,b) elastic mode", code })
    }
}

//=====================================================================
// Inelastic thermal scattering channel.
//
// For each incoming energy: the cross section, `n_e_out` outgoing
// energies, and for each outgoing energy `n_mu` scattering cosines.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct InelasticScatter {
    mu: Table3,
    e_out: Table2,
    sigma: Vec<f64>,
    e_in: Vec<f64>,
    mode: SecondaryMode,
}

impl InelasticScatter {
    pub fn new(
        mode: SecondaryMode,
        e_in: Vec<f64>,
        sigma: Vec<f64>,
        n_e_out: usize,
        e_out: Vec<f64>,
        n_mu: usize,
        mu: Vec<f64>,
    ) -> Result<Self> {
        grid::check_increasing("InelasticScatter e_in", &e_in)?;
        let n_e_in = e_in.len();
        if sigma.len() != n_e_in {
            return Err(AceError::shape(
                "InelasticScatter",
                format!("{} cross section values for {} incoming energies", sigma.len(), n_e_in),
            ));
        }
        if n_e_out == 0 || n_mu == 0 {
            return Err(AceError::shape("InelasticScatter", "outgoing energy and cosine counts must be positive"));
        }
        let e_out = Table2::new("InelasticScatter e_out", n_e_in, n_e_out, e_out)?;
        let mu = Table3::new("InelasticScatter mu", [n_e_in, n_e_out, n_mu], mu)?;
        if let Some(bad) = mu.as_slice().iter().find(|c| !(-1.0..=1.0).contains(*c)) {
            return Err(AceError::shape("InelasticScatter", format!("scattering cosine {} is outside [-1, 1]", bad)));
        }
        Ok(Self { mu, e_out, sigma, e_in, mode })
    }

    pub fn mode(&self) -> SecondaryMode {
        self.mode
    }

    pub fn n_e_in(&self) -> usize {
        self.e_in.len()
    }

    pub fn n_e_out(&self) -> usize {
        self.e_out.n_cols()
    }

    pub fn n_mu(&self) -> usize {
        self.mu.dims()[2]
    }

    pub fn e_in(&self) -> &[f64] {
        &self.e_in
    }

    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    // Outgoing energies for incoming energy `i`
    #[inline]
    pub fn e_out(&self, i: usize) -> &[f64] {
        self.e_out.row(i)
    }

    // Cosines for incoming energy `i` and outgoing energy `j`
    #[inline]
    pub fn mu(&self, i: usize, j: usize) -> &[f64] {
        self.mu.row(i, j)
    }

    #[inline]
    pub fn bracket(&self, energy: f64) -> usize {
        grid::search(&self.e_in, energy)
    }
}

//=====================================================================
// Elastic thermal scattering channel.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticScatter {
    mu: Option<Table2>,
    p: Vec<f64>,
    e_in: Vec<f64>,
    mode: ElasticMode,
}

impl ElasticScatter {
    pub fn new(mode: ElasticMode, e_in: Vec<f64>, p: Vec<f64>, n_mu: usize, mu: Vec<f64>) -> Result<Self> {
        match mode {
            ElasticMode::Exact if n_mu == 0 && mu.is_empty() => Self::exact(e_in, p),
            ElasticMode::Exact => Err(AceError::shape("ElasticScatter", "coherent elastic carries no cosine table")),
            ElasticMode::Discrete => Self::discrete(e_in, p, n_mu, mu),
        }
    }

    // Coherent elastic: Bragg edges and cumulative structure factors
    pub fn exact(e_in: Vec<f64>, p: Vec<f64>) -> Result<Self> {
        Self::check_grid(&e_in, &p)?;
        Ok(Self { mu: None, p, e_in, mode: ElasticMode::Exact })
    }

    // Incoherent elastic with `n_mu` equally likely cosines per energy
    pub fn discrete(e_in: Vec<f64>, p: Vec<f64>, n_mu: usize, mu: Vec<f64>) -> Result<Self> {
        Self::check_grid(&e_in, &p)?;
        if n_mu == 0 {
            return Err(AceError::shape("ElasticScatter", "incoherent elastic needs at least one cosine"));
        }
        let mu = Table2::new("ElasticScatter mu", e_in.len(), n_mu, mu)?;
        if let Some(bad) = mu.as_slice().iter().find(|c| !(-1.0..=1.0).contains(*c)) {
            return Err(AceError::shape("ElasticScatter", format!("scattering cosine {} is outside [-1, 1]", bad)));
        }
        Ok(Self { mu: Some(mu), p, e_in, mode: ElasticMode::Discrete })
    }

    fn check_grid(e_in: &[f64], p: &[f64]) -> Result<()> {
        grid::check_increasing("ElasticScatter e_in", e_in)?;
        if p.len() != e_in.len() {
            return Err(AceError::shape(
                "ElasticScatter",
                format!("{} P values for {} incoming energies", p.len(), e_in.len()),
            ));
        }
        Ok(())
    }

    pub fn mode(&self) -> ElasticMode {
        self.mode
    }

    pub fn n_e_in(&self) -> usize {
        self.e_in.len()
    }

    pub fn n_mu(&self) -> usize {
        self.mu.as_ref().map_or(0, Table2::n_cols)
    }

    pub fn e_in(&self) -> &[f64] {
        &self.e_in
    }

    pub fn p(&self) -> &[f64] {
        &self.p
    }

    #[inline]
    pub fn mu(&self, i: usize) -> Option<&[f64]> {
        self.mu.as_ref().map(|mu| mu.row(i))
    }

    #[inline]
    pub fn bracket(&self, energy: f64) -> usize {
        grid::search(&self.e_in, energy)
    }
}

//=====================================================================
// Thermal scattering table for a bound moderator (lwtr, grph, ...).
//
// Independent of any `Nuclide`; shares its publish-then-read lifecycle.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct SAlphaBeta {
    elastic: Option<ElasticScatter>,
    inelastic: InelasticScatter,
    threshold_inelastic: f64,
    threshold_elastic: f64,
    name: String,
    zaid: u32,
    awr: f64,
    kT: f64,
}

impl SAlphaBeta {
    pub fn builder(name: impl Into<String>, zaid: u32, awr: f64, kT: f64) -> SAlphaBetaBuilder {
        SAlphaBetaBuilder { name: name.into(), zaid, awr, kT, ..Default::default() }
    }

    pub fn publish(self) -> Arc<SAlphaBeta> {
        log::debug!(
            "publishing S(a,b) table {} ({} inelastic energies, elastic: {})",
            self.name,
            self.inelastic.n_e_in(),
            self.elastic.as_ref().map_or("none".to_string(), |e| e.mode.to_string())
        );
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zaid(&self) -> u32 {
        self.zaid
    }

    pub fn awr(&self) -> f64 {
        self.awr
    }

    pub fn kT(&self) -> f64 {
        self.kT
    }

    pub fn temperature(&self) -> f64 {
        compute_temperature_from_kT(self.kT)
    }

    pub fn threshold_inelastic(&self) -> f64 {
        self.threshold_inelastic
    }

    pub fn threshold_elastic(&self) -> f64 {
        self.threshold_elastic
    }

    pub fn inelastic(&self) -> &InelasticScatter {
        &self.inelastic
    }

    pub fn elastic(&self) -> Option<&ElasticScatter> {
        self.elastic.as_ref()
    }

    // Whether S(a,b) treatment replaces free-gas scattering at `energy`
    pub fn applies_at(&self, energy: f64) -> bool {
        energy < self.threshold_inelastic
    }
}

impl Drop for SAlphaBeta {
    fn drop(&mut self) {
        log::debug!("releasing S(a,b) table {}", self.name);
    }
}

impl std::fmt::Display for SAlphaBeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SAlphaBeta({}, {})", self.name, self.inelastic.mode)
    }
}

#[derive(Debug, Default)]
pub struct SAlphaBetaBuilder {
    name: String,
    zaid: u32,
    awr: f64,
    kT: f64,
    threshold_inelastic: f64,
    threshold_elastic: f64,
    inelastic: Option<InelasticScatter>,
    elastic: Option<ElasticScatter>,
}

impl SAlphaBetaBuilder {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thresholds(mut self, inelastic: f64, elastic: f64) -> Self {
        self.threshold_inelastic = inelastic;
        self.threshold_elastic = elastic;
        self
    }

    pub fn inelastic(mut self, inelastic: InelasticScatter) -> Self {
        self.inelastic = Some(inelastic);
        self
    }

    pub fn elastic(mut self, elastic: ElasticScatter) -> Self {
        self.elastic = Some(elastic);
        self
    }

    pub fn build(self) -> Result<SAlphaBeta> {
        let start = Instant::now();
        if self.name.is_empty() {
            return Err(AceError::shape("SAlphaBeta", "name is empty"));
        }
        let Some(inelastic) = self.inelastic else {
            return Err(AceError::shape("SAlphaBeta", format!("{}: no inelastic scattering data", self.name)));
        };
        if !(self.threshold_inelastic > 0.0) {
            return Err(AceError::shape(
                "SAlphaBeta",
                format!("{}: inelastic threshold must be positive, got {}", self.name, self.threshold_inelastic),
            ));
        }
        match &self.elastic {
            Some(_) if !(self.threshold_elastic > 0.0) => {
                return Err(AceError::shape(
                    "SAlphaBeta",
                    format!("{}: elastic threshold must be positive, got {}", self.name, self.threshold_elastic),
                ));
            }
            None if self.threshold_elastic != 0.0 => {
                return Err(AceError::shape(
                    "SAlphaBeta",
                    format!("{}: elastic threshold given without elastic data", self.name),
                ));
            }
            _ => {}
        }

        log::debug!("built S(a,b) table {} in {} us", self.name, start.elapsed().as_micros());
        Ok(SAlphaBeta {
            elastic: self.elastic,
            inelastic,
            threshold_inelastic: self.threshold_inelastic,
            threshold_elastic: self.threshold_elastic,
            name: self.name,
            zaid: self.zaid,
            awr: self.awr,
            kT: self.kT,
        })
    }
}
