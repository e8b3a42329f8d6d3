use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{try_zeroed, AceError, Result};
use crate::grid;
use crate::helpers::{compute_temperature_from_kT, is_fission_MT};
use crate::nu::{DelayedNu, NuData};
use crate::reaction::Reaction;
use crate::urr::UrrData;

//=====================================================================
// Microscopic cross sections on the nuclide's own energy grid.
//=====================================================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MicroXs {
    pub total: Vec<f64>,
    pub elastic: Vec<f64>,
    pub fission: Vec<f64>,
    pub nu_fission: Vec<f64>,
    pub absorption: Vec<f64>,
    pub heating: Vec<f64>,
}

impl MicroXs {
    // All six arrays zero-filled
    pub fn zeroed(n_grid: usize) -> Result<Self> {
        Ok(Self {
            total: try_zeroed("total cross section", n_grid)?,
            elastic: try_zeroed("elastic cross section", n_grid)?,
            fission: try_zeroed("fission cross section", n_grid)?,
            nu_fission: try_zeroed("nu-fission cross section", n_grid)?,
            absorption: try_zeroed("absorption cross section", n_grid)?,
            heating: try_zeroed("heating number", n_grid)?,
        })
    }

    fn named(&self) -> [(&'static str, &[f64]); 6] {
        [
            ("total", &self.total),
            ("elastic", &self.elastic),
            ("fission", &self.fission),
            ("nu_fission", &self.nu_fission),
            ("absorption", &self.absorption),
            ("heating", &self.heating),
        ]
    }
}

//=====================================================================
// Everything a fissionable nuclide carries beyond its reactions.
//
// `index_fission` lists the positions in the reaction list of the
// fission channels. It may only be empty when the fission channels are
// given as partial reactions that carry no fission cross section of
// their own.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct FissionData {
    pub has_partial_fission: bool,
    pub index_fission: Vec<usize>,
    pub nu_total: NuData,
    pub nu_prompt: Option<NuData>,
    pub nu_delayed: Option<DelayedNu>,
}

impl FissionData {
    pub fn new(index_fission: Vec<usize>, nu_total: NuData) -> Self {
        Self { has_partial_fission: false, index_fission, nu_total, nu_prompt: None, nu_delayed: None }
    }

    pub fn with_partial_fission(mut self, has_partial_fission: bool) -> Self {
        self.has_partial_fission = has_partial_fission;
        self
    }

    pub fn with_prompt(mut self, nu_prompt: NuData) -> Self {
        self.nu_prompt = Some(nu_prompt);
        self
    }

    pub fn with_delayed(mut self, nu_delayed: DelayedNu) -> Self {
        self.nu_delayed = Some(nu_delayed);
        self
    }

    pub fn n_fission(&self) -> usize {
        self.index_fission.len()
    }
}

//=====================================================================
// A continuous-energy neutron table for one nuclide at one temperature.
//
// Built once through `NuclideBuilder`, then published behind an `Arc`
// and read concurrently without locking. Fields are declared in
// reverse construction order; they drop top to bottom.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct Nuclide {
    // Reactions
    mt_index: HashMap<u32, usize>,
    reactions: Vec<Reaction>,

    // Unresolved resonance data
    urr_inelastic: Option<usize>,
    urr: Option<UrrData>,

    // Fission information
    fission: Option<FissionData>,

    // Energy grid and microscopic cross sections
    xs: MicroXs,
    grid_index: Vec<usize>,
    energy: Vec<f64>,

    // Identity
    name: String,
    zaid: u32,
    listing: Option<usize>,
    awr: f64,
    kT: f64,
}

impl Nuclide {
    pub fn builder(name: impl Into<String>, zaid: u32, awr: f64, kT: f64) -> NuclideBuilder {
        NuclideBuilder::new(name, zaid, awr, kT)
    }

    // Hand the finished table over for shared, read-only use
    pub fn publish(self) -> Arc<Nuclide> {
        log::debug!(
            "publishing nuclide {} ({} grid points, {} reactions)",
            self.name,
            self.n_grid(),
            self.n_reaction()
        );
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zaid(&self) -> u32 {
        self.zaid
    }

    pub fn listing(&self) -> Option<usize> {
        self.listing
    }

    pub fn awr(&self) -> f64 {
        self.awr
    }

    pub fn kT(&self) -> f64 {
        self.kT
    }

    // Temperature in Kelvin
    pub fn temperature(&self) -> f64 {
        compute_temperature_from_kT(self.kT)
    }

    pub fn n_grid(&self) -> usize {
        self.energy.len()
    }

    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    pub fn grid_index(&self) -> &[usize] {
        &self.grid_index
    }

    pub fn xs(&self) -> &MicroXs {
        &self.xs
    }

    // Grid interval holding `energy`, see `grid::search`
    #[inline]
    pub fn grid_search(&self, energy: f64) -> usize {
        grid::search(&self.energy, energy)
    }

    pub fn fissionable(&self) -> bool {
        self.fission.is_some()
    }

    pub fn fission(&self) -> Option<&FissionData> {
        self.fission.as_ref()
    }

    pub fn n_fission(&self) -> usize {
        self.fission.as_ref().map_or(0, FissionData::n_fission)
    }

    pub fn fission_reactions(&self) -> impl Iterator<Item = &Reaction> {
        self.fission
            .iter()
            .flat_map(|fission| fission.index_fission.iter())
            .map(|&i| &self.reactions[i])
    }

    pub fn urr_present(&self) -> bool {
        self.urr.is_some()
    }

    pub fn urr(&self) -> Option<&UrrData> {
        self.urr.as_ref()
    }

    // Reaction used for inelastic competition in the unresolved range
    pub fn urr_inelastic(&self) -> Option<&Reaction> {
        self.urr_inelastic.map(|i| &self.reactions[i])
    }

    pub fn urr_inelastic_index(&self) -> Option<usize> {
        self.urr_inelastic
    }

    pub fn n_reaction(&self) -> usize {
        self.reactions.len()
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn reaction_index(&self, mt: u32) -> Option<usize> {
        self.mt_index.get(&mt).copied()
    }

    pub fn reaction(&self, mt: u32) -> Option<&Reaction> {
        self.reaction_index(mt).map(|i| &self.reactions[i])
    }
}

impl Drop for Nuclide {
    fn drop(&mut self) {
        log::debug!("releasing nuclide {}", self.name);
    }
}

impl std::fmt::Display for Nuclide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nuclide({}, {} reactions)", self.name, self.n_reaction())
    }
}

//=====================================================================
// Single-writer construction of a `Nuclide`.
//
// The builder owns every part handed to it. If `build` fails, the
// builder and all of its parts are dropped before the error is
// returned, so nothing half-built escapes.
//=====================================================================
#[derive(Debug, Default)]
pub struct NuclideBuilder {
    name: String,
    zaid: u32,
    listing: Option<usize>,
    awr: f64,
    kT: f64,
    energy: Vec<f64>,
    grid_index: Vec<usize>,
    xs: Option<MicroXs>,
    fission: Option<FissionData>,
    urr: Option<UrrData>,
    reactions: Vec<Reaction>,
}

impl NuclideBuilder {
    pub fn new(name: impl Into<String>, zaid: u32, awr: f64, kT: f64) -> Self {
        Self { name: name.into(), zaid, awr, kT, ..Default::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn listing(mut self, listing: usize) -> Self {
        self.listing = Some(listing);
        self
    }

    pub fn energy_grid(mut self, energy: Vec<f64>) -> Self {
        self.energy = energy;
        self
    }

    pub fn union_grid_index(mut self, grid_index: Vec<usize>) -> Self {
        self.grid_index = grid_index;
        self
    }

    pub fn micro_xs(mut self, xs: MicroXs) -> Self {
        self.xs = Some(xs);
        self
    }

    pub fn fission(mut self, fission: FissionData) -> Self {
        self.fission = Some(fission);
        self
    }

    pub fn urr(mut self, urr: UrrData) -> Self {
        self.urr = Some(urr);
        self
    }

    pub fn reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    pub fn reactions(mut self, reactions: impl IntoIterator<Item = Reaction>) -> Self {
        self.reactions.extend(reactions);
        self
    }

    pub fn build(self) -> Result<Nuclide> {
        let start = Instant::now();

        if self.name.is_empty() {
            return Err(AceError::shape("Nuclide", "name is empty"));
        }
        if !(self.awr > 0.0) {
            return Err(AceError::shape("Nuclide", format!("{}: awr must be positive, got {}", self.name, self.awr)));
        }

        // Energy grid and cross sections
        grid::check_increasing("Nuclide energy", &self.energy)?;
        let n_grid = self.energy.len();
        let xs = match self.xs {
            Some(xs) => xs,
            None => return Err(AceError::shape("Nuclide", format!("{}: no microscopic cross sections", self.name))),
        };
        for (label, values) in xs.named() {
            if values.len() != n_grid {
                return Err(AceError::shape(
                    "Nuclide",
                    format!(
                        "{}: {} cross section has {} values for {} grid points",
                        self.name,
                        label,
                        values.len(),
                        n_grid
                    ),
                ));
            }
        }
        if let Some(&bad) = self.grid_index.iter().find(|&&i| i >= n_grid) {
            return Err(AceError::shape(
                "Nuclide",
                format!("{}: union grid index {} is outside a grid of {} points", self.name, bad, n_grid),
            ));
        }

        // Reactions, addressable by MT
        let mut mt_index = HashMap::with_capacity(self.reactions.len());
        for (i, reaction) in self.reactions.iter().enumerate() {
            reaction.check_grid(n_grid)?;
            if mt_index.insert(reaction.mt(), i).is_some() {
                let message = format!("{}: duplicate reaction MT={}", self.name, reaction.mt());
                return Err(AceError::shape("Nuclide", message));
            }
        }

        check_fission(&self.name, self.fission.as_ref(), &self.reactions)?;

        // Inelastic competition in the unresolved range refers to a reaction by MT
        let urr_inelastic = match &self.urr {
            Some(urr) if urr.inelastic_flag() > 0 => {
                let mt = urr.inelastic_flag() as u32;
                match mt_index.get(&mt) {
                    Some(&i) => Some(i),
                    None => {
                        return Err(AceError::shape(
                            "Nuclide",
                            format!("{}: unresolved inelastic competition MT={} has no reaction", self.name, mt),
                        ));
                    }
                }
            }
            _ => None,
        };

        log::debug!("built nuclide {} in {} us", self.name, start.elapsed().as_micros());

        Ok(Nuclide {
            mt_index,
            reactions: self.reactions,
            urr_inelastic,
            urr: self.urr,
            fission: self.fission,
            xs,
            grid_index: self.grid_index,
            energy: self.energy,
            name: self.name,
            zaid: self.zaid,
            listing: self.listing,
            awr: self.awr,
            kT: self.kT,
        })
    }
}

fn check_fission(name: &str, fission: Option<&FissionData>, reactions: &[Reaction]) -> Result<()> {
    let has_fission_reaction = reactions.iter().any(Reaction::is_fission);
    let Some(fission) = fission else {
        if has_fission_reaction {
            return Err(AceError::shape("Nuclide", format!("{}: fission reactions present without fission data", name)));
        }
        return Ok(());
    };

    if fission.index_fission.is_empty() && !fission.has_partial_fission {
        return Err(AceError::shape(
            "Nuclide",
            format!("{}: fissionable but no fission reactions are indexed", name),
        ));
    }
    for (position, &i) in fission.index_fission.iter().enumerate() {
        let Some(reaction) = reactions.get(i) else {
            return Err(AceError::shape(
                "Nuclide",
                format!("{}: index_fission[{}] = {} is outside {} reactions", name, position, i, reactions.len()),
            ));
        };
        if !is_fission_MT(reaction.mt()) {
            return Err(AceError::shape(
                "Nuclide",
                format!("{}: index_fission[{}] points at non-fission MT={}", name, position, reaction.mt()),
            ));
        }
        if fission.index_fission[..position].contains(&i) {
            return Err(AceError::shape("Nuclide", format!("{}: reaction {} is indexed as fission twice", name, i)));
        }
    }
    Ok(())
}
