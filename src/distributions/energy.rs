use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumIter};

use crate::error::{AceError, Result};
use crate::interpolation::Tab1;

//=====================================================================
// Secondary energy distribution laws (ACE LAW numbers).
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, TryFromPrimitive)]
#[repr(i64)]
pub enum EnergyLaw {
    TabularEquiprobableBins = 1,
    DiscretePhoton = 2,
    LevelScattering = 3,
    ContinuousTabular = 4,
    GeneralEvaporation = 5,
    MaxwellFission = 7,
    Evaporation = 9,
    Watt = 11,
    TabularLinearFunctions = 22,
    TabularMultipliers = 24,
    KalbachMann = 44,
    CorrelatedAngleEnergy = 61,
    NBodyPhaseSpace = 66,
    LaboratoryAngleEnergy = 67,
}

impl EnergyLaw {
    pub fn from_code(code: i64) -> Result<Self> {
        Self::try_from(code).map_err(|_| AceError::UnknownCode { what: "energy distribution law", code })
    }
}

//=====================================================================
// One law in a reaction's chain of energy distributions.
//
// `p_valid` gives the incident-energy range over which the law applies
// and its probability weight there. `data` is the law-specific packed
// payload, interpreted by the sampling layer. Each node exclusively
// owns the next one.
//=====================================================================
pub struct DistEnergy {
    law: EnergyLaw,
    p_valid: Tab1,
    data: Vec<f64>,
    next: Option<Box<DistEnergy>>,
}

impl DistEnergy {
    pub fn new(law: EnergyLaw, p_valid: Tab1, data: Vec<f64>) -> Self {
        Self { law, p_valid, data, next: None }
    }

    pub fn law(&self) -> EnergyLaw {
        self.law
    }

    pub fn p_valid(&self) -> &Tab1 {
        &self.p_valid
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn next(&self) -> Option<&DistEnergy> {
        self.next.as_deref()
    }

    // Copy of this node's own law, unlinked from the rest of the chain
    pub fn detached(&self) -> Self {
        Self::new(self.law, self.p_valid.clone(), self.data.clone())
    }

    fn same_law(&self, other: &Self) -> bool {
        self.law == other.law && self.p_valid == other.p_valid && self.data == other.data
    }

    #[inline]
    pub fn is_valid_at(&self, energy: f64) -> bool {
        self.p_valid.contains(energy)
    }

    // Probability that this law is the one used at `energy`
    pub fn probability(&self, energy: f64) -> Result<f64> {
        self.p_valid.evaluate(energy)
    }
}

// Unlink the tail one node at a time so that dropping a long chain
// never recurses once per node.
impl Drop for DistEnergy {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

// Links `laws` head to tail and returns the head
fn link(laws: impl DoubleEndedIterator<Item = DistEnergy>) -> Option<Box<DistEnergy>> {
    let mut head: Option<Box<DistEnergy>> = None;
    for mut law in laws.rev() {
        law.next = head.take();
        head = Some(Box::new(law));
    }
    head
}

// Clone, comparison and debug output walk the chain in a loop, as drop
// does, instead of recursing through `next`.
impl Clone for DistEnergy {
    fn clone(&self) -> Self {
        let mut head = self.detached();
        let tail: Vec<DistEnergy> = ChainIter { node: self.next() }.map(DistEnergy::detached).collect();
        head.next = link(tail.into_iter());
        head
    }
}

impl PartialEq for DistEnergy {
    fn eq(&self, other: &Self) -> bool {
        let mut lhs = ChainIter { node: Some(self) };
        let mut rhs = ChainIter { node: Some(other) };
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.same_law(b) => {}
                _ => return false,
            }
        }
    }
}

impl std::fmt::Debug for DistEnergy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistEnergy")
            .field("law", &self.law)
            .field("p_valid", &self.p_valid)
            .field("data", &self.data)
            .field("n_next", &ChainIter { node: self.next() }.count())
            .finish()
    }
}

impl std::fmt::Display for DistEnergy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DistEnergy(LAW={} {})", self.law as i64, self.law)
    }
}

//=====================================================================
// Owning handle for the head of a chain of energy laws.
//=====================================================================
#[derive(Clone, PartialEq, Default)]
pub struct EnergyDistChain {
    head: Option<Box<DistEnergy>>,
    len: usize,
}

impl EnergyDistChain {
    // Link the laws in the given order
    pub fn from_laws(laws: Vec<DistEnergy>) -> Self {
        let len = laws.len();
        Self { head: link(laws.into_iter()), len }
    }

    pub fn single(law: DistEnergy) -> Self {
        Self::from_laws(vec![law])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<&DistEnergy> {
        self.head.as_deref()
    }

    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter { node: self.head.as_deref() }
    }

    // First law whose validity range contains `energy`
    pub fn applicable_law(&self, energy: f64) -> Option<&DistEnergy> {
        self.iter().find(|law| law.is_valid_at(energy))
    }

    // As `applicable_law`, for samplers that want the failure as an error
    pub fn require_law(&self, energy: f64) -> Result<&DistEnergy> {
        self.applicable_law(energy).ok_or(AceError::NoApplicableLaw { energy })
    }
}

impl Drop for EnergyDistChain {
    fn drop(&mut self) {
        if self.len > 1 {
            log::trace!("releasing energy distribution chain of {} laws", self.len);
        }
    }
}

impl std::fmt::Debug for EnergyDistChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(|law| (law.law, &law.p_valid, &law.data))).finish()
    }
}

impl<'a> IntoIterator for &'a EnergyDistChain {
    type Item = &'a DistEnergy;
    type IntoIter = ChainIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ChainIter<'a> {
    node: Option<&'a DistEnergy>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a DistEnergy;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        self.node = node.next.as_deref();
        Some(node)
    }
}

impl std::fmt::Display for EnergyDistChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let laws = self.iter().map(|law| format!("{}", law.law as i64)).collect::<Vec<String>>().join(" -> ");
        write!(f, "EnergyDistChain({})", laws)
    }
}
