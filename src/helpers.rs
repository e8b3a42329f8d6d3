use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumIter};

//=====================================================================
// ENDF MT numbers for the reaction channels this crate needs to name
// explicitly. Any other MT is still a valid reaction identifier; it
// simply has no variant here.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, TryFromPrimitive)]
#[repr(u32)]
pub enum MTNumber {
    TotalXS = 1,
    ElasticScattering = 2,
    NonelasticXS = 3,
    InelasticXS = 4,
    N2N = 16,
    N3N = 17,
    Fission = 18,
    FirstChanceFission = 19,
    SecondChanceFission = 20,
    ThirdChanceFission = 21,
    FourthChanceFission = 38,
    FirstLevelInelastic = 51,
    ContinuumInelastic = 91,
    Disappearance = 101,
    RadiativeCapture = 102,
    NP = 103,
    NAlpha = 107,
    HeatingNumber = 301,
}

// Human readable description of a reaction channel
pub fn reaction_type_from_MT(mt: u32) -> String {
    match MTNumber::try_from(mt) {
        Ok(MTNumber::TotalXS) => "total".to_string(),
        Ok(MTNumber::ElasticScattering) => "(n,elastic)".to_string(),
        Ok(MTNumber::NonelasticXS) => "(n,nonelastic)".to_string(),
        Ok(MTNumber::InelasticXS) => "(n,inelastic)".to_string(),
        Ok(MTNumber::N2N) => "(n,2n)".to_string(),
        Ok(MTNumber::N3N) => "(n,3n)".to_string(),
        Ok(MTNumber::Fission) => "(n,fission)".to_string(),
        Ok(MTNumber::FirstChanceFission) => "(n,f)".to_string(),
        Ok(MTNumber::SecondChanceFission) => "(n,nf)".to_string(),
        Ok(MTNumber::ThirdChanceFission) => "(n,2nf)".to_string(),
        Ok(MTNumber::FourthChanceFission) => "(n,3nf)".to_string(),
        Ok(MTNumber::ContinuumInelastic) => "(n,nc)".to_string(),
        Ok(MTNumber::Disappearance) => "(n,disappear)".to_string(),
        Ok(MTNumber::RadiativeCapture) => "(n,gamma)".to_string(),
        Ok(MTNumber::NP) => "(n,p)".to_string(),
        Ok(MTNumber::NAlpha) => "(n,a)".to_string(),
        Ok(MTNumber::HeatingNumber) => "heating".to_string(),
        _ if (51..=90).contains(&mt) => format!("(n,n{})", mt - 50),
        _ => format!("MT={}", mt),
    }
}

// Total fission and the four partial (chance) fission channels
#[inline]
pub fn is_fission_MT(mt: u32) -> bool {
    matches!(
        MTNumber::try_from(mt),
        Ok(MTNumber::Fission
            | MTNumber::FirstChanceFission
            | MTNumber::SecondChanceFission
            | MTNumber::ThirdChanceFission
            | MTNumber::FourthChanceFission)
    )
}

// Partial fission channels only
#[inline]
pub fn is_partial_fission_MT(mt: u32) -> bool {
    is_fission_MT(mt) && mt != MTNumber::Fission as u32
}

// Provided a temperature in MeV, convert to K
#[inline]
pub fn compute_temperature_from_kT(kT: f64) -> f64 {
    kT * 1e6 / 8.617333262e-5
}
