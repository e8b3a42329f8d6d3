use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumIter};

use crate::error::{AceError, Result};
use crate::grid;
use crate::interpolation::InterpolationScheme;

// 32 equiprobable cosine bins are described by 33 bin edges
pub const N_EQUIPROBABLE_BINS: usize = 32;

//=====================================================================
// The three shapes an outgoing-angle distribution can take at a single
// incident energy.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, TryFromPrimitive)]
#[repr(i64)]
pub enum AngleDistType {
    Isotropic = 1,
    EquiprobableBins = 2,
    Tabulated = 3,
}

impl AngleDistType {
    pub fn from_code(code: i64) -> Result<Self> {
        Self::try_from(code).map_err(|_| AceError::UnknownCode { what: "angular distribution type", code })
    }
}

// Borrowed view of the distribution stored for one incident energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleTable<'a> {
    Isotropic,
    // 33 bin edges in [-1, 1]
    EquiprobableBins(&'a [f64]),
    Tabulated {
        interp: InterpolationScheme,
        cosine: &'a [f64],
        pdf: &'a [f64],
        cdf: &'a [f64],
    },
}

//=====================================================================
// Secondary angular distribution of one reaction.
//
// `location[i]` is the offset in `data` of the sub-table for
// `energy[i]`. A tabulated sub-table is laid out as
// `[interp, n, cosine[n], pdf[n], cdf[n]]`; an equiprobable one is
// 33 bin edges. Isotropic points own no data.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct DistAngle {
    energy: Vec<f64>,
    kind: Vec<AngleDistType>,
    location: Vec<usize>,
    data: Vec<f64>,
}

impl DistAngle {
    pub fn new(energy: Vec<f64>, kind: Vec<AngleDistType>, location: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        grid::check_increasing("DistAngle energy", &energy)?;
        if kind.len() != energy.len() || location.len() != energy.len() {
            return Err(AceError::shape(
                "DistAngle",
                format!(
                    "energy ({}), type ({}) and location ({}) must be of the same length",
                    energy.len(),
                    kind.len(),
                    location.len()
                ),
            ));
        }

        for (i, (&kind, &loc)) in kind.iter().zip(location.iter()).enumerate() {
            match kind {
                AngleDistType::Isotropic => {}
                AngleDistType::EquiprobableBins => check_equiprobable(&data, i, loc)?,
                AngleDistType::Tabulated => check_tabulated(&data, i, loc)?,
            }
        }

        Ok(Self { energy, kind, location, data })
    }

    // Isotropic at every incident energy
    pub fn isotropic(energy: Vec<f64>) -> Result<Self> {
        let n_energy = energy.len();
        Self::new(energy, vec![AngleDistType::Isotropic; n_energy], vec![0; n_energy], Vec::new())
    }

    pub fn n_energy(&self) -> usize {
        self.energy.len()
    }

    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    pub fn kind(&self) -> &[AngleDistType] {
        &self.kind
    }

    pub fn location(&self) -> &[usize] {
        &self.location
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    // Lower bracketing incident-energy index for `energy`
    #[inline]
    pub fn bracket(&self, energy: f64) -> usize {
        grid::search(&self.energy, energy)
    }

    // The distribution stored for incident energy point `i`
    pub fn table(&self, i: usize) -> AngleTable<'_> {
        let loc = self.location[i];
        match self.kind[i] {
            AngleDistType::Isotropic => AngleTable::Isotropic,
            AngleDistType::EquiprobableBins => {
                AngleTable::EquiprobableBins(&self.data[loc..loc + N_EQUIPROBABLE_BINS + 1])
            }
            AngleDistType::Tabulated => {
                // Only histogram (1) and lin-lin (2) survive construction
                let interp = if self.data[loc] as i64 == 1 {
                    InterpolationScheme::Histogram
                } else {
                    InterpolationScheme::LinLin
                };
                let n = self.data[loc + 1] as usize;
                let start = loc + 2;
                AngleTable::Tabulated {
                    interp,
                    cosine: &self.data[start..start + n],
                    pdf: &self.data[start + n..start + 2 * n],
                    cdf: &self.data[start + 2 * n..start + 3 * n],
                }
            }
        }
    }
}

impl std::fmt::Display for DistAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DistAngle({} energies)", self.n_energy())
    }
}

fn check_cosines(i: usize, cosines: &[f64]) -> Result<()> {
    if let Some(&bad) = cosines.iter().find(|&&mu| !(-1.0..=1.0).contains(&mu)) {
        return Err(AceError::shape("DistAngle", format!("cosine {} at energy point {} is outside [-1, 1]", bad, i)));
    }
    if cosines.windows(2).any(|w| w[0] > w[1]) {
        return Err(AceError::shape("DistAngle", format!("cosines at energy point {} are not sorted", i)));
    }
    Ok(())
}

fn past_end(i: usize, what: &str) -> AceError {
    AceError::shape("DistAngle", format!("{} at energy point {} runs past the data buffer", what, i))
}

fn check_equiprobable(data: &[f64], i: usize, loc: usize) -> Result<()> {
    let end = loc.checked_add(N_EQUIPROBABLE_BINS + 1).ok_or_else(|| past_end(i, "equiprobable bins"))?;
    if end > data.len() {
        return Err(AceError::shape(
            "DistAngle",
            format!("equiprobable bins at energy point {} run past the data buffer ({} > {})", i, end, data.len()),
        ));
    }
    check_cosines(i, &data[loc..end])
}

fn check_tabulated(data: &[f64], i: usize, loc: usize) -> Result<()> {
    let start = loc.checked_add(2).ok_or_else(|| past_end(i, "tabulated header"))?;
    if start > data.len() {
        return Err(AceError::shape("DistAngle", format!("tabulated header at energy point {} is missing", i)));
    }
    let interp = InterpolationScheme::from_code(data[loc] as i64)?;
    if interp != InterpolationScheme::Histogram && interp != InterpolationScheme::LinLin {
        return Err(AceError::shape(
            "DistAngle",
            format!("unsupported interpolation scheme {} for a tabulated angular distribution", interp),
        ));
    }

    // The point count is packed as a float and must be a whole number
    let count = data[loc + 1];
    if !(count.is_finite() && count >= 2.0 && count.fract() == 0.0) {
        return Err(AceError::shape(
            "DistAngle",
            format!("tabulated distribution at energy point {} has {} points", i, count),
        ));
    }
    let n = count as usize;
    let end = n
        .checked_mul(3)
        .and_then(|len| start.checked_add(len))
        .ok_or_else(|| past_end(i, "tabulated distribution"))?;
    if end > data.len() {
        return Err(past_end(i, "tabulated distribution"));
    }
    check_cosines(i, &data[start..start + n])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equiprobable_edges() -> Vec<f64> {
        (0..=N_EQUIPROBABLE_BINS).map(|i| i as f64 / N_EQUIPROBABLE_BINS as f64 * 2.0 - 1.0).collect()
    }

    fn mixed_distribution() -> DistAngle {
        // Point 0: equiprobable at offset 0, point 1: tabulated at offset 33, point 2: isotropic
        let mut data = equiprobable_edges();
        data.extend_from_slice(&[2.0, 3.0, -1.0, 0.0, 1.0, 0.5, 0.5, 0.5, 0.0, 0.5, 1.0]);
        DistAngle::new(
            vec![1e-11, 1.0, 20.0],
            vec![AngleDistType::EquiprobableBins, AngleDistType::Tabulated, AngleDistType::Isotropic],
            vec![0, 33, 0],
            data,
        )
        .unwrap()
    }

    #[test]
    fn test_table_views() {
        let dist = mixed_distribution();
        assert_eq!(dist.n_energy(), 3);

        match dist.table(0) {
            AngleTable::EquiprobableBins(edges) => {
                assert_eq!(edges.len(), 33);
                assert_eq!(edges[0], -1.0);
                assert_eq!(edges[16], 0.0);
                assert_eq!(edges[32], 1.0);
            }
            other => panic!("expected equiprobable bins, got {:?}", other),
        }

        assert_eq!(
            dist.table(1),
            AngleTable::Tabulated {
                interp: InterpolationScheme::LinLin,
                cosine: &[-1.0, 0.0, 1.0],
                pdf: &[0.5, 0.5, 0.5],
                cdf: &[0.0, 0.5, 1.0],
            }
        );
        assert_eq!(dist.table(2), AngleTable::Isotropic);
    }

    #[test]
    fn test_bracket() {
        let dist = mixed_distribution();
        assert_eq!(dist.bracket(1e-11), 0);
        assert_eq!(dist.bracket(0.5), 0);
        assert_eq!(dist.bracket(1.0), 1);
        assert_eq!(dist.bracket(20.0), 1);
    }

    #[test]
    fn test_isotropic() {
        let dist = DistAngle::isotropic(vec![1e-11, 20.0]).unwrap();
        assert!(dist.data().is_empty());
        assert_eq!(dist.table(1), AngleTable::Isotropic);
    }

    #[test]
    fn test_rejects_truncated_equiprobable() {
        let result = DistAngle::new(
            vec![1.0],
            vec![AngleDistType::EquiprobableBins],
            vec![0],
            vec![-1.0, 0.0, 1.0],
        );
        assert!(matches!(result, Err(AceError::InvalidShape { what: "DistAngle", .. })));
    }

    #[test]
    fn test_rejects_bad_tabulated() {
        // Log-log is not allowed for angular tables
        let result = DistAngle::new(
            vec![1.0],
            vec![AngleDistType::Tabulated],
            vec![0],
            vec![5.0, 2.0, -1.0, 1.0, 0.5, 0.5, 0.0, 1.0],
        );
        assert!(result.is_err());

        // Cosine outside [-1, 1]
        let result = DistAngle::new(
            vec![1.0],
            vec![AngleDistType::Tabulated],
            vec![0],
            vec![2.0, 2.0, -1.5, 1.0, 0.5, 0.5, 0.0, 1.0],
        );
        assert!(result.is_err());

        // Unknown interpolation code
        let result = DistAngle::new(vec![1.0], vec![AngleDistType::Tabulated], vec![0], vec![9.0, 2.0]);
        assert_eq!(result, Err(AceError::UnknownCode { what: "interpolation scheme", code: 9 }));
    }

    #[test]
    fn test_rejects_offsets_past_the_buffer() {
        // Offsets and packed counts large enough to overflow an index
        for kind in [AngleDistType::Tabulated, AngleDistType::EquiprobableBins] {
            let result = DistAngle::new(vec![1.0], vec![kind], vec![usize::MAX], vec![2.0, 2.0]);
            assert!(matches!(result, Err(AceError::InvalidShape { what: "DistAngle", .. })));
        }
        let result = DistAngle::new(vec![1.0], vec![AngleDistType::Tabulated], vec![usize::MAX - 1], vec![2.0, 2.0]);
        assert!(matches!(result, Err(AceError::InvalidShape { what: "DistAngle", .. })));

        for count in [1e30, f64::INFINITY, f64::NAN, -3.0, 2.5] {
            let result = DistAngle::new(vec![1.0], vec![AngleDistType::Tabulated], vec![0], vec![2.0, count]);
            assert!(matches!(result, Err(AceError::InvalidShape { what: "DistAngle", .. })), "count {}", count);
        }

        // Count of 3 needs 9 values after the header
        let result = DistAngle::new(
            vec![1.0],
            vec![AngleDistType::Tabulated],
            vec![0],
            vec![2.0, 3.0, -1.0, 0.0, 1.0, 0.5, 0.5, 0.5, 0.0, 0.5],
        );
        assert!(matches!(result, Err(AceError::InvalidShape { what: "DistAngle", .. })));
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let result = DistAngle::new(vec![1.0, 2.0], vec![AngleDistType::Isotropic], vec![0, 0], vec![]);
        assert!(result.is_err());
        let result = DistAngle::isotropic(vec![2.0, 1.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(AngleDistType::from_code(2).unwrap(), AngleDistType::EquiprobableBins);
        assert!(AngleDistType::from_code(0).is_err());
    }
}
