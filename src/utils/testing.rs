//=====================================================================
// Utility functions to aid in accelerating testing
//=====================================================================

use std::sync::{Arc, Mutex};
use std::time::Instant;

use lazy_static::lazy_static;

use crate::distributions::{DistAngle, DistEnergy, EnergyDistChain, EnergyLaw};
use crate::grid::union_grid_index;
use crate::interpolation::{InterpolationScheme, Tab1};
use crate::nu::{DelayedNu, NuData, PrecursorGroup};
use crate::nuclide::{FissionData, MicroXs, Nuclide, NuclideBuilder};
use crate::reaction::Reaction;
use crate::sab::{ElasticScatter, InelasticScatter, SAlphaBeta, SAlphaBetaBuilder, SecondaryMode};
use crate::urr::UrrData;

// These hold aggregates in a way where they are accessible to all tests
// in all files, and where they are built once and reused in all tests.
lazy_static! {
    pub static ref NUCLIDE: Mutex<Option<Arc<Nuclide>>> = Mutex::new(None);
    pub static ref SAB: Mutex<Option<Arc<SAlphaBeta>>> = Mutex::new(None);
}

const ENERGY: [f64; 6] = [1e-11, 1e-6, 2e-6, 1.0, 10.0, 20.0];

fn flat(x: &[f64], y: f64) -> Tab1 {
    Tab1::linear(x.to_vec(), vec![y; x.len()]).unwrap()
}

// A small non-fissile nuclide with a single capture reaction
pub fn simple_builder(name: &str) -> NuclideBuilder {
    let energy = vec![1e-11, 1.0, 20.0];
    Nuclide::builder(name, 1001, 0.999167, 2.53e-8)
        .energy_grid(energy)
        .micro_xs(MicroXs {
            total: vec![30.0, 20.0, 1.0],
            elastic: vec![20.0, 19.9, 0.99],
            fission: vec![0.0; 3],
            nu_fission: vec![0.0; 3],
            absorption: vec![10.0, 0.1, 0.01],
            heating: vec![0.0; 3],
        })
        .reaction(Reaction::new(102, 2.22, 0, 0, false, vec![10.0, 0.1, 0.01], 3).unwrap())
}

// U-235-like nuclide: fission with total/prompt/delayed nu, capture, an
// (n,2n) threshold reaction and unresolved resonance tables.
pub fn fissile_builder() -> NuclideBuilder {
    let fission = Reaction::new(18, 193.4, 1, 0, false, vec![500.0, 200.0, 150.0, 1.2, 1.8, 1.1], 6)
        .unwrap()
        .with_angle_dist(DistAngle::isotropic(vec![1e-11, 20.0]).unwrap())
        .with_energy_dist(EnergyDistChain::single(DistEnergy::new(
            EnergyLaw::MaxwellFission,
            flat(&[1e-11, 20.0], 1.0),
            vec![1.0, 2.0, 1e-11, 20.0, 1.29, 1.35, -20.0],
        )));
    let capture = Reaction::new(102, 6.5, 0, 0, false, vec![150.0, 60.0, 50.0, 0.1, 0.05, 0.01], 6).unwrap();
    let n2n = Reaction::new(16, -5.3, 2, 3, false, vec![0.0, 0.3, 0.4], 6)
        .unwrap()
        .with_energy_dist(EnergyDistChain::from_laws(vec![
            DistEnergy::new(EnergyLaw::ContinuousTabular, flat(&[5.3, 10.0], 1.0), vec![0.0; 8]),
            DistEnergy::new(EnergyLaw::Evaporation, flat(&[10.0, 20.0], 1.0), vec![0.0; 4]),
        ]));

    let delayed = DelayedNu::new(
        Tab1::linear(vec![1e-11, 20.0], vec![0.0167, 0.0100]).unwrap(),
        vec![
            PrecursorGroup { decay_constant: 0.0133, probability: flat(&[1e-11, 20.0], 0.4) },
            PrecursorGroup { decay_constant: 0.0327, probability: flat(&[1e-11, 20.0], 0.6) },
        ],
        EnergyDistChain::single(DistEnergy::new(EnergyLaw::Evaporation, flat(&[1e-11, 20.0], 1.0), vec![0.0; 4])),
    )
    .unwrap();

    // Cumulative probability rows are [0.5, 1.0] at both energies
    let mut prob = Vec::new();
    for _ in 0..2 {
        prob.extend([0.5, 1.0]);
        prob.extend([20.0, 25.0, 11.0, 12.0, 1.5, 2.0, 7.0, 9.0, 5.0, 6.0]);
    }
    let urr = UrrData::new(vec![2.25e-3, 2.5e-2], 2, InterpolationScheme::LinLin, 16, 0, false, prob).unwrap();

    Nuclide::builder("92235.80c", 92235, 233.0248, 2.53e-8)
        .listing(0)
        .energy_grid(ENERGY.to_vec())
        .union_grid_index(union_grid_index(&[1e-11, 5e-7, 1e-6, 1.5e-6, 2e-6, 0.5, 1.0, 20.0], &ENERGY))
        .micro_xs(MicroXs {
            total: vec![700.0, 300.0, 250.0, 9.0, 6.0, 5.0],
            elastic: vec![50.0, 40.0, 50.0, 7.7, 3.85, 3.58],
            fission: vec![500.0, 200.0, 150.0, 1.2, 1.8, 1.1],
            nu_fission: vec![1250.0, 500.0, 375.0, 3.0, 5.0, 3.5],
            absorption: vec![650.0, 260.0, 200.0, 1.3, 1.85, 1.11],
            heating: vec![1.0; 6],
        })
        .fission(
            FissionData::new(vec![0], NuData::polynomial(vec![2.5]).unwrap())
                .with_prompt(NuData::polynomial(vec![2.48, 0.1]).unwrap())
                .with_delayed(delayed),
        )
        .urr(urr)
        .reactions([fission, capture, n2n])
}

pub fn sab_builder() -> SAlphaBetaBuilder {
    let inelastic = InelasticScatter::new(
        SecondaryMode::Skewed,
        vec![1e-11, 1e-6, 4e-6],
        vec![80.0, 40.0, 25.0],
        2,
        vec![1e-8, 2e-8, 1.1e-7, 1.2e-7, 3e-6, 5e-6],
        3,
        vec![
            -0.9, 0.0, 0.9, -0.8, 0.0, 0.8, // 1e-11
            -0.7, 0.0, 0.7, -0.6, 0.0, 0.6, // 1e-6
            -0.4, 0.0, 0.4, -0.5, 0.0, 0.5, // 4e-6
        ],
    )
    .unwrap();
    let elastic = ElasticScatter::discrete(vec![1e-11, 1e-6], vec![10.0, 8.0], 2, vec![-0.5, 0.5, -0.4, 0.4]).unwrap();

    SAlphaBeta::builder("lwtr.20t", 1001, 0.999167, 2.53e-8)
        .thresholds(4.46e-6, 1e-6)
        .inelastic(inelastic)
        .elastic(elastic)
}

// The following builds the test nuclide once and shares it.
pub fn get_nuclide() -> Arc<Nuclide> {
    let mut nuclide = NUCLIDE.lock().unwrap();

    // Only build the Nuclide if it is not already built
    if nuclide.is_none() {
        let start = Instant::now();
        *nuclide = Some(fissile_builder().build().unwrap().publish());
        println!("⚛️  Time to build test Nuclide ⚛️ : {:?}", start.elapsed());
    }
    // Otherwise, hand out another reference to the same Nuclide
    Arc::clone(nuclide.as_ref().unwrap())
}

pub fn get_sab() -> Arc<SAlphaBeta> {
    let mut sab = SAB.lock().unwrap();

    if sab.is_none() {
        let start = Instant::now();
        *sab = Some(sab_builder().build().unwrap().publish());
        println!("⚛️  Time to build test SAlphaBeta ⚛️ : {:?}", start.elapsed());
    }
    Arc::clone(sab.as_ref().unwrap())
}
