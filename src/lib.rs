#![allow(non_snake_case, clippy::upper_case_acronyms)]

//=====================================================================
// Resident continuous-energy nuclear data for Monte Carlo transport:
// nuclides, their reactions and secondary distributions, unresolved
// resonance tables, thermal scattering tables and the library index
// that locates them. Aggregates are built once by a loader, published
// behind an `Arc` and read concurrently by transport workers.
//=====================================================================

mod distributions;
mod error;
pub mod grid;
mod helpers;
mod interpolation;
mod library;
mod listing;
mod nu;
mod nuclide;
mod reaction;
mod sab;
mod table;
mod urr;
mod utils;

pub use distributions::{
    AngleDistType, AngleTable, ChainIter, DistAngle, DistEnergy, EnergyDistChain, EnergyLaw, N_EQUIPROBABLE_BINS,
};
pub use error::{AceError, Result};
pub use helpers::{compute_temperature_from_kT, is_fission_MT, is_partial_fission_MT, reaction_type_from_MT, MTNumber};
pub use interpolation::{InterpolationScheme, Tab1};
pub use library::Library;
pub use listing::{FileType, TableKind, XsListing, XsListings};
pub use nu::{DelayedNu, NuData, NuType, PolynomialNu, PrecursorGroup};
pub use nuclide::{FissionData, MicroXs, Nuclide, NuclideBuilder};
pub use reaction::Reaction;
pub use sab::{ElasticMode, ElasticScatter, InelasticScatter, SAlphaBeta, SAlphaBetaBuilder, SecondaryMode};
pub use table::{Table2, Table3};
pub use urr::{UrrData, UrrDataType, N_URR_DATA_TYPES};
