mod angle;
mod energy;

pub use angle::{AngleDistType, AngleTable, DistAngle, N_EQUIPROBABLE_BINS};
pub use energy::{ChainIter, DistEnergy, EnergyDistChain, EnergyLaw};
