mod interpolation_scheme;
mod tab1;

pub use interpolation_scheme::InterpolationScheme;
pub use tab1::Tab1;
