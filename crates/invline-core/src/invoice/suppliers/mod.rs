//! One extractor per supplier layout.

mod bosch;
mod continental;
mod diesel;
mod ngk;
mod valeo;

pub use bosch::BoschExtractor;
pub use continental::ContinentalExtractor;
pub use diesel::DieselTechnicExtractor;
pub use ngk::NgkExtractor;
pub use valeo::ValeoExtractor;
