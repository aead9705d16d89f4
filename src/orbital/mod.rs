pub mod elements;
pub mod maneuvers;

pub use elements::OrbitalElements;
pub use maneuvers::{hohmann, hohmann_mu, HohmannTransfer};
