pub mod aerodynamics;
pub mod atmosphere;
pub mod frame;
pub mod gravity;
