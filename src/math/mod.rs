pub mod eigen;
pub mod power;
