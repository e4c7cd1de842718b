pub mod histogram;
pub mod monte_carlo;
pub mod random_matrix;
