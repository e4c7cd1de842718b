pub mod density_out;
pub mod matrix_txt;
