pub mod generator;
pub mod tables;

pub use generator::PackGenerator;
