pub mod generator;
pub mod tag;

pub use generator::*;
pub use tag::*;
