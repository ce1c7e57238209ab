pub mod archetype;
pub mod blockers;
pub mod decompose;
pub mod engine;
pub mod outlook;

pub use archetype::*;
pub use blockers::*;
pub use decompose::*;
pub use engine::*;
pub use outlook::*;
