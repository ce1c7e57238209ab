pub mod retriever;
pub mod river;

pub use retriever::*;
pub use river::*;
