pub mod analysis;
pub mod codec;
pub mod meta;

pub use analysis::*;
pub use codec::*;
pub use meta::*;
