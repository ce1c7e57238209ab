pub mod flop;
pub mod hash;
pub mod texture;
pub mod vector;

pub use flop::*;
pub use hash::*;
pub use texture::*;
pub use vector::*;
