pub mod action;
pub mod hand;
pub mod position;
pub mod pot;
pub mod replay;
pub mod sequence;
pub mod sizing;
pub mod snapshot;

pub use action::*;
pub use hand::*;
pub use position::*;
pub use pot::*;
pub use replay::*;
pub use sequence::*;
pub use sizing::*;
pub use snapshot::*;
