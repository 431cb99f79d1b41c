pub mod boost;
pub mod collision;
pub mod movement;
pub mod scoring;
pub mod shield;

pub use boost::*;
pub use collision::*;
pub use movement::*;
pub use scoring::*;
pub use shield::*;
