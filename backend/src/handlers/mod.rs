pub mod attendance;
pub mod health;

pub use attendance::*;
pub use health::*;
