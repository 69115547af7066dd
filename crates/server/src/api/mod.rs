mod dispatch;
mod fleet;

pub use dispatch::*;
pub use fleet::*;
