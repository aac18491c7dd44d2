pub mod cumulative;
pub mod daily;
pub mod drawdown;
pub mod period;
pub mod selection;
pub mod summary;

pub use cumulative::*;
pub use daily::*;
pub use drawdown::*;
pub use period::*;
pub use selection::*;
pub use summary::*;
