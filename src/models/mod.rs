pub mod period;
pub mod record;
pub mod summary;
pub mod unit;

pub use period::*;
pub use record::*;
pub use summary::*;
pub use unit::*;
