pub mod chart;
pub mod response;
pub mod stock;

pub use chart::*;
pub use response::*;
pub use stock::*;
