//! Domain models for the agricultural advisory platform

mod advisory;
mod crop;
mod irrigation;
mod nitrate;
mod nutrient;
mod readings;
mod soil;
mod weather;

pub use advisory::*;
pub use crop::*;
pub use irrigation::*;
pub use nitrate::*;
pub use nutrient::*;
pub use readings::*;
pub use soil::*;
pub use weather::*;
