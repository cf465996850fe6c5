#[macro_use]
pub mod macros;

pub mod energy;
pub mod price;
mod zero;

pub use self::zero::Zero;
