//! Data types shared by the interaction engine.

mod cell;
mod drawing;
mod selection;

pub use cell::*;
pub use drawing::*;
pub use selection::*;
