pub mod location;
pub mod menu;

pub use location::*;
pub use menu::*;
