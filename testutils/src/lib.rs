mod constants;
mod objs;

pub use constants::*;
pub use objs::*;
