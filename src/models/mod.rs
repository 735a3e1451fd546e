pub mod market;
pub mod response;
pub mod tool;

pub use market::*;
pub use response::*;
pub use tool::*;
