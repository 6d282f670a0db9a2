pub mod date;
pub mod error;
pub mod value;

pub use date::*;
pub use error::*;
pub use value::*;
