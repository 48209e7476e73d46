pub mod convert;
pub mod error;
pub mod parser;

pub use convert::parse_repr;
pub use error::ReprError;
