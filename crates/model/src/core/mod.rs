pub mod cell;
pub mod column;
