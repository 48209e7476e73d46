pub mod decode;
pub mod result_set;
