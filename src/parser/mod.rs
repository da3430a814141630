// File format parsers
pub mod obj;
