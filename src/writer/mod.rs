// Output file writers
pub mod obj_writer;
