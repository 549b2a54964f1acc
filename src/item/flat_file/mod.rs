pub mod flat_file_reader;

pub mod flat_file_writer;
