pub mod directory_path;
pub mod path_error;
pub mod raw_dump_path;
