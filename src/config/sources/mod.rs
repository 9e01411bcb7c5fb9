pub mod environment;
pub mod global_file;
pub mod modpack_file;
