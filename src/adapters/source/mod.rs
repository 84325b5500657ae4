pub mod file;

pub use file::FileObjectSource;
