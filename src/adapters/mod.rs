pub mod fs;
pub mod resolver;
