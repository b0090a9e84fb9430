pub mod registry;
pub mod stdio;
pub mod types;
