pub mod calc;
pub mod core;
pub mod groups;
pub mod students;
