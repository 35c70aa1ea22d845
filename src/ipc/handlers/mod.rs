pub mod core;
pub mod grade;
pub mod table;
