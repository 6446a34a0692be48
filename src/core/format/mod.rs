pub mod datetime;
pub mod text;
