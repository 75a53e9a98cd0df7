pub mod dates;
pub mod sort;
