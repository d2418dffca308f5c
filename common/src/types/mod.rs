pub mod coordinate;
pub mod dtos;
pub mod rows;
pub mod schedule;
pub mod views;
