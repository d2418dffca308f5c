pub mod availability;
pub mod pagination;
pub mod rating;

pub use availability::{is_open_at, is_open_at_datetime, is_open_now};
pub use pagination::{
    Page, PageDescriptor, PageRequest, PaginationStrategy, describe, describe_by_length,
};
pub use rating::{RatingSummary, average, validate_rating};
