// Business domains
pub mod reviews;
