pub mod home;
pub mod memory_query;
pub mod post;
pub mod user;
