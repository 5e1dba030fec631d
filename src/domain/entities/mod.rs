pub mod admin;
pub mod blog_post;
pub mod invoice_status;
pub mod plan;
pub mod subscriber;
