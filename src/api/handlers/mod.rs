pub mod announcements;
pub mod auth;
pub mod farmers;
pub mod programs;
pub mod root;
