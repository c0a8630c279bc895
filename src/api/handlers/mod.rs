pub mod drinks;
pub mod home;
