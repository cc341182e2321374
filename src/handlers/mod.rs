pub mod apostilas;
pub mod auth;
pub mod me;
