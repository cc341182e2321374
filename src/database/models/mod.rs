pub mod apostila;
pub mod user;

pub use apostila::{Apostila, ApostilaSummary, EditedHtml};
pub use user::User;
