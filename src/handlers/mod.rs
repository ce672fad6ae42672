pub mod health;
pub mod photo;
