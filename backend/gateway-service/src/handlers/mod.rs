pub mod health;
pub mod session;
pub mod telegram;
pub mod twitter;
