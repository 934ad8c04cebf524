pub mod accounts;
pub mod health;
pub mod request_id;
