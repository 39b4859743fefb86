//! `sea-orm` entities for the hotel operations store, with the small create
//! and lookup helpers the service layer builds on.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod session;
pub mod room;
pub mod housekeeping_task;
pub mod work_order;
pub mod reservation;

#[cfg(test)]
mod tests;
