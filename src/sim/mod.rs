pub mod bank;
pub mod controller;
pub mod event;
pub mod session;
