pub mod board;
pub mod question;
pub mod rules;
pub mod status;
