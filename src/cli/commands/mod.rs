pub mod access;
pub mod token;
