pub mod command;
pub mod document;
pub mod job;
