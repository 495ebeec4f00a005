pub mod args;
pub mod init;
pub mod termination;
