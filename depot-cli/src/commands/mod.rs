pub mod export;
pub mod init;
pub mod reset;
