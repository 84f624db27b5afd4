pub mod employees;
pub mod init;
pub mod log;
pub mod meals;
pub mod serve;
