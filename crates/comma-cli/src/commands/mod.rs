pub mod consistency;
pub mod features;
pub mod filter_dates;
pub mod init;
pub mod validate;
