pub mod db;
pub mod smtp;

pub use db::DbAdapter;
pub use smtp::SmtpMailAdapter;
