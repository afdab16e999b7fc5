pub mod email;
pub mod templates;

pub use email::EmailService;
