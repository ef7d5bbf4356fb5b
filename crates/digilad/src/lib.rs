pub mod client;
pub mod conversation;
pub mod decode;
pub mod errors;
pub mod models;
pub mod prompt;
