pub mod admin;
pub mod authcode;
pub mod contact;
pub mod session;
pub mod submit;
