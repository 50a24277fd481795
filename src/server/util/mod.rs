pub mod clock;
pub mod code;
pub mod parse;
pub mod password;
pub mod validate;
