pub mod contact;
pub mod mapping;
