pub mod member_service;
pub mod profanity;
