pub mod attendance;
pub mod member;
