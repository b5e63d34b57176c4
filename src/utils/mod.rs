pub mod flight_guard;
pub mod member_cache;
