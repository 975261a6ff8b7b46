pub mod avatar_utils;
pub mod session_utils;
pub mod validate_utils;
pub mod view_utils;
