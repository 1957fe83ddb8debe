pub mod user;

pub use user::{current_user_middleware, USER_HEADER};
