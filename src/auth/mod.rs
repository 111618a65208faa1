mod cookie;
mod middleware;
mod token;

pub use cookie::{CookiePolicy, TOKEN_COOKIE};
pub use middleware::*;
pub use token::{Claims, TokenKeys};
