//! Session handling against the hosted identity provider: the HTTP gateway,
//! the session cookie, and the middleware that gates pages behind a session.

mod cookie;
mod gateway;
mod middleware;

pub use cookie::{DEFAULT_SESSION_DURATION, invalidate_session_cookie, set_session_cookie};
pub(crate) use cookie::get_session_token;
pub use gateway::{
    NewAccount, SessionToken, UserProfile, current_user, sign_in, sign_out, sign_up,
};
pub use middleware::session_guard;

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;
