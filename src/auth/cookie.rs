use actix_web::cookie::{Cookie, SameSite};

pub const TOKEN_COOKIE: &str = "token";

/// How the access token cookie is scoped.
///
/// Cross-site front-ends need `Secure` + `SameSite=None`; local development
/// over plain HTTP uses `SameSite=Strict` instead.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    pub fn token_cookie(&self, token: String) -> Cookie<'static> {
        let same_site = if self.secure {
            SameSite::None
        } else {
            SameSite::Strict
        };

        Cookie::build(TOKEN_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(same_site)
            .finish()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.token_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}
