//! Session cookie builders for the dashboard.
//!
//! The cookie is host-only on purpose: no Domain attribute, so it never
//! travels to sibling subdomains of the marketing site.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use tfm_forms::cookie::set_session_cookie;
///
/// let jar = set_session_cookie(CookieJar::new(), "tfm_forms_session", "tok".to_owned(), 604800);
/// let cookie = jar.get("tfm_forms_session").unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), None);
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(
    jar: CookieJar,
    name: &str,
    value: String,
    max_age_secs: i64,
) -> CookieJar {
    let cookie = Cookie::build((name.to_owned(), value))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use tfm_forms::cookie::{clear_session_cookie, set_session_cookie};
///
/// let jar = set_session_cookie(CookieJar::new(), "tfm_forms_session", "tok".to_owned(), 3600);
/// let jar = clear_session_cookie(jar, "tfm_forms_session");
/// let cookie = jar.get("tfm_forms_session").unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(cookie.value(), "");
/// ```
pub fn clear_session_cookie(jar: CookieJar, name: &str) -> CookieJar {
    let cookie = Cookie::build((name.to_owned(), ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();
    jar.add(cookie)
}
