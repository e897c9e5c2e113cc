//! View selection.
//!
//! `resolve` is a pure function of the current location, the signed-in user
//! and the cached tenant selection. It never reads storage itself; callers
//! pass in what the selection store returned, which already maps malformed
//! cache entries to "absent".

use crate::tenant::is_valid_slug;
use crate::types::{Organization, User};

pub const ROOT_PATH: &str = "/";
pub const DIAGNOSTICS_PATH: &str = "/diagnostics";

/// A parsed location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Diagnostics,
    Tenant(String),
    Unknown(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        let segment = trimmed.strip_prefix('/').unwrap_or(trimmed);
        if segment.is_empty() {
            return Route::Root;
        }
        if segment == "diagnostics" {
            return Route::Diagnostics;
        }
        if !segment.contains('/') && is_valid_slug(segment) {
            return Route::Tenant(segment.to_string());
        }
        Route::Unknown(path.to_string())
    }
}

/// Which top-level screen renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Diagnostics,
    Login,
    OrganizationSelect,
    Dashboard(Organization),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Diagnostics => "diagnostics",
            View::Login => "login",
            View::OrganizationSelect => "organization-select",
            View::Dashboard(_) => "dashboard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Render diagnostics without a session
    pub diagnostics_bypass_auth: bool,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            diagnostics_bypass_auth: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub view: View,
    /// Canonical location when the requested one differs
    pub redirect: Option<String>,
}

impl Resolution {
    fn render(view: View) -> Self {
        Self {
            view,
            redirect: None,
        }
    }

    /// The location the app should display after applying any redirect.
    pub fn location<'a>(&'a self, requested: &'a str) -> &'a str {
        self.redirect.as_deref().unwrap_or(requested)
    }
}

pub fn resolve(
    path: &str,
    user: Option<&User>,
    selection: Option<&Organization>,
    policy: RoutePolicy,
) -> Resolution {
    let route = Route::parse(path);

    if route == Route::Diagnostics && policy.diagnostics_bypass_auth {
        return Resolution::render(View::Diagnostics);
    }

    if user.is_none() {
        return Resolution::render(View::Login);
    }

    if route == Route::Diagnostics {
        return Resolution::render(View::Diagnostics);
    }

    let Some(org) = selection else {
        return Resolution {
            view: View::OrganizationSelect,
            redirect: (route != Route::Root).then(|| ROOT_PATH.to_string()),
        };
    };

    let canonical = org.path();
    let redirect = match &route {
        Route::Tenant(slug) if *slug == org.slug => None,
        _ => Some(canonical),
    };
    Resolution {
        view: View::Dashboard(org.clone()),
        redirect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: "staff@example.com".to_string(),
        }
    }

    fn acme() -> Organization {
        Organization {
            id: "org-acme".to_string(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            primary_color: None,
            secondary_color: None,
            accent_color: None,
            logo_url: None,
        }
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse(""), Route::Root);
        assert_eq!(Route::parse("/diagnostics"), Route::Diagnostics);
        assert_eq!(Route::parse("/diagnostics/"), Route::Diagnostics);
        assert_eq!(Route::parse("/acme"), Route::Tenant("acme".to_string()));
        assert_eq!(
            Route::parse("/acme/tickets"),
            Route::Unknown("/acme/tickets".to_string())
        );
    }

    #[test]
    fn test_dashboard_on_canonical_path_has_no_redirect() {
        let org = acme();
        let res = resolve("/acme", Some(&user()), Some(&org), RoutePolicy::default());
        assert_eq!(res.view, View::Dashboard(acme()));
        assert_eq!(res.redirect, None);
        assert_eq!(res.location("/acme"), "/acme");
    }

    #[test]
    fn test_diagnostics_respects_policy() {
        let strict = RoutePolicy {
            diagnostics_bypass_auth: false,
        };
        assert_eq!(resolve("/diagnostics", None, None, strict).view, View::Login);
        assert_eq!(
            resolve("/diagnostics", Some(&user()), None, strict).view,
            View::Diagnostics
        );
    }

    const OPEN: RoutePolicy = RoutePolicy {
        diagnostics_bypass_auth: true,
    };
    const STRICT: RoutePolicy = RoutePolicy {
        diagnostics_bypass_auth: false,
    };

    #[test]
    fn test_signed_out_always_sees_login() {
        for path in ["/", "/acme", "/globex", "/acme/tickets", "/x/y", "/not a slug"] {
            for policy in [OPEN, STRICT] {
                let res = resolve(path, None, Some(&acme()), policy);
                assert_eq!(res.view, View::Login, "{path} {policy:?}");
                assert_eq!(res.redirect, None, "{path} {policy:?}");
            }
        }
    }

    #[test]
    fn test_without_selection_everything_goes_to_root_picker() {
        let cases = [
            ("/", None),
            ("/acme", Some("/")),
            ("/acme/tickets", Some("/")),
            ("/x/y", Some("/")),
        ];
        for (path, redirect) in cases {
            for policy in [OPEN, STRICT] {
                let res = resolve(path, Some(&user()), None, policy);
                assert_eq!(res.view, View::OrganizationSelect, "{path}");
                assert_eq!(res.redirect.as_deref(), redirect, "{path}");
            }
        }
    }

    #[test]
    fn test_with_selection_every_other_path_redirects_to_tenant() {
        let cases = [
            ("/", Some("/acme")),
            ("/acme", None),
            ("/acme/", None),
            ("/globex", Some("/acme")),
            ("/acme/tickets", Some("/acme")),
            ("/x/y", Some("/acme")),
        ];
        for (path, redirect) in cases {
            for policy in [OPEN, STRICT] {
                let res = resolve(path, Some(&user()), Some(&acme()), policy);
                assert_eq!(res.view, View::Dashboard(acme()), "{path}");
                assert_eq!(res.redirect.as_deref(), redirect, "{path}");
            }
        }
    }

    #[test]
    fn test_diagnostics_matrix() {
        let org = acme();
        let u = user();
        let cases: [(Option<&User>, Option<&Organization>, RoutePolicy, View); 6] = [
            (None, None, OPEN, View::Diagnostics),
            (None, None, STRICT, View::Login),
            (Some(&u), None, OPEN, View::Diagnostics),
            (Some(&u), None, STRICT, View::Diagnostics),
            (Some(&u), Some(&org), OPEN, View::Diagnostics),
            (Some(&u), Some(&org), STRICT, View::Diagnostics),
        ];
        for (user, selection, policy, expected) in cases {
            let res = resolve("/diagnostics", user, selection, policy);
            assert_eq!(res.view, expected, "{user:?} {selection:?} {policy:?}");
            assert_eq!(res.redirect, None);
        }
    }

    #[test]
    fn test_org_select_at_root_has_no_redirect() {
        let res = resolve("/", Some(&user()), None, RoutePolicy::default());
        assert_eq!(res.view, View::OrganizationSelect);
        assert_eq!(res.redirect, None);
    }
}
