//! # Route Guard
//!
//! Pre-navigation authentication check. Every route except [`Route::Login`]
//! requires an authenticated session; blocked navigation is redirected to the
//! login screen and the original target is carried along so the caller can
//! resume it after a successful login.
//!
//! ```text
//!   navigate(target)
//!        │
//!        ▼
//!   target.is_public()? ──yes──► Proceed(target)
//!        │ no
//!        ▼
//!   authenticated? ─────yes──► Proceed(target)
//!        │ no
//!        ▼
//!   Redirect { to: Login, from: target }
//! ```

use crate::auth::AuthState;
use crate::routes::Route;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    /// Render the requested route.
    Proceed(Route),

    /// Render `to` instead; `from` is the route that was refused.
    Redirect { to: Route, from: Route },
}

impl NavDecision {
    /// The route that will actually be shown.
    pub fn destination(&self) -> &Route {
        match self {
            NavDecision::Proceed(route) => route,
            NavDecision::Redirect { to, .. } => to,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, NavDecision::Redirect { .. })
    }
}

/// Decides whether `target` may be shown given the current auth state.
pub fn check(auth: &AuthState, target: &Route) -> NavDecision {
    if target.is_public() || auth.is_authenticated() {
        NavDecision::Proceed(target.clone())
    } else {
        NavDecision::Redirect {
            to: Route::Login,
            from: target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn protected_routes() -> Vec<Route> {
        vec![
            Route::Dashboard,
            Route::products(),
            Route::CreateProduct,
            Route::ProductDetail(ProductId::from(3)),
            Route::Logout,
        ]
    }

    #[test]
    fn test_logged_out_is_redirected_with_origin() {
        let auth = AuthState::default();
        for route in protected_routes() {
            assert_eq!(
                check(&auth, &route),
                NavDecision::Redirect {
                    to: Route::Login,
                    from: route.clone()
                }
            );
        }
    }

    #[test]
    fn test_login_is_always_reachable() {
        let logged_out = AuthState::default();
        let logged_in = AuthState::default().login("ana");
        for auth in [logged_out, logged_in] {
            assert_eq!(check(&auth, &Route::Login), NavDecision::Proceed(Route::Login));
        }
    }

    #[test]
    fn test_logged_in_proceeds_everywhere() {
        let auth = AuthState::default().login("ana");
        for route in protected_routes() {
            let decision = check(&auth, &route);
            assert!(!decision.is_redirect());
            assert_eq!(decision.destination(), &route);
        }
    }
}
