//! Navigation capability: query access, URL cleanup, and hard redirects.
//!
//! DESIGN
//! ======
//! The session controller never touches `window.location` directly; it
//! drives this interface so the whole login flow runs headless in tests. A
//! redirect is terminal for the page; callers stop after issuing one.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

/// Route for the public login view.
pub const PUBLIC_VIEW: &str = "/login";
/// Route for the authenticated dashboard.
pub const APP_VIEW: &str = "/";

/// Whether a route belongs to the public or the authenticated surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    /// Landing/login; reachable without a session.
    Public,
    /// Application views; require a session.
    App,
}

/// Classify a location path into public vs. authenticated surface.
pub fn classify_view(path: &str) -> ViewKind {
    if path == PUBLIC_VIEW || path.starts_with("/login/") {
        ViewKind::Public
    } else {
        ViewKind::App
    }
}

/// Redirect target the navigation guard should apply, if any.
///
/// Authenticated users on a public view go to the app; unauthenticated
/// users on an app view go to the login page.
pub fn guard_target(authenticated: bool, view: ViewKind) -> Option<&'static str> {
    match (authenticated, view) {
        (true, ViewKind::Public) => Some(APP_VIEW),
        (false, ViewKind::App) => Some(PUBLIC_VIEW),
        _ => None,
    }
}

/// Browser navigation as the session controller sees it.
pub trait Navigator {
    /// Current location path (e.g. `"/login"`).
    fn path(&self) -> String;
    /// Value of a query parameter on the current navigation.
    fn query_param(&self, key: &str) -> Option<String>;
    /// Remove query parameters from the visible URL without reloading.
    ///
    /// Used to scrub authorization codes and tokens out of the address bar
    /// and browser history immediately after they are read.
    fn strip_query_params(&self, keys: &[&str]);
    /// Full-page redirect. Terminal: no further client code on the current
    /// page runs once the navigation starts.
    fn redirect(&self, target: &str);
}

/// [`Navigator`] over `web_sys::window()`.
///
/// Outside the browser every call degrades to a no-op/empty value, like the
/// other hydrate-gated modules.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn path(&self) -> String {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_owned())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            "/".to_owned()
        }
    }

    fn query_param(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let search = web_sys::window().and_then(|w| w.location().search().ok())?;
            let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
            params.get(key)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn strip_query_params(&self, keys: &[&str]) {
        #[cfg(feature = "hydrate")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let location = window.location();
            let (Ok(pathname), Ok(search), Ok(hash)) = (location.pathname(), location.search(), location.hash())
            else {
                return;
            };
            let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) else {
                return;
            };
            for key in keys {
                params.delete(key);
            }
            let remaining = String::from(params.to_string());
            let mut url = pathname;
            if !remaining.is_empty() {
                url.push('?');
                url.push_str(&remaining);
            }
            url.push_str(&hash);
            if let Ok(history) = window.history() {
                let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = keys;
        }
    }

    fn redirect(&self, target: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(target);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = target;
        }
    }
}
