//! # Route Guard
//!
//! Route table of the blog front end and the authentication check applied
//! before navigating.

use super::session::SessionManager;

/// Known navigation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Blog,
    /// `/article/:id`
    ArticleDetail(String),
    /// `/my-blog`
    MyBlog,
    /// `/create`
    CreateArticle,
    /// `/edit/:id`
    EditArticle(String),
}

impl Route {
    /// Match a full path (query and fragment ignored) against the table.
    pub fn parse(full_path: &str) -> Option<Route> {
        let path = full_path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Blog),
            ["article", id] => Some(Route::ArticleDetail(id.to_string())),
            ["my-blog"] => Some(Route::MyBlog),
            ["create"] => Some(Route::CreateArticle),
            ["edit", id] => Some(Route::EditArticle(id.to_string())),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Blog => "blog",
            Route::ArticleDetail(_) => "article-detail",
            Route::MyBlog => "my-blog",
            Route::CreateArticle => "create-article",
            Route::EditArticle(_) => "edit-article",
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::MyBlog | Route::CreateArticle | Route::EditArticle(_))
    }
}

/// Guard decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    /// Go to `path` instead, remembering the original target
    Redirect { path: String, redirect: String },
    /// Stay where we are
    Cancel,
}

impl Navigation {
    /// Redirect target rendered as a path with query string
    pub fn location(&self) -> Option<String> {
        match self {
            Navigation::Redirect { path, redirect } => Some(format!("{}?redirect={}", path, redirect)),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    session: SessionManager,
}

impl RouteGuard {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    /// Decide whether navigation to `full_path` may proceed.
    ///
    /// Protected targets require an authenticated session; otherwise the
    /// login prompt is opened and the caller is sent home.
    pub fn before_navigate(&self, full_path: &str) -> Navigation {
        let requires_auth = Route::parse(full_path).is_some_and(|route| route.requires_auth());
        if !requires_auth || self.session.is_authenticated() {
            return Navigation::Proceed;
        }

        tracing::debug!(target_path = full_path, "Protected route requires login");
        self.session.open_login();

        if full_path == "/" {
            Navigation::Cancel
        } else {
            Navigation::Redirect {
                path: "/".to_string(),
                redirect: full_path.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_table() {
        assert_eq!(Route::parse("/"), Some(Route::Blog));
        assert_eq!(Route::parse("/article/12"), Some(Route::ArticleDetail("12".to_string())));
        assert_eq!(Route::parse("/my-blog?tab=drafts"), Some(Route::MyBlog));
        assert_eq!(Route::parse("/edit/3/"), Some(Route::EditArticle("3".to_string())));
        assert_eq!(Route::parse("/unknown"), None);
    }

    #[test]
    fn test_protected_routes() {
        assert!(Route::CreateArticle.requires_auth());
        assert!(Route::EditArticle("1".to_string()).requires_auth());
        assert!(Route::MyBlog.requires_auth());
        assert!(!Route::Blog.requires_auth());
        assert!(!Route::ArticleDetail("1".to_string()).requires_auth());
    }

    #[test]
    fn test_redirect_location() {
        let nav = Navigation::Redirect {
            path: "/".to_string(),
            redirect: "/create".to_string(),
        };
        assert_eq!(nav.location().as_deref(), Some("/?redirect=/create"));
        assert_eq!(Navigation::Proceed.location(), None);
    }
}
