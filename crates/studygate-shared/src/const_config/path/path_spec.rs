use std::borrow::Cow;

use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: Cow<'static, str>,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::POST,
        }
    }

    /// Delete paths include ids so they are built at runtime
    pub fn delete(path: String) -> Self {
        Self {
            path: Cow::Owned(path),
            method: Method::DELETE,
        }
    }
}
