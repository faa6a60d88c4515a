//! API request models

pub mod asset;
pub mod org;
pub mod user;

pub use asset::*;
pub use org::*;
pub use user::*;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// (limit, offset) with a default page size of 20, capped at 100.
    pub fn window(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        let offset = (self.page.unwrap_or(1).max(1) - 1) * limit;
        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults() {
        let q = ListQuery { page: None, limit: None };
        assert_eq!(q.window(), (20, 0));
    }

    #[test]
    fn test_window_caps_limit_and_floors_page() {
        let q = ListQuery { page: Some(0), limit: Some(5000) };
        assert_eq!(q.window(), (100, 0));
        let q = ListQuery { page: Some(3), limit: Some(10) };
        assert_eq!(q.window(), (10, 20));
    }
}
