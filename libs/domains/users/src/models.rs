use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page returned when `page` is missing or unusable
pub const DEFAULT_PAGE: u64 = 1;
/// Page size returned when `limit` is missing or unusable
pub const DEFAULT_LIMIT: u64 = 5;
/// Largest page size a client may request
pub const MAX_LIMIT: u64 = 100;

/// User entity as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier (24-char hex ObjectId, stored as _id in MongoDB)
    #[serde(rename = "_id")]
    #[schema(example = "665f1c2ab9d4e3a1f0c1d2e3")]
    pub id: String,
    /// Display name, trimmed
    pub name: String,
    /// Age in years
    pub age: i64,
    /// Lowercased, trimmed, unique email address
    pub email: String,
    /// Free-form postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl User {
    /// Apply a validated partial update
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(address) = changes.address {
            self.address = Some(address);
        }
    }
}

/// Body of `POST /users`
///
/// Every field is optional at the JSON level so that a missing field is
/// reported by validation rather than as a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "Jon")]
    pub name: Option<String>,
    #[schema(example = 30)]
    pub age: Option<i64>,
    #[schema(example = "jon@example.com")]
    pub email: Option<String>,
    #[schema(example = "12 Main Street")]
    pub address: Option<String>,
}

/// Body of `PUT /users/{id}`; absent or null fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// A normalized user that passed validation and is ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
    pub email: String,
    pub address: Option<String>,
}

/// A normalized partial update that passed validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.email.is_none() && self.address.is_none()
    }
}

/// Raw query string of `GET /users`
///
/// Kept as strings: numbers are parsed leniently by [`Pagination::from_query`].
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 1-based page number (default 1)
    #[param(value_type = Option<u64>, example = 1)]
    pub page: Option<String>,
    /// Page size, clamped to 1..=100 (default 5)
    #[param(value_type = Option<u64>, example = 5)]
    pub limit: Option<String>,
    /// Case-insensitive text matched against name, email and address
    pub search: Option<String>,
}

/// Normalized listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
}

impl Pagination {
    pub fn from_query(query: &ListUsersQuery) -> Self {
        let page = match parse_leading_int(query.page.as_deref()) {
            Some(n) if n != 0 => n.max(1).unsigned_abs(),
            _ => DEFAULT_PAGE,
        };

        let limit = match parse_leading_int(query.limit.as_deref()) {
            Some(n) if n != 0 => n.clamp(1, MAX_LIMIT as i64).unsigned_abs(),
            _ => DEFAULT_LIMIT,
        };

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            page,
            limit,
            search,
        }
    }

    /// Number of matching documents before this page, capped at what MongoDB accepts
    pub fn skip(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    pub fn filter(&self) -> UserFilter {
        UserFilter {
            search: self.search.clone(),
            skip: self.skip(),
            limit: self.limit,
        }
    }
}

/// Parse the leading decimal integer of `raw`, ignoring trailing garbage
/// (`"12abc"` → 12). Leading whitespace and one sign are accepted; values
/// beyond `i64` saturate.
fn parse_leading_int(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = &digits[..digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len())];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}

/// What the repository needs to select users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Trimmed, non-empty search text
    pub search: Option<String>,
    pub skip: u64,
    pub limit: u64,
}

impl UserFilter {
    /// Case-insensitive substring match over name, email and address
    pub fn matches(&self, user: &User) -> bool {
        let Some(search) = self.search.as_deref() else {
            return true;
        };
        let needle = search.to_lowercase();

        [Some(user.name.as_str()), Some(user.email.as_str()), user.address.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Response of `GET /users`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub page: u64,
    pub limit: u64,
    /// Matching users across all pages
    pub total: u64,
    /// `ceil(total / limit)`
    pub total_pages: u64,
    pub data: Vec<User>,
}

impl UserPage {
    pub fn new(pagination: &Pagination, total: u64, data: Vec<User>) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: total.div_ceil(pagination.limit),
            data,
        }
    }
}

/// `{message, data}` returned by create and update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub data: User,
}

/// `{message}` returned by delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User deleted successfully")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>, search: Option<&str>) -> ListUsersQuery {
        ListUsersQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            search: search.map(str::to_string),
        }
    }

    fn user(name: &str, email: &str, address: Option<&str>) -> User {
        User {
            id: "665f1c2ab9d4e3a1f0c1d2e3".to_string(),
            name: name.to_string(),
            age: 30,
            email: email.to_string(),
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::from_query(&ListUsersQuery::default());
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 5);
        assert_eq!(p.search, None);
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn test_pagination_clamps_limit() {
        assert_eq!(Pagination::from_query(&query(None, Some("500"), None)).limit, 100);
        assert_eq!(Pagination::from_query(&query(None, Some("-3"), None)).limit, 1);
        assert_eq!(Pagination::from_query(&query(None, Some("100"), None)).limit, 100);
    }

    #[test]
    fn test_pagination_zero_and_garbage_fall_back_to_defaults() {
        let p = Pagination::from_query(&query(Some("0"), Some("0"), None));
        assert_eq!((p.page, p.limit), (1, 5));

        let p = Pagination::from_query(&query(Some("abc"), Some(""), None));
        assert_eq!((p.page, p.limit), (1, 5));
    }

    #[test]
    fn test_pagination_floors_negative_page() {
        assert_eq!(Pagination::from_query(&query(Some("-4"), None, None)).page, 1);
    }

    #[test]
    fn test_pagination_parses_leading_digits() {
        let p = Pagination::from_query(&query(Some(" 3abc"), Some("10.9"), None));
        assert_eq!((p.page, p.limit), (3, 10));
        assert_eq!(p.skip(), 20);
    }

    #[test]
    fn test_pagination_skip_saturates() {
        let p = Pagination::from_query(&query(Some("99999999999999999999999"), Some("100"), None));
        assert_eq!(p.skip(), i64::MAX as u64);
    }

    #[test]
    fn test_pagination_trims_search() {
        let p = Pagination::from_query(&query(None, None, Some("  jon ")));
        assert_eq!(p.search.as_deref(), Some("jon"));

        let p = Pagination::from_query(&query(None, None, Some("   ")));
        assert_eq!(p.search, None);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Pagination::from_query(&query(None, Some("5"), None));
        assert_eq!(UserPage::new(&p, 0, vec![]).total_pages, 0);
        assert_eq!(UserPage::new(&p, 5, vec![]).total_pages, 1);
        assert_eq!(UserPage::new(&p, 11, vec![]).total_pages, 3);
    }

    #[test]
    fn test_user_page_serializes_camel_case() {
        let p = Pagination::from_query(&ListUsersQuery::default());
        let json = serde_json::to_value(UserPage::new(&p, 7, vec![])).unwrap();
        assert_eq!(json["totalPages"], 2);
        assert!(json.get("total_pages").is_none());
    }

    #[test]
    fn test_filter_matches_any_field_case_insensitively() {
        let u = user("Jon Snow", "jon@wall.org", Some("Castle Black"));
        let filter = |s: &str| UserFilter {
            search: Some(s.to_string()),
            ..Default::default()
        };

        assert!(filter("SNOW").matches(&u));
        assert!(filter("wall.org").matches(&u));
        assert!(filter("black").matches(&u));
        assert!(!filter("winterfell").matches(&u));
        assert!(UserFilter::default().matches(&u));
    }

    #[test]
    fn test_filter_skips_missing_address() {
        let u = user("Arya", "arya@stark.org", None);
        let filter = UserFilter {
            search: Some("braavos".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&u));
    }

    #[test]
    fn test_user_serializes_id_as_underscore_id() {
        let json = serde_json::to_value(user("Jon", "jon@x.com", None)).unwrap();
        assert_eq!(json["_id"], "665f1c2ab9d4e3a1f0c1d2e3");
        assert!(json.get("address").is_none());
    }

    #[test]
    fn test_apply_changes_only_supplied_fields() {
        let mut u = user("Jon", "jon@x.com", Some("A"));
        u.apply(UserChanges {
            age: Some(31),
            address: Some("B".to_string()),
            ..Default::default()
        });
        assert_eq!(u.name, "Jon");
        assert_eq!(u.age, 31);
        assert_eq!(u.address.as_deref(), Some("B"));
    }
}
