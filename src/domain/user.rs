use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
}

/// The identity a request acts on behalf of.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        CurrentUser {
            id: user.id,
            email: user.email,
        }
    }
}

/// Stand-in identity used until real sign-in exists.
#[derive(Debug, Clone)]
pub struct SentinelIdentity {
    pub email: String,
    pub name: String,
}

impl Default for SentinelIdentity {
    fn default() -> Self {
        SentinelIdentity {
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
        }
    }
}
