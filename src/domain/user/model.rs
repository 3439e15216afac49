//! User domain entity

use std::fmt;

/// Id of a user that has not been stored yet. Saving a user with this id
/// always inserts a new record.
pub const UNSET_ID: i32 = 0;

/// User status, stored as a one-character code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Inactive,
    Active,
}

impl UserStatus {
    /// Stored code: `"0"` or `"1"`
    pub fn code(&self) -> &'static str {
        match self {
            Self::Inactive => "0",
            Self::Active => "1",
        }
    }

    /// Display label used in export files
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inactive => "INACTIVE",
            Self::Active => "ACTIVE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::Inactive),
            "1" => Some(Self::Active),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered user, identified by OIB
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Surrogate key assigned by the store
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Business key, 11 digits
    pub oib: String,
    /// Status code, see [`UserStatus`]
    pub status: String,
    /// Name of the last generated export file
    pub file_name: Option<String>,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        oib: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: UNSET_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            oib: oib.into(),
            status: status.into(),
            file_name: None,
        }
    }

    /// `true` until the store has assigned an id
    pub fn is_new(&self) -> bool {
        self.id == UNSET_ID
    }

    /// Parsed status, `None` when the stored code is unknown
    pub fn user_status(&self) -> Option<UserStatus> {
        UserStatus::from_code(&self.status)
    }

    /// The generated export file, if one exists and blocks regeneration
    pub fn active_file(&self) -> Option<&str> {
        self.file_name.as_deref().filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new("Darko", "Kozul", "17748241351", "0")
    }

    #[test]
    fn new_user_is_unsaved() {
        let user = sample_user();
        assert!(user.is_new());
        assert_eq!(user.id, UNSET_ID);
        assert_eq!(user.file_name, None);
    }

    #[test]
    fn status_codes_map_to_labels() {
        assert_eq!(UserStatus::from_code("0"), Some(UserStatus::Inactive));
        assert_eq!(UserStatus::from_code("1"), Some(UserStatus::Active));
        assert_eq!(UserStatus::from_code("2"), None);
        assert_eq!(UserStatus::from_code(""), None);
        assert_eq!(UserStatus::Active.to_string(), "ACTIVE");
        assert_eq!(UserStatus::Inactive.code(), "0");
    }

    #[test]
    fn empty_file_name_does_not_block_export() {
        let mut user = sample_user();
        assert_eq!(user.active_file(), None);

        user.file_name = Some(String::new());
        assert_eq!(user.active_file(), None);

        user.file_name = Some("existingFile.txt".into());
        assert_eq!(user.active_file(), Some("existingFile.txt"));
    }
}
