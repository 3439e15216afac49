//! User DTOs

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::{User, UserStatus};

/// User API representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Store-assigned id
    #[schema(read_only)]
    pub id: i32,
    #[schema(example = "Ivan")]
    pub first_name: String,
    #[schema(example = "Horvat")]
    pub last_name: String,
    #[schema(example = "05552352140")]
    pub oib: String,
    /// `0` = INACTIVE, `1` = ACTIVE
    #[schema(example = "1")]
    pub status: String,
    /// Last generated export file, if any
    pub file_name: Option<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            oib: u.oib,
            status: u.status,
            file_name: u.file_name,
        }
    }
}

/// Create user request
///
/// Fields are optional on the wire so that a missing or `null` field is
/// reported as "required" in the field map instead of failing to parse.
/// Any `id` or `fileName` in the body is ignored; new users are always
/// inserted without an export file.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(
        required(message = "First name is required!"),
        length(min = 1, message = "First name can not be empty!"),
        custom(function = "no_whitespace")
    )]
    #[schema(required = true, example = "Ivan")]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last name is required!"),
        length(min = 1, message = "Last name can not be empty!"),
        custom(function = "no_whitespace")
    )]
    #[schema(required = true, example = "Horvat")]
    pub last_name: Option<String>,

    /// Shape and checksum are checked by the handler, not here.
    #[validate(required(message = "OIB is required!"))]
    #[schema(required = true, example = "05552352140")]
    pub oib: Option<String>,

    #[validate(
        required(message = "Status is required!"),
        custom(function = "status_code")
    )]
    #[schema(required = true, example = "1")]
    pub status: Option<String>,
}

impl CreateUserRequest {
    pub fn into_user(self) -> User {
        User::new(
            self.first_name.unwrap_or_default(),
            self.last_name.unwrap_or_default(),
            self.oib.unwrap_or_default(),
            self.status.unwrap_or_default(),
        )
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Names are a single token of non-whitespace characters, where whitespace
/// is the ASCII set `[ \t\n\x0B\f\r]`. Empty values are reported by the
/// length rule.
fn no_whitespace(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_ascii_whitespace() || c == '\x0B') {
        return Err(field_error("pattern", "Incorrect input!"));
    }
    Ok(())
}

fn status_code(value: &str) -> Result<(), ValidationError> {
    if UserStatus::from_code(value).is_none() {
        return Err(field_error(
            "status",
            "Status can only have values 0  = INACTIVE or 1 = ACTIVE",
        ));
    }
    Ok(())
}
