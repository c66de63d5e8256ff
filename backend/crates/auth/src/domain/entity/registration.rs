//! Registration
//!
//! A validated sign-up request. Display name and role travel to the backend
//! as user metadata; the backend creates the profile row from them.

use platform::password::ClearTextPassword;

use crate::domain::value_object::{display_name::DisplayName, email::Email, user_role::UserRole};

#[derive(Debug)]
pub struct Registration {
    pub email: Email,
    pub password: ClearTextPassword,
    pub display_name: DisplayName,
    pub role: UserRole,
}
