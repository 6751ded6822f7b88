//! Users
//!
//! Customer accounts are owned elsewhere; carts and orders only hold the
//! account identifier.

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// User Record
#[derive(Debug, Clone, Copy)]
pub struct UserRecord;
