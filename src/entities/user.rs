use serde::{Deserialize, Serialize};

use super::nullable::{from_nullable, id_from_db, id_to_db, to_nullable};
use crate::db::models::{NewUserRow, UserRow};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub path_ava: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub number_phone: String,
    pub rating: f32,
    pub verification_status: String,
    pub role: UserRole,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: id_from_db(row.id),
            path_ava: from_nullable(row.path_ava),
            username: from_nullable(row.username),
            firstname: from_nullable(row.firstname),
            lastname: from_nullable(row.lastname),
            number_phone: from_nullable(row.number_phone),
            rating: row.rating,
            verification_status: row.verification_status,
            role: UserRole {
                id: u32::try_from(row.role_id).unwrap_or_default(),
                name: row.role_name,
            },
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: id_to_db(user.id),
            path_ava: to_nullable(&user.path_ava),
            username: to_nullable(&user.username),
            firstname: to_nullable(&user.firstname),
            lastname: to_nullable(&user.lastname),
            number_phone: to_nullable(&user.number_phone),
            rating: user.rating,
            verification_status: user.verification_status.clone(),
            role_id: i32::try_from(user.role.id).unwrap_or(i32::MAX),
            role_name: user.role.name.clone(),
        }
    }
}

/// Registration candidate as submitted by a client.
///
/// `id` is optional: when present it is checked for collisions and inserted
/// verbatim, otherwise the database assigns one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub id: Option<u64>,
    #[serde(alias = "avatar")]
    pub path_ava: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(alias = "phone")]
    pub number_phone: String,
}

impl NewUser {
    /// The stored user this candidate becomes once the insert assigned `id`.
    pub fn into_user(self, id: u64) -> User {
        User {
            id,
            path_ava: self.path_ava,
            username: self.username,
            firstname: self.firstname,
            lastname: self.lastname,
            number_phone: self.number_phone,
            ..User::default()
        }
    }
}

impl From<&NewUser> for NewUserRow {
    fn from(user: &NewUser) -> Self {
        Self {
            id: user.id.map(id_to_db),
            path_ava: to_nullable(&user.path_ava),
            username: to_nullable(&user.username),
            firstname: to_nullable(&user.firstname),
            lastname: to_nullable(&user.lastname),
            number_phone: to_nullable(&user.number_phone),
        }
    }
}
