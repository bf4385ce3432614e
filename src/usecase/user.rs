use super::Usecase;
use crate::db::models::NewUserRow;
use crate::entities::{NewUser, User};
use crate::error::{StoreError, UniqueField};

/// Outcome of a registration attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CreateUserResult {
    Success(User),
    IdExists,
    PhoneInUse,
    UsernameInUse,
    StorageFailure,
}

impl CreateUserResult {
    /// Wire status: 0 id exists, 1 phone in use, 2 username in use,
    /// 3 storage failure, 4 success.
    pub fn status(&self) -> u8 {
        match self {
            CreateUserResult::IdExists => 0,
            CreateUserResult::PhoneInUse => 1,
            CreateUserResult::UsernameInUse => 2,
            CreateUserResult::StorageFailure => 3,
            CreateUserResult::Success(_) => 4,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CreateUserResult::IdExists => "user already exists",
            CreateUserResult::PhoneInUse => "number phone is already in use",
            CreateUserResult::UsernameInUse => "username is already in use",
            CreateUserResult::StorageFailure => "cannot create user",
            CreateUserResult::Success(_) => "user created successfully",
        }
    }
}

impl From<UniqueField> for CreateUserResult {
    fn from(field: UniqueField) -> Self {
        match field {
            UniqueField::Id => CreateUserResult::IdExists,
            UniqueField::Phone => CreateUserResult::PhoneInUse,
            UniqueField::Username => CreateUserResult::UsernameInUse,
        }
    }
}

impl Usecase {
    /// Precondition chain (id, phone, username) followed by the insert.
    ///
    /// The checks only produce the friendlier early answer; the unique
    /// constraints on `users` still decide when two registrations race.
    #[tracing::instrument(skip(self, candidate), fields(id = ?candidate.id))]
    pub async fn create_user(&self, candidate: NewUser) -> CreateUserResult {
        if let Some(id) = candidate.id {
            match self.repo.user_exists(id).await {
                Ok(false) => {}
                Ok(true) => return CreateUserResult::IdExists,
                Err(e) => {
                    tracing::error!(error = %e, "create user: id check failed");
                    return CreateUserResult::StorageFailure;
                }
            }
        }

        if !candidate.number_phone.is_empty() {
            match self.repo.phone_in_use(&candidate.number_phone).await {
                Ok(false) => {}
                Ok(true) => return CreateUserResult::PhoneInUse,
                Err(e) => {
                    tracing::error!(error = %e, "create user: phone check failed");
                    return CreateUserResult::StorageFailure;
                }
            }
        }

        if !candidate.username.is_empty() {
            match self.repo.username_in_use(&candidate.username).await {
                Ok(false) => {}
                Ok(true) => return CreateUserResult::UsernameInUse,
                Err(e) => {
                    tracing::error!(error = %e, "create user: username check failed");
                    return CreateUserResult::StorageFailure;
                }
            }
        }

        let row = NewUserRow::from(&candidate);
        match self.repo.insert_user(&row).await {
            Ok(id) => {
                tracing::info!(user_id = id, "user created");
                CreateUserResult::Success(candidate.into_user(id))
            }
            Err(StoreError::ConstraintViolation(field)) => CreateUserResult::from(field),
            Err(e) => {
                tracing::error!(error = %e, "create user: insert failed");
                CreateUserResult::StorageFailure
            }
        }
    }
}
