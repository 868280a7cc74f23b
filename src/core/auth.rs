//! Authentication and user accounts.
//!
//! Passwords are hashed with Argon2 and a random salt; only the PHC string is
//! stored. A failed login is always [`Error::InvalidCredentials`], whether the
//! username is unknown or the password wrong.
//!
//! On first start [`ensure_default_admin`] creates the account
//! `admin` / `admin123` if no administrator exists. That password is public
//! knowledge and must be changed after installation.

use crate::{
    core::resident,
    entities::{Role, User, user},
    errors::{Error, Result},
    session::Session,
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, SqlErr, prelude::*};
use tracing::{info, instrument, warn};

/// Username of the account created on first start
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Password of the account created on first start; change it after installation
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Hashes `password` with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String> {
    Argon2::default()
        .hash_password(password.as_bytes(), &SaltString::generate(&mut OsRng))
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            Error::PasswordHash(e.to_string())
        })
}

/// Checks `password` against a stored PHC string. A malformed hash never matches.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Verifies a login attempt and opens a session.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Session> {
    if username.is_empty() || password.is_empty() {
        return Err(Error::InvalidCredentials);
    }

    let account = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    match account {
        Some(account) if verify_password(password, &account.password_hash) => {
            info!("User '{}' logged in as {:?}", account.username, account.role);
            Ok(Session::new(account.username, account.role))
        }
        _ => {
            warn!("Failed login attempt");
            Err(Error::InvalidCredentials)
        }
    }
}

async fn administrator_count(db: &DatabaseConnection) -> Result<u64> {
    User::find()
        .filter(user::Column::Role.eq(Role::Administrator))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Creates the default administrator unless an administrator already exists.
///
/// Returns whether the account was created. Running it again is harmless.
pub async fn ensure_default_admin(db: &DatabaseConnection) -> Result<bool> {
    if administrator_count(db).await? > 0 {
        return Ok(false);
    }

    user::ActiveModel {
        username: Set(DEFAULT_ADMIN_USERNAME.to_string()),
        password_hash: Set(hash_password(DEFAULT_ADMIN_PASSWORD)?),
        role: Set(Role::Administrator),
        resident_id: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    warn!(
        "Default administrator '{}' created with the default password; change it now",
        DEFAULT_ADMIN_USERNAME
    );
    Ok(true)
}

fn validate_credentials(username: &str, password: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("username", "cannot be empty"));
    }
    if password.is_empty() {
        return Err(Error::validation("password", "cannot be empty"));
    }
    Ok(username.to_string())
}

/// Adds a login account. Administrators only.
///
/// A resident account may be linked to the resident it belongs to.
pub async fn create_user(
    db: &DatabaseConnection,
    session: &Session,
    username: &str,
    password: &str,
    role: Role,
    resident_id: Option<i64>,
) -> Result<user::Model> {
    session.require_administrator()?;
    let username = validate_credentials(username, password)?;

    if let Some(id) = resident_id {
        if resident::get_resident_by_id(db, id).await?.is_none() {
            return Err(Error::NotFound {
                entity: "Resident",
                id,
            });
        }
    }

    let created = user::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(hash_password(password)?),
        role: Set(role),
        resident_id: Set(resident_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateUsername {
            username: username.clone(),
        },
        _ => e.into(),
    })?;

    info!("User '{}' created with role {:?}", created.username, created.role);
    Ok(created)
}

/// Sets a new password.
///
/// Users may change their own password; changing someone else's needs an
/// administrator.
pub async fn change_password(
    db: &DatabaseConnection,
    session: &Session,
    username: &str,
    new_password: &str,
) -> Result<()> {
    if session.username() != username {
        session.require_administrator()?;
    }
    validate_credentials(username, new_password)?;

    let account = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| Error::validation("username", format!("'{username}' does not exist")))?;

    let mut account: user::ActiveModel = account.into();
    account.password_hash = Set(hash_password(new_password)?);
    account.update(db).await?;

    info!("Password changed for '{}'", username);
    Ok(())
}

/// All accounts, ordered by username. Administrators only.
pub async fn list_users(db: &DatabaseConnection, session: &Session) -> Result<Vec<user::Model>> {
    session.require_administrator()?;
    User::find()
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes an account. Administrators only; the last administrator stays.
pub async fn delete_user(db: &DatabaseConnection, session: &Session, user_id: i64) -> Result<()> {
    session.require_administrator()?;

    let account = User::find_by_id(user_id).one(db).await?.ok_or(Error::NotFound {
        entity: "User",
        id: user_id,
    })?;

    if account.role == Role::Administrator && administrator_count(db).await? <= 1 {
        return Err(Error::LastAdministrator);
    }

    account.delete(db).await?;
    info!("User {} deleted", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("s3cret"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("S3cret", &hash));
        assert!(!verify_password("s3cret", "not a hash"));

        // Salted: the same password never hashes the same way twice
        assert_ne!(hash, hash_password("s3cret").unwrap());
    }

    #[tokio::test]
    async fn test_default_admin_can_log_in() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(ensure_default_admin(&db).await?);

        let session = authenticate(&db, "admin", "admin123").await?;
        assert_eq!(session.username(), "admin");
        assert_eq!(session.role(), Role::Administrator);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_logins_are_indistinguishable() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_default_admin(&db).await?;

        let wrong_password = authenticate(&db, "admin", "wrong").await.unwrap_err();
        let unknown_user = authenticate(&db, "ghost", "x").await.unwrap_err();
        assert!(matches!(wrong_password, Error::InvalidCredentials));
        assert!(matches!(unknown_user, Error::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());

        assert!(matches!(
            authenticate(&db, "", "").await.unwrap_err(),
            Error::InvalidCredentials
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_default_admin_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(ensure_default_admin(&db).await?);
        assert!(!ensure_default_admin(&db).await?);
        assert_eq!(administrator_count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_default_admin_skipped_when_admin_exists() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_session();
        create_user(&db, &admin, "yonetici", "pw", Role::Administrator, None).await?;

        assert!(!ensure_default_admin(&db).await?);
        assert!(matches!(
            authenticate(&db, "admin", "admin123").await.unwrap_err(),
            Error::InvalidCredentials
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_requires_administrator() -> Result<()> {
        let db = setup_test_db().await?;
        let resident_session = Session::new("daire1".to_string(), Role::Resident);

        let result = create_user(&db, &resident_session, "x", "y", Role::Resident, None).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden));
        assert!(matches!(
            list_users(&db, &resident_session).await.unwrap_err(),
            Error::Forbidden
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_resident_user_and_log_in() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_session();
        let resident = create_test_resident(&db, 7).await?;

        let account = create_user(&db, &admin, "daire7", "pw7", Role::Resident, Some(resident.id))
            .await?;
        assert_eq!(account.resident_id, Some(resident.id));
        assert_ne!(account.password_hash, "pw7");

        let session = authenticate(&db, "daire7", "pw7").await?;
        assert!(!session.is_administrator());

        let duplicate = create_user(&db, &admin, "daire7", "other", Role::Resident, None).await;
        assert!(matches!(
            duplicate.unwrap_err(),
            Error::DuplicateUsername { .. }
        ));

        let unknown_resident =
            create_user(&db, &admin, "daire8", "pw", Role::Resident, Some(99)).await;
        assert!(matches!(
            unknown_resident.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_change_password() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_default_admin(&db).await?;
        let admin = authenticate(&db, "admin", "admin123").await?;
        create_user(&db, &admin, "daire3", "old", Role::Resident, None).await?;

        let resident = authenticate(&db, "daire3", "old").await?;
        change_password(&db, &resident, "daire3", "new").await?;
        assert!(authenticate(&db, "daire3", "old").await.is_err());
        authenticate(&db, "daire3", "new").await?;

        // Residents cannot change other people's passwords
        assert!(matches!(
            change_password(&db, &resident, "admin", "hijack")
                .await
                .unwrap_err(),
            Error::Forbidden
        ));

        change_password(&db, &admin, "admin", "changed").await?;
        authenticate(&db, "admin", "changed").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_keeps_last_administrator() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_default_admin(&db).await?;
        let admin = authenticate(&db, "admin", "admin123").await?;
        let resident_user = create_user(&db, &admin, "daire1", "pw", Role::Resident, None).await?;

        let default_admin = list_users(&db, &admin)
            .await?
            .into_iter()
            .find(|u| u.username == "admin")
            .unwrap();
        assert!(matches!(
            delete_user(&db, &admin, default_admin.id).await.unwrap_err(),
            Error::LastAdministrator
        ));

        delete_user(&db, &admin, resident_user.id).await?;
        let second_admin =
            create_user(&db, &admin, "yonetici2", "pw", Role::Administrator, None).await?;
        delete_user(&db, &admin, default_admin.id).await?;

        let remaining: Vec<String> = list_users(&db, &admin)
            .await?
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(remaining, vec![second_admin.username]);
        Ok(())
    }
}
