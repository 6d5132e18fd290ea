//! `SQLite` integration tests for user persistence.

use chrono::{DateTime, Duration};
use rstest::rstest;
use taskkeeper::user::{
    domain::{ChatId, LEGACY_DEVICE_ID, PersistedUserData, User, UserId},
    ports::UserRepositoryError,
    services::UserServiceError,
};

use super::helpers::{TestDatabase, db};

#[rstest]
fn legacy_user_is_seeded(db: TestDatabase) -> eyre::Result<()> {
    let legacy = db.users.get_by_id(UserId::LEGACY)?;
    eyre::ensure!(legacy.device_id().as_str() == LEGACY_DEVICE_ID, "unexpected legacy device id");

    let first_real = db.users.get_or_create_by_device_id("tablet")?;
    eyre::ensure!(first_real.id() == UserId::new(2), "first real user should be id 2");
    Ok(())
}

#[rstest]
fn get_or_create_is_idempotent_for_both_identities(db: TestDatabase) -> eyre::Result<()> {
    let by_device = db.users.get_or_create_by_device_id("tablet")?;
    eyre::ensure!(db.users.get_or_create_by_device_id("tablet")? == by_device, "device duplicated");

    let by_chat = db.users.get_or_create_by_chat_id(-500)?;
    eyre::ensure!(db.users.get_or_create_by_chat_id(-500)? == by_chat, "chat duplicated");
    eyre::ensure!(by_chat.device_id().as_str() == "telegram_-500", "derived device id");
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn unique_violations_map_to_the_colliding_identity(db: TestDatabase) -> eyre::Result<()> {
    db.users.create_user("dev-a", Some(10))?;

    assert!(matches!(
        db.users.create_user("dev-a", Some(11)),
        Err(UserServiceError::Conflict(UserRepositoryError::DuplicateDeviceId(_)))
    ));
    assert!(matches!(
        db.users.create_user("dev-b", Some(10)),
        Err(UserServiceError::Conflict(UserRepositoryError::DuplicateChatId(id))) if id.value() == 10
    ));
    Ok(())
}

#[rstest]
fn update_and_push_token_round_trip(db: TestDatabase) -> eyre::Result<()> {
    let mut user = db.users.get_or_create_by_device_id("web")?;
    user.set_chat_id(Some(ChatId::new(99)?));
    db.users.update(&user)?;
    db.users.set_push_token(user.id(), Some("push-1"))?;

    let stored = db.users.find_by_chat_id(99)?.ok_or_else(|| eyre::eyre!("chat link lost"))?;
    eyre::ensure!(stored.id() == user.id(), "wrong user linked");
    eyre::ensure!(stored.push_token() == Some("push-1"), "push token lost");
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn update_of_unknown_user_is_not_found(db: TestDatabase) -> eyre::Result<()> {
    let user = db.users.get_or_create_by_device_id("ghost")?;
    db.users.set_push_token(user.id(), None)?;
    assert!(matches!(
        db.users.set_push_token(UserId::new(999), Some("t")),
        Err(UserServiceError::NotFound(_))
    ));
    Ok(())
}

#[rstest]
fn update_keeps_stored_creation_time(db: TestDatabase) -> eyre::Result<()> {
    let original = db.users.get_or_create_by_device_id("laptop")?;
    db.clock.advance(Duration::minutes(3));
    let backdated = User::from_persisted(PersistedUserData {
        id: original.id(),
        device_id: original.device_id().clone(),
        chat_id: None,
        push_token: Some("token".to_owned()),
        created_at: DateTime::UNIX_EPOCH,
        updated_at: DateTime::UNIX_EPOCH,
    });

    let returned = db.users.update(&backdated)?;
    let stored = db.users.get_by_id(original.id())?;

    eyre::ensure!(returned.created_at() == original.created_at(), "returned creation time changed");
    eyre::ensure!(stored.created_at() == original.created_at(), "stored creation time changed");
    eyre::ensure!(stored.push_token() == Some("token"), "push token not updated");
    Ok(())
}
