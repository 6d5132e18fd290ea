//! In-memory integration tests for identity resolution.

use rstest::rstest;
use taskkeeper::task::services::CreateTaskRequest;
use taskkeeper::user::domain::UserId;

use super::helpers::{Managers, managers};

#[rstest]
fn chat_user_adopts_legacy_tasks(managers: Managers) -> eyre::Result<()> {
    managers.tasks.create(CreateTaskRequest::new("old one"))?;
    managers.tasks.create(CreateTaskRequest::new("old two"))?;

    let user = managers.users.get_or_create_by_chat_id(4242)?;
    let moved = managers.tasks.reassign_owner(UserId::LEGACY, user.id())?;

    eyre::ensure!(moved == 2, "expected two tasks moved, got {moved}");
    eyre::ensure!(managers.tasks.get_all_for_user(user.id())?.len() == 2, "tasks not adopted");
    eyre::ensure!(
        managers.tasks.get_all_for_user(UserId::LEGACY)?.is_empty(),
        "legacy owner still has tasks"
    );
    Ok(())
}

#[rstest]
fn device_and_chat_identities_resolve_to_distinct_users(managers: Managers) -> eyre::Result<()> {
    let web = managers.users.get_or_create_by_device_id("browser-7")?;
    let chat = managers.users.get_or_create_by_chat_id(7)?;

    eyre::ensure!(web.id() != chat.id(), "identities must not merge");
    eyre::ensure!(
        managers.users.get_or_create_by_device_id("telegram_7")?.id() == chat.id(),
        "chat users are reachable by their derived device id"
    );
    Ok(())
}
