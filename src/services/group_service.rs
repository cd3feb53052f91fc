use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::{DocumentEntity, GroupEntity},
    dto::{
        group::{CreateGroupRequest, GroupDetail, GroupSummary},
        validation::{validate_player_name, validate_player_names},
    },
    error::ServiceError,
    services::{credential_service, sse_events},
    state::SharedState,
};

/// Create a new group with a derived credential and an empty game list.
pub async fn create_group(
    state: &SharedState,
    request: CreateGroupRequest,
) -> Result<GroupSummary, ServiceError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "group name must not be empty".into(),
        ));
    }

    let player_names = normalize_roster(request.player_names)?;
    let credential = credential_service::derive(&request.password);

    let now = SystemTime::now();
    let group = GroupEntity {
        id: Uuid::new_v4(),
        name,
        password_hash: credential.hash,
        password_salt: Some(credential.salt),
        player_names,
        games: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    let summary = GroupSummary::from(&group);

    {
        let _gate = state.lock_document().await;
        let mut document = state.store().load().await?;
        document.groups.push(group);
        state.store().save(document).await?;
    }

    sse_events::broadcast_group_updated(state, &summary);
    Ok(summary)
}

/// List every group in insertion order, credential-free.
pub async fn list_groups(state: &SharedState) -> Result<Vec<GroupSummary>, ServiceError> {
    let document = state.store().load().await?;
    Ok(document.groups.iter().map(GroupSummary::from).collect())
}

/// Fetch one group with its full game history.
pub async fn get_group(state: &SharedState, id: Uuid) -> Result<GroupDetail, ServiceError> {
    let document = state.store().load().await?;
    document
        .groups
        .iter()
        .find(|group| group.id == id)
        .map(GroupDetail::from)
        .ok_or_else(|| ServiceError::NotFound(format!("group `{id}` not found")))
}

/// Delete a group and every game nested inside it.
pub async fn delete_group(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let summary;
    {
        let _gate = state.lock_document().await;
        let mut document = state.store().load().await?;
        let Some(index) = document.groups.iter().position(|group| group.id == id) else {
            return Err(ServiceError::NotFound(format!("group `{id}` not found")));
        };
        let removed = document.groups.remove(index);
        summary = GroupSummary::from(&removed);
        state.store().save(document).await?;
    }

    sse_events::broadcast_group_updated(state, &summary);
    Ok(())
}

/// Append one player to a group roster.
pub async fn add_player(
    state: &SharedState,
    group_id: Uuid,
    player_name: &str,
) -> Result<GroupSummary, ServiceError> {
    let name = player_name.trim().to_string();
    validate_player_name(&name)
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let summary;
    {
        let _gate = state.lock_document().await;
        let mut document = state.store().load().await?;
        let group = find_group_mut(&mut document, group_id)?;

        if group.player_names.iter().any(|existing| *existing == name) {
            return Err(ServiceError::InvalidInput(format!(
                "player `{name}` is already in the roster"
            )));
        }

        group.player_names.push(name);
        group.updated_at = SystemTime::now();
        summary = GroupSummary::from(&*group);
        state.store().save(document).await?;
    }

    sse_events::broadcast_group_updated(state, &summary);
    Ok(summary)
}

/// Check a candidate password against a group credential.
///
/// An unknown group id is reported as a plain verification failure so the
/// endpoint does not reveal which groups exist.
pub async fn verify_group_password(
    state: &SharedState,
    group_id: Uuid,
    password: &str,
) -> Result<bool, ServiceError> {
    let document = state.store().load().await?;
    let Some(group) = document.groups.iter().find(|group| group.id == group_id) else {
        return Ok(false);
    };
    let Some(salt) = group.password_salt.as_deref() else {
        // Pre-migration record; the startup migration should have rewritten
        // it, so refuse rather than compare against plaintext.
        return Ok(false);
    };

    Ok(credential_service::verify(
        password,
        &group.password_hash,
        salt,
    ))
}

/// Trim and check an incoming roster, rejecting duplicates.
fn normalize_roster(names: Vec<String>) -> Result<Vec<String>, ServiceError> {
    let names: Vec<String> = names.into_iter().map(|name| name.trim().to_string()).collect();
    validate_player_names(&names).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let mut seen = std::collections::HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate player `{name}` in roster"
            )));
        }
    }

    Ok(names)
}

pub(crate) fn find_group_mut(
    document: &mut DocumentEntity,
    group_id: Uuid,
) -> Result<&mut GroupEntity, ServiceError> {
    document
        .groups
        .iter_mut()
        .find(|group| group.id == group_id)
        .ok_or_else(|| ServiceError::NotFound(format!("group `{group_id}` not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dao::document_store::memory::MemoryStore, state::AppState};
    use std::sync::Arc;

    fn test_state() -> SharedState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            AppConfig::with_values("unused", false),
        )
    }

    fn create_request(names: &[&str]) -> CreateGroupRequest {
        CreateGroupRequest {
            name: "Thursday crew".into(),
            password: "secret".into(),
            player_names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_list_get_delete_roundtrip() {
        let state = test_state();
        let summary = create_group(&state, create_request(&["Alice", "Bob"]))
            .await
            .unwrap();

        let listed = list_groups(&state).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, summary.id);

        let detail = get_group(&state, summary.id).await.unwrap();
        assert_eq!(detail.summary.player_names, vec!["Alice", "Bob"]);
        assert!(detail.games.is_empty());

        delete_group(&state, summary.id).await.unwrap();
        assert!(matches!(
            get_group(&state, summary.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_group_rejects_small_or_duplicate_roster() {
        let state = test_state();
        assert!(matches!(
            create_group(&state, create_request(&["Alice"])).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            create_group(&state, create_request(&["Alice", "Alice"])).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn add_player_extends_roster_and_rejects_duplicates() {
        let state = test_state();
        let group = create_group(&state, create_request(&["Alice", "Bob"]))
            .await
            .unwrap();

        let updated = add_player(&state, group.id, "  Carol ").await.unwrap();
        assert_eq!(updated.player_names, vec!["Alice", "Bob", "Carol"]);

        assert!(matches!(
            add_player(&state, group.id, "Carol").await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            add_player(&state, group.id, "   ").await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            add_player(&state, group.id, &"x".repeat(51)).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            add_player(&state, Uuid::new_v4(), "Dave").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn password_verification_matches_only_the_right_password() {
        let state = test_state();
        let group = create_group(&state, create_request(&["Alice", "Bob"]))
            .await
            .unwrap();

        assert!(verify_group_password(&state, group.id, "secret")
            .await
            .unwrap());
        assert!(!verify_group_password(&state, group.id, "wrong")
            .await
            .unwrap());
        assert!(!verify_group_password(&state, Uuid::new_v4(), "secret")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn stored_group_never_holds_the_plaintext_password() {
        let state = test_state();
        create_group(&state, create_request(&["Alice", "Bob"]))
            .await
            .unwrap();

        let document = state.store().load().await.unwrap();
        let group = &document.groups[0];
        assert_ne!(group.password_hash, "secret");
        assert!(group.password_salt.is_some());
    }
}
