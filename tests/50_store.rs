//! Store behaviour shared by every backend. Each property runs against the
//! in-memory store, and against PostgreSQL when DATABASE_URL is set.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::OnceCell;
use uuid::Uuid;

use taskflow_api::config;
use taskflow_api::database::models::{
    NewSubtask, NewTask, NewUser, SubtaskChanges, TaskChanges, TaskPriority, TaskStatus,
};
use taskflow_api::database::{DatabaseError, DatabaseManager, MemoryStore, PgStore, Store};
use taskflow_api::filter::{TaskFilter, TaskSort};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// `None` when no database is configured
async fn postgres() -> Result<Option<PgStore>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL store checks");
        return Ok(None);
    };

    let pool = DatabaseManager::connect(&url, &config::config().database).await?;
    let store = PgStore::new(pool);
    MIGRATED
        .get_or_try_init(|| async { store.migrate().await })
        .await
        .context("failed to apply schema")?;
    Ok(Some(store))
}

/// Runs `check` against every available backend
macro_rules! for_each_store {
    ($check:ident) => {{
        $check(&MemoryStore::new()).await.context("memory store")?;
        if let Some(store) = postgres().await? {
            $check(&store).await.context("postgres store")?;
        }
        Ok(())
    }};
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

fn new_task(title: &str, status: TaskStatus, due: u32) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: Some("notes".to_string()),
        status,
        priority: TaskPriority::Medium,
        due_date: day(due),
    }
}

async fn owner(store: &dyn Store) -> Result<Uuid> {
    let user = store
        .insert_user(NewUser {
            name: "Owner".to_string(),
            email: format!("owner-{}@example.com", Uuid::new_v4().simple()),
            password_hash: "x".to_string(),
        })
        .await?;
    Ok(user.id)
}

fn titles(tasks: &[taskflow_api::database::models::Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.title.as_str()).collect()
}

async fn duplicate_email_conflicts(store: &dyn Store) -> Result<()> {
    let email = format!("dup-{}@example.com", Uuid::new_v4().simple());
    let user = NewUser {
        name: "Ada".to_string(),
        email: email.clone(),
        password_hash: "x".to_string(),
    };
    let created = store.insert_user(user.clone()).await?;
    let err = store.insert_user(user).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "got {:?}", err);

    let found = store.find_user_by_email(&email).await?.context("user missing")?;
    assert_eq!(found.id, created.id);
    Ok(())
}

async fn list_filters_and_orders(store: &dyn Store) -> Result<()> {
    let me = owner(store).await?;
    let stranger = owner(store).await?;
    store.insert_task(me, new_task("b", TaskStatus::ToDo, 20)).await?;
    store.insert_task(me, new_task("a", TaskStatus::Completed, 5)).await?;
    store.insert_task(me, new_task("c", TaskStatus::InProgress, 12)).await?;
    store.insert_task(stranger, new_task("other", TaskStatus::ToDo, 1)).await?;

    let newest = store.list_tasks(me, &TaskFilter::default()).await?;
    assert_eq!(titles(&newest), vec!["c", "a", "b"]);

    let filter = TaskFilter { sort: TaskSort::DueDateAsc, ..Default::default() };
    assert_eq!(titles(&store.list_tasks(me, &filter).await?), vec!["a", "c", "b"]);

    let filter = TaskFilter { sort: TaskSort::DueDateDesc, ..Default::default() };
    assert_eq!(titles(&store.list_tasks(me, &filter).await?), vec!["b", "c", "a"]);

    let filter = TaskFilter {
        status: vec!["Completed".to_string(), "To-Do".to_string()],
        sort: TaskSort::DueDateAsc,
        ..Default::default()
    };
    assert_eq!(titles(&store.list_tasks(me, &filter).await?), vec!["a", "b"]);

    let filter = TaskFilter { status: vec!["Archived".to_string()], ..Default::default() };
    assert!(store.list_tasks(me, &filter).await?.is_empty());
    Ok(())
}

async fn update_merges_and_clears(store: &dyn Store) -> Result<()> {
    let me = owner(store).await?;
    let task = store.insert_task(me, new_task("a", TaskStatus::ToDo, 1)).await?;

    let updated = store
        .update_task(task.id, TaskChanges { status: Some(TaskStatus::Completed), ..Default::default() })
        .await?
        .context("task vanished")?;
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.title, "a");
    assert_eq!(updated.description.as_deref(), Some("notes"));
    assert_eq!(updated.created_at, task.created_at);

    let cleared = store
        .update_task(task.id, TaskChanges { description: Some(None), due_date: Some(day(9)), ..Default::default() })
        .await?
        .context("task vanished")?;
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.due_date, day(9));
    assert_eq!(cleared.status, TaskStatus::Completed);

    assert!(store.update_task(Uuid::new_v4(), TaskChanges::default()).await?.is_none());
    Ok(())
}

async fn subtasks_follow_their_task(store: &dyn Store) -> Result<()> {
    let me = owner(store).await?;
    let doomed = store.insert_task(me, new_task("doomed", TaskStatus::ToDo, 1)).await?;
    let kept = store.insert_task(me, new_task("kept", TaskStatus::ToDo, 2)).await?;

    for title in ["one", "two"] {
        store
            .insert_subtask(me, NewSubtask { title: title.to_string(), task_id: doomed.id })
            .await?;
    }
    let survivor = store
        .insert_subtask(me, NewSubtask { title: "stay".to_string(), task_id: kept.id })
        .await?;
    assert!(!survivor.completed);

    let listed = store.list_subtasks(doomed.id).await?;
    let names: Vec<&str> = listed.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(names, vec!["one", "two"]);

    assert!(store.delete_task(doomed.id).await?);
    assert!(!store.delete_task(doomed.id).await?);
    assert!(store.list_subtasks(doomed.id).await?.is_empty());
    assert!(store.find_subtask(listed[0].id).await?.is_none());
    assert_eq!(store.list_subtasks(kept.id).await?, vec![survivor]);
    Ok(())
}

async fn subtask_updates_and_deletes(store: &dyn Store) -> Result<()> {
    let me = owner(store).await?;
    let task = store.insert_task(me, new_task("t", TaskStatus::ToDo, 1)).await?;
    let subtask = store
        .insert_subtask(me, NewSubtask { title: "Milk".to_string(), task_id: task.id })
        .await?;

    let toggled = store
        .update_subtask(subtask.id, SubtaskChanges { title: None, completed: Some(true) })
        .await?
        .context("subtask vanished")?;
    assert!(toggled.completed);
    assert_eq!(toggled.title, "Milk");

    assert!(store.delete_subtask(subtask.id).await?);
    assert!(!store.delete_subtask(subtask.id).await?);
    assert!(store.update_subtask(subtask.id, SubtaskChanges::default()).await?.is_none());

    let err = store
        .insert_subtask(me, NewSubtask { title: "x".to_string(), task_id: Uuid::new_v4() })
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "got {:?}", err);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    for_each_store!(duplicate_email_conflicts)
}

#[tokio::test]
async fn task_listing_filters_and_sorts() -> Result<()> {
    for_each_store!(list_filters_and_orders)
}

#[tokio::test]
async fn task_update_merges_and_clears_description() -> Result<()> {
    for_each_store!(update_merges_and_clears)
}

#[tokio::test]
async fn deleting_a_task_cascades_to_subtasks() -> Result<()> {
    for_each_store!(subtasks_follow_their_task)
}

#[tokio::test]
async fn subtask_update_and_delete() -> Result<()> {
    for_each_store!(subtask_updates_and_deletes)
}
