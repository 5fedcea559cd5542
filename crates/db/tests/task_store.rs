//! Integration tests for the task repository against a real database.

use chrono::NaiveDate;
use sqlx::PgPool;
use taskflow_core::category::NewCategory;
use taskflow_core::task::{
    CategoryFilter, NewTask, TaskChanges, TaskFilter, TaskPriority, TaskStatus,
};
use taskflow_db::repositories::{CategoryRepo, TaskRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        category_id: None,
        due_date: None,
        priority: TaskPriority::Medium,
    }
}

async fn create_category(pool: &PgPool, owner_id: i64, name: &str) -> i64 {
    CategoryRepo::create(
        pool,
        owner_id,
        &NewCategory {
            name: name.to_string(),
            color: "#3B82F6".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_defaults_to_pending(pool: PgPool) {
    let created = TaskRepo::create(&pool, 1, &new_task("Pay bills"))
        .await
        .unwrap();

    assert_eq!(created.task.owner_id, 1);
    assert_eq!(created.task.status, "pending");
    assert_eq!(created.task.priority, "medium");
    assert_eq!(created.task.category_id, None);
    assert!(created.category.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_resolves_category(pool: PgPool) {
    let category_id = create_category(&pool, 1, "Work").await;
    let input = NewTask {
        category_id: Some(category_id),
        due_date: NaiveDate::from_ymd_opt(2026, 1, 31),
        ..new_task("Report")
    };

    let created = TaskRepo::create(&pool, 1, &input).await.unwrap();
    let category = created.category.expect("category should be resolved");
    assert_eq!(category.id, category_id);
    assert_eq!(category.name, "Work");
    assert_eq!(created.task.due_date, NaiveDate::from_ymd_opt(2026, 1, 31));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_category_rejected_by_schema(pool: PgPool) {
    let foreign = create_category(&pool, 2, "Not yours").await;
    let input = NewTask {
        category_id: Some(foreign),
        ..new_task("Sneaky")
    };

    let result = TaskRepo::create(&pool, 1, &input).await;
    assert!(result.is_err());

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Update / status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_only_touches_supplied_fields(pool: PgPool) {
    let category_id = create_category(&pool, 1, "Home").await;
    let created = TaskRepo::create(
        &pool,
        1,
        &NewTask {
            description: Some("keep me".into()),
            category_id: Some(category_id),
            ..new_task("Original")
        },
    )
    .await
    .unwrap();

    let changes = TaskChanges {
        title: Some("Renamed".into()),
        priority: Some(TaskPriority::High),
        ..Default::default()
    };
    let updated = TaskRepo::update(&pool, created.task.id, &changes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.task.title, "Renamed");
    assert_eq!(updated.task.priority, "high");
    assert_eq!(updated.task.description.as_deref(), Some("keep me"));
    assert_eq!(updated.task.category_id, Some(category_id));
    assert!(updated.task.updated_at >= created.task.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_clears_nullable_fields(pool: PgPool) {
    let category_id = create_category(&pool, 1, "Home").await;
    let created = TaskRepo::create(
        &pool,
        1,
        &NewTask {
            description: Some("text".into()),
            category_id: Some(category_id),
            due_date: NaiveDate::from_ymd_opt(2026, 2, 1),
            ..new_task("Clear me")
        },
    )
    .await
    .unwrap();

    let changes = TaskChanges {
        description: Some(None),
        category_id: Some(None),
        due_date: Some(None),
        ..Default::default()
    };
    let updated = TaskRepo::update(&pool, created.task.id, &changes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.task.description, None);
    assert_eq!(updated.task.category_id, None);
    assert_eq!(updated.task.due_date, None);
    assert!(updated.category.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_task_returns_none(pool: PgPool) {
    let changes = TaskChanges {
        title: Some("x".into()),
        ..Default::default()
    };
    assert!(TaskRepo::update(&pool, 999_999, &changes)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_status_is_idempotent(pool: PgPool) {
    let created = TaskRepo::create(&pool, 1, &new_task("Pay bills"))
        .await
        .unwrap();

    let first = TaskRepo::set_status(&pool, created.task.id, TaskStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    let second = TaskRepo::set_status(&pool, created.task.id, TaskStatus::Completed)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.task.status, "completed");
    assert_eq!(first, second);

    let reverted = TaskRepo::set_status(&pool, created.task.id, TaskStatus::Pending)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reverted.task.status, "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete(pool: PgPool) {
    let created = TaskRepo::create(&pool, 1, &new_task("Gone")).await.unwrap();

    assert!(TaskRepo::delete(&pool, created.task.id).await.unwrap());
    assert!(!TaskRepo::delete(&pool, created.task.id).await.unwrap());
    assert!(TaskRepo::find_by_id(&pool, created.task.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters(pool: PgPool) {
    let work = create_category(&pool, 1, "Work").await;
    let in_work = TaskRepo::create(
        &pool,
        1,
        &NewTask {
            category_id: Some(work),
            priority: TaskPriority::High,
            ..new_task("in work")
        },
    )
    .await
    .unwrap();
    let loose = TaskRepo::create(&pool, 1, &new_task("loose")).await.unwrap();
    TaskRepo::set_status(&pool, loose.task.id, TaskStatus::Completed)
        .await
        .unwrap();
    TaskRepo::create(&pool, 2, &new_task("other user")).await.unwrap();

    let all = TaskRepo::list_for_owner(&pool, 1, &TaskFilter::default())
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|t| t.task.id).collect();
    assert_eq!(ids, vec![loose.task.id, in_work.task.id]);

    let completed = TaskRepo::list_for_owner(
        &pool,
        1,
        &TaskFilter {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].task.id, loose.task.id);

    let by_category = TaskRepo::list_for_owner(
        &pool,
        1,
        &TaskFilter {
            category: Some(CategoryFilter::Id(work)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].task.id, in_work.task.id);

    let uncategorized = TaskRepo::list_for_owner(
        &pool,
        1,
        &TaskFilter {
            category: Some(CategoryFilter::Uncategorized),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(uncategorized.len(), 1);
    assert_eq!(uncategorized[0].task.id, loose.task.id);

    let high = TaskRepo::list_for_owner(
        &pool,
        1,
        &TaskFilter {
            priority: Some(TaskPriority::High),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(high.len(), 1);
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats(pool: PgPool) {
    let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
    let work = create_category(&pool, 1, "Work").await;

    TaskRepo::create(
        &pool,
        1,
        &NewTask {
            category_id: Some(work),
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 6, 1),
            ..new_task("late")
        },
    )
    .await
    .unwrap();
    let done = TaskRepo::create(
        &pool,
        1,
        &NewTask {
            category_id: Some(work),
            due_date: NaiveDate::from_ymd_opt(2026, 6, 1),
            ..new_task("done late")
        },
    )
    .await
    .unwrap();
    TaskRepo::set_status(&pool, done.task.id, TaskStatus::Completed)
        .await
        .unwrap();
    TaskRepo::create(
        &pool,
        1,
        &NewTask {
            priority: TaskPriority::Low,
            due_date: Some(today),
            ..new_task("due today")
        },
    )
    .await
    .unwrap();
    TaskRepo::create(&pool, 2, &new_task("not mine")).await.unwrap();

    let stats = TaskRepo::stats(&pool, 1, today).await.unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.completion_rate, 33.3);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.by_priority.low, 1);
    assert_eq!(stats.by_priority.medium, 1);
    assert_eq!(stats.by_priority.high, 1);

    assert_eq!(stats.by_category.len(), 2);
    assert_eq!(stats.by_category[0].category_id, Some(work));
    assert_eq!(stats.by_category[0].name.as_deref(), Some("Work"));
    assert_eq!(stats.by_category[0].count, 2);
    assert_eq!(stats.by_category[1].category_id, None);
    assert_eq!(stats.by_category[1].count, 1);

    let grouped: i64 = stats.by_category.iter().map(|c| c.count).sum();
    assert_eq!(grouped, stats.total);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_stay_consistent_under_concurrent_writes(pool: PgPool) {
    let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
    let work = create_category(&pool, 1, "Work").await;

    let writer = {
        let pool = pool.clone();
        tokio::spawn(async move {
            for i in 0..40 {
                let input = NewTask {
                    category_id: (i % 2 == 0).then_some(work),
                    ..new_task(&format!("task {i}"))
                };
                TaskRepo::create(&pool, 1, &input).await.unwrap();
            }
        })
    };

    for _ in 0..40 {
        let stats = TaskRepo::stats(&pool, 1, today).await.unwrap();
        let grouped: i64 = stats.by_category.iter().map(|c| c.count).sum();
        assert_eq!(grouped, stats.total);
        assert_eq!(stats.pending + stats.completed, stats.total);
    }

    writer.await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_empty(pool: PgPool) {
    let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
    let stats = TaskRepo::stats(&pool, 1, today).await.unwrap();

    assert_eq!(stats.total, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert!(stats.by_category.is_empty());
}
