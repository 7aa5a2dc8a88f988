use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use db::{
    DBService,
    models::{
        activity_log::{ActivityAction, ActivityEntityType, ActivityLogItem, CreateActivityLog},
        comment_context::CommentContext,
        project::Project,
        task::{CreateTask, Task},
    },
};
use server::{
    AppState,
    config::Config,
    error::ApiError,
    routes::{
        comments::{CreateCommentRequest, ReplyRequest, create_comment, reply_to_thread},
        feed::{FeedQuery, ThreadsQuery, get_activity, get_feed, get_threads},
    },
};
use services::services::unified_feed::{FeedFilter, UnifiedFeedItem};
use uuid::Uuid;

async fn state_with_project() -> (AppState, Uuid) {
    let db = DBService::new_in_memory().await.unwrap();
    let project = Project::create(&db.pool, Uuid::new_v4(), "Kitchen remodel")
        .await
        .unwrap();
    let config = Config::from_lookup(|_| None).unwrap();
    (AppState::new(db, config), project.id)
}

fn comment_request(context: CommentContext, author: Uuid, content: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        context,
        content: content.to_string(),
        author_id: author,
        images: Vec::new(),
    }
}

#[tokio::test]
async fn post_then_read_threads() {
    let (state, project_id) = state_with_project().await;
    let author = Uuid::new_v4();
    let task = Task::create(
        &state.db().pool,
        &CreateTask::from_title(project_id, "Tile backsplash"),
        Uuid::new_v4(),
    )
    .await
    .unwrap();

    let root = create_comment(
        State(state.clone()),
        Path(project_id),
        Json(comment_request(CommentContext::Task(task.id), author, "grout color?")),
    )
    .await
    .unwrap()
    .0
    .into_data()
    .unwrap();

    let reply = reply_to_thread(
        State(state.clone()),
        Path((project_id, root.id)),
        Json(ReplyRequest {
            content: "charcoal".to_string(),
            author_id: Uuid::new_v4(),
            images: Vec::new(),
        }),
    )
    .await
    .unwrap()
    .0
    .into_data()
    .unwrap();
    assert_eq!(reply.context(), CommentContext::Task(task.id));

    let threads = get_threads(
        State(state.clone()),
        Path(project_id),
        Query(ThreadsQuery { user_id: None }),
    )
    .await
    .unwrap()
    .0
    .into_data()
    .unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].label, "Tile backsplash");
    assert_eq!(threads[0].comments.len(), 2);
    assert_eq!(threads[0].root.id, root.id);

    let mine = get_threads(
        State(state),
        Path(project_id),
        Query(ThreadsQuery {
            user_id: Some(Uuid::new_v4()),
        }),
    )
    .await
    .unwrap()
    .0
    .into_data()
    .unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn feed_filter_and_activity() {
    let (state, project_id) = state_with_project().await;
    let posted = create_comment(
        State(state.clone()),
        Path(project_id),
        Json(comment_request(CommentContext::Project, Uuid::new_v4(), "demo starts monday")),
    )
    .await
    .unwrap();
    assert!(posted.0.is_success());
    ActivityLogItem::create(
        &state.db().pool,
        &CreateActivityLog {
            project_id,
            actor_id: None,
            action: ActivityAction::Created,
            entity_type: ActivityEntityType::Task,
            entity_id: Some(Uuid::new_v4()),
            entity_name: Some("Remove cabinets".to_string()),
            changes: serde_json::json!({}),
            created_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    let all = get_feed(
        State(state.clone()),
        Path(project_id),
        Query(FeedQuery {
            filter: FeedFilter::All,
        }),
    )
    .await
    .unwrap()
    .0
    .into_data()
    .unwrap();
    assert_eq!(all.len(), 2);

    let activity_only = get_feed(
        State(state.clone()),
        Path(project_id),
        Query(FeedQuery {
            filter: FeedFilter::Activity,
        }),
    )
    .await
    .unwrap()
    .0
    .into_data()
    .unwrap();
    assert_eq!(activity_only.len(), 1);
    assert!(matches!(activity_only[0], UnifiedFeedItem::Activity(_)));

    let activity = get_activity(State(state), Path(project_id))
        .await
        .unwrap()
        .0
        .into_data()
        .unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].entity_name.as_deref(), Some("Remove cabinets"));
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let (state, _) = state_with_project().await;
    let result = get_feed(
        State(state),
        Path(Uuid::new_v4()),
        Query(FeedQuery {
            filter: FeedFilter::All,
        }),
    )
    .await;
    let Err(err) = result else {
        panic!("expected an error for an unknown project");
    };
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_comment_is_bad_request() {
    let (state, project_id) = state_with_project().await;
    let result = create_comment(
        State(state),
        Path(project_id),
        Json(comment_request(CommentContext::Project, Uuid::new_v4(), "  ")),
    )
    .await;
    let Err(err) = result else {
        panic!("expected blank content to be rejected");
    };
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reply_to_missing_thread_is_not_found() {
    let (state, project_id) = state_with_project().await;
    let result = reply_to_thread(
        State(state),
        Path((project_id, Uuid::new_v4())),
        Json(ReplyRequest {
            content: "anyone?".to_string(),
            author_id: Uuid::new_v4(),
            images: Vec::new(),
        }),
    )
    .await;
    let Err(err) = result else {
        panic!("expected a missing thread");
    };
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_on_foreign_task_is_not_found() {
    let (state, project_id) = state_with_project().await;
    let other = Project::create(&state.db().pool, Uuid::new_v4(), "Garage")
        .await
        .unwrap();
    let task = Task::create(
        &state.db().pool,
        &CreateTask::from_title(other.id, "Pour slab"),
        Uuid::new_v4(),
    )
    .await
    .unwrap();

    let result = create_comment(
        State(state),
        Path(project_id),
        Json(comment_request(CommentContext::Task(task.id), Uuid::new_v4(), "cured?")),
    )
    .await;
    let Err(err) = result else {
        panic!("expected a task outside the project to be rejected");
    };
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}
