use loom_domain::ThreadMeta;
use loom_storage::{
	ChatTurn, Error, MemoryThreadStore, Message, Role, Thread, ThreadPatch, ThreadStore,
};

fn fixture(id: &str, updated_at: i64) -> Thread {
	Thread {
		meta: ThreadMeta {
			id: id.to_string(),
			title: format!("Thread {id}"),
			summary: None,
			updated_at,
		},
		created_at: updated_at,
		last_response_id: None,
		messages: Vec::new(),
	}
}

#[tokio::test]
async fn lists_newest_first_per_user() {
	let store = MemoryThreadStore::new();

	store.insert("alice", fixture("old", 1_000)).await;
	store.insert("alice", fixture("new", 5_000)).await;
	store.insert("bob", fixture("other", 9_000)).await;

	let listed = store.list_threads("alice").await.expect("list failed");
	let ids: Vec<_> = listed.iter().map(|t| t.id.as_str()).collect();

	assert_eq!(ids, vec!["new", "old"]);
	assert!(store.list_threads("carol").await.expect("list failed").is_empty());
}

#[tokio::test]
async fn threads_are_scoped_to_their_owner() {
	let store = MemoryThreadStore::new();
	let created = store.create_thread("alice", "  Planning  ").await.expect("create failed");

	assert_eq!(created.meta.title, "Planning");
	assert!(store.get_thread("bob", &created.meta.id).await.expect("get failed").is_none());

	let err = store
		.delete_thread("bob", &created.meta.id)
		.await
		.expect_err("Expected not found for foreign thread.");

	assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn append_and_update_bump_updated_at() {
	let store = MemoryThreadStore::new();

	store.insert("alice", fixture("t", 1)).await;

	let appended = store
		.append_message(
			"alice",
			"t",
			Message { role: Role::User, content: "hello".to_string(), created_at: 1 },
		)
		.await
		.expect("append failed");

	assert_eq!(appended.messages.len(), 1);
	assert!(appended.meta.updated_at > 1);

	let updated = store
		.update_thread(
			"alice",
			"t",
			ThreadPatch { summary: Some("greeting".to_string()), ..Default::default() },
		)
		.await
		.expect("update failed");

	assert_eq!(updated.meta.summary.as_deref(), Some("greeting"));
	assert_eq!(updated.meta.title, "Thread t");
}

#[tokio::test]
async fn blank_titles_are_rejected() {
	let store = MemoryThreadStore::new();

	assert!(matches!(
		store.create_thread("alice", "   ").await,
		Err(Error::InvalidArgument(_))
	));
}

#[tokio::test]
async fn missing_thread_updates_are_not_found() {
	let store = MemoryThreadStore::new();
	let err = store
		.update_thread("alice", "missing", ThreadPatch::default())
		.await
		.expect_err("Expected not found.");

	assert!(matches!(err, Error::NotFound(_)));
}

fn turn(question: &str, answer: &str, response_id: &str) -> ChatTurn {
	ChatTurn {
		user: Message { role: Role::User, content: question.to_string(), created_at: 2 },
		assistant: Message { role: Role::Assistant, content: answer.to_string(), created_at: 2 },
		response_id: response_id.to_string(),
	}
}

#[tokio::test]
async fn recorded_turn_lands_in_one_update() {
	let store = MemoryThreadStore::new();

	store.insert("alice", fixture("t", 1)).await;

	let recorded =
		store.record_turn("alice", "t", turn("hi", "hello", "resp_1")).await.expect("record failed");
	let roles: Vec<_> = recorded.messages.iter().map(|m| m.role).collect();

	assert_eq!(roles, vec![Role::User, Role::Assistant]);
	assert_eq!(recorded.last_response_id.as_deref(), Some("resp_1"));
	assert!(recorded.meta.updated_at > 1);

	let chained = store
		.record_turn("alice", "t", turn("again", "sure", "resp_2"))
		.await
		.expect("record failed");

	assert_eq!(chained.messages.len(), 4);
	assert_eq!(chained.last_response_id.as_deref(), Some("resp_2"));
}

#[tokio::test]
async fn recording_a_turn_on_a_foreign_thread_changes_nothing() {
	let store = MemoryThreadStore::new();

	store.insert("alice", fixture("t", 1)).await;

	let err = store
		.record_turn("bob", "t", turn("hi", "hello", "resp_1"))
		.await
		.expect_err("Expected not found.");
	let untouched = store.get_thread("alice", "t").await.expect("get failed").expect("thread exists");

	assert!(matches!(err, Error::NotFound(_)));
	assert!(untouched.messages.is_empty());
	assert!(untouched.last_response_id.is_none());
}

#[tokio::test]
async fn rename_trims_and_rejects_blank_titles() {
	let store = MemoryThreadStore::new();

	store.insert("alice", fixture("t", 1)).await;

	let renamed = store
		.update_thread(
			"alice",
			"t",
			ThreadPatch { title: Some("  Trip notes ".to_string()), ..Default::default() },
		)
		.await
		.expect("rename failed");

	assert_eq!(renamed.meta.title, "Trip notes");
	assert!(matches!(
		store
			.update_thread(
				"alice",
				"t",
				ThreadPatch { title: Some(" ".to_string()), ..Default::default() },
			)
			.await,
		Err(Error::InvalidArgument(_))
	));
}

#[test]
fn thread_serializes_flat_camel_case() {
	let json = serde_json::to_value(fixture("t", 7)).expect("serialize failed");

	assert_eq!(json["id"], "t");
	assert_eq!(json["updatedAt"], 7);
	assert_eq!(json["createdAt"], 7);
	assert!(json.get("meta").is_none());
}
