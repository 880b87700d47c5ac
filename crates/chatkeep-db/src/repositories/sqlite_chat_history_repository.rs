//! `SQLite` implementation of the `ChatHistoryRepository` trait.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use chatkeep_core::{
    domain::{ChatId, ChatSummary, CreatedChat, Identity, Message, NewMessage},
    domain::{derive_auto_title, is_default_title, resolve_title},
    ports::{ChatHistoryError, ChatHistoryRepository, SEARCH_RESULT_LIMIT, validate_content},
};

use super::row_mappers::{
    SUMMARY_SELECT_COLUMNS, db_err, format_timestamp, now, row_to_message, row_to_summary,
};

/// `SQLite` implementation of the `ChatHistoryRepository` trait.
///
/// Every statement carries an `owner_id` predicate, either directly or
/// through a join on `chats`.
pub struct SqliteChatHistoryRepository {
    pool: SqlitePool,
}

impl SqliteChatHistoryRepository {
    /// Create a new `SQLite` chat history repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatHistoryRepository for SqliteChatHistoryRepository {
    async fn create_chat(
        &self,
        owner: &Identity,
        title: Option<&str>,
    ) -> Result<CreatedChat, ChatHistoryError> {
        let id = ChatId::new();
        let title = resolve_title(title);
        let ts = format_timestamp(now());

        sqlx::query(
            "INSERT INTO chats (id, owner_id, title, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(owner.as_str())
        .bind(&title)
        .bind(&ts)
        .bind(&ts)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(CreatedChat { id, title })
    }

    async fn list_chats(&self, owner: &Identity) -> Result<Vec<ChatSummary>, ChatHistoryError> {
        let sql = format!(
            "SELECT {SUMMARY_SELECT_COLUMNS}
             FROM chats c
             WHERE c.owner_id = ?
             ORDER BY c.updated_at DESC, c.rowid DESC"
        );

        let rows = sqlx::query(&sql)
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(row_to_summary).collect()
    }

    async fn get_messages(
        &self,
        owner: &Identity,
        chat_id: ChatId,
    ) -> Result<Vec<Message>, ChatHistoryError> {
        let rows = sqlx::query(
            "SELECT m.id, m.chat_id, m.sender, m.content, m.created_at
             FROM chat_messages m
             JOIN chats c ON c.id = m.chat_id
             WHERE m.chat_id = ? AND c.owner_id = ?
             ORDER BY m.created_at ASC, m.rowid ASC",
        )
        .bind(chat_id.to_string())
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_message).collect()
    }

    async fn add_message(
        &self,
        owner: &Identity,
        msg: NewMessage,
    ) -> Result<Message, ChatHistoryError> {
        let content = validate_content(&msg.content)?.to_string();

        let id = Uuid::new_v4();
        let created_at = now();
        let ts = format_timestamp(created_at);

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // The first statement must be a write: a deferred transaction that
        // reads first gets SQLITE_BUSY on the lock upgrade instead of waiting.
        let inserted = sqlx::query(
            r"INSERT INTO chat_messages (id, chat_id, sender, content, created_at)
              SELECT ?, ?, ?, ?, ?
              WHERE EXISTS (SELECT 1 FROM chats WHERE id = ? AND owner_id = ?)",
        )
        .bind(id.to_string())
        .bind(msg.chat_id.to_string())
        .bind(msg.sender.as_str())
        .bind(&content)
        .bind(&ts)
        .bind(msg.chat_id.to_string())
        .bind(owner.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if inserted.rows_affected() == 0 {
            return Err(ChatHistoryError::ChatNotFound(msg.chat_id));
        }

        sqlx::query("UPDATE chats SET updated_at = ? WHERE id = ? AND owner_id = ?")
            .bind(&ts)
            .bind(msg.chat_id.to_string())
            .bind(owner.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(Message {
            id,
            chat_id: msg.chat_id,
            sender: msg.sender,
            content,
            created_at,
        })
    }

    async fn auto_title(
        &self,
        owner: &Identity,
        chat_id: ChatId,
        candidate: &str,
    ) -> Result<bool, ChatHistoryError> {
        let Some(new_title) = derive_auto_title(candidate) else {
            return Ok(false);
        };

        let row = sqlx::query("SELECT title FROM chats WHERE id = ? AND owner_id = ?")
            .bind(chat_id.to_string())
            .bind(owner.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(false);
        };
        let current: String = row.try_get("title").map_err(db_err)?;
        if !is_default_title(&current) {
            return Ok(false);
        }

        // Compare-and-set on the title we just read, so a concurrent rename wins.
        let result = sqlx::query(
            "UPDATE chats SET title = ?, updated_at = ? WHERE id = ? AND owner_id = ? AND title = ?",
        )
        .bind(&new_title)
        .bind(format_timestamp(now()))
        .bind(chat_id.to_string())
        .bind(owner.as_str())
        .bind(&current)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_chat(
        &self,
        owner: &Identity,
        chat_id: ChatId,
    ) -> Result<bool, ChatHistoryError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // The foreign key cascades too; deleting explicitly keeps the
        // transaction correct on connections opened without foreign keys.
        sqlx::query(
            "DELETE FROM chat_messages
             WHERE chat_id IN (SELECT id FROM chats WHERE id = ? AND owner_id = ?)",
        )
        .bind(chat_id.to_string())
        .bind(owner.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let result = sqlx::query("DELETE FROM chats WHERE id = ? AND owner_id = ?")
            .bind(chat_id.to_string())
            .bind(owner.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_chats(
        &self,
        owner: &Identity,
        query: &str,
    ) -> Result<Vec<ChatSummary>, ChatHistoryError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        // SQLite's LIKE only folds ASCII, so final matching happens here. An
        // ASCII needle still narrows the rows with a LIKE prefilter.
        let rows = if needle.is_ascii() {
            sqlx::query(
                r"SELECT m.chat_id, m.content
                  FROM chat_messages m
                  JOIN chats c ON c.id = m.chat_id
                  WHERE c.owner_id = ? AND m.content LIKE ? ESCAPE '\'",
            )
            .bind(owner.as_str())
            .bind(like_pattern(&needle))
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query(
                "SELECT m.chat_id, m.content
                 FROM chat_messages m
                 JOIN chats c ON c.id = m.chat_id
                 WHERE c.owner_id = ?",
            )
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await
        }
        .map_err(db_err)?;

        let mut matching_chats = HashSet::new();
        for row in &rows {
            let content: String = row.try_get("content").map_err(db_err)?;
            if content.to_lowercase().contains(&needle) {
                let chat_id: String = row.try_get("chat_id").map_err(db_err)?;
                matching_chats.insert(chat_id);
            }
        }

        let results = self
            .list_chats(owner)
            .await?
            .into_iter()
            .filter(|chat| {
                chat.title.to_lowercase().contains(&needle)
                    || matching_chats.contains(&chat.id.to_string())
            })
            .take(SEARCH_RESULT_LIMIT)
            .collect();

        Ok(results)
    }
}

/// Wrap `needle` in `%` wildcards, escaping LIKE metacharacters with `\\`.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;
    use chatkeep_core::domain::{DEFAULT_CHAT_TITLE, Sender, TRUNCATION_MARKER};
    use std::time::Duration;

    async fn repo() -> SqliteChatHistoryRepository {
        SqliteChatHistoryRepository::new(setup_test_database().await.unwrap())
    }

    fn alice() -> Identity {
        Identity::new("alice").unwrap()
    }

    fn bob() -> Identity {
        Identity::new("bob").unwrap()
    }

    fn user_msg(chat_id: ChatId, content: &str) -> NewMessage {
        NewMessage {
            chat_id,
            sender: Sender::User,
            content: content.to_string(),
        }
    }

    fn bot_msg(chat_id: ChatId, content: &str) -> NewMessage {
        NewMessage {
            chat_id,
            sender: Sender::Bot,
            content: content.to_string(),
        }
    }

    /// Keeps consecutive writes on distinct timestamps.
    async fn tick() {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    #[tokio::test]
    async fn create_chat_resolves_title() {
        let repo = repo().await;

        let blank = repo.create_chat(&alice(), Some("   ")).await.unwrap();
        assert_eq!(blank.title, DEFAULT_CHAT_TITLE);

        let absent = repo.create_chat(&alice(), None).await.unwrap();
        assert_eq!(absent.title, DEFAULT_CHAT_TITLE);

        let trimmed = repo.create_chat(&alice(), Some("  Trip Plan  ")).await.unwrap();
        assert_eq!(trimmed.title, "Trip Plan");

        assert_ne!(blank.id, absent.id);
    }

    #[tokio::test]
    async fn list_chats_orders_by_last_update() {
        let repo = repo().await;
        let a = repo.create_chat(&alice(), Some("A")).await.unwrap();
        tick().await;
        let b = repo.create_chat(&alice(), Some("B")).await.unwrap();

        let ids: Vec<ChatId> = repo
            .list_chats(&alice())
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id]);

        tick().await;
        repo.add_message(&alice(), user_msg(a.id, "bump")).await.unwrap();

        let chats = repo.list_chats(&alice()).await.unwrap();
        assert_eq!(chats[0].id, a.id);
        assert_eq!(chats[0].last_message, "bump");
        assert_eq!(chats[1].id, b.id);
        assert_eq!(chats[1].last_message, "");
    }

    #[tokio::test]
    async fn list_chats_is_scoped_and_repeatable() {
        let repo = repo().await;
        repo.create_chat(&alice(), Some("mine")).await.unwrap();
        repo.create_chat(&bob(), Some("theirs")).await.unwrap();

        let first = repo.list_chats(&alice()).await.unwrap();
        let second = repo.list_chats(&alice()).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].title, "mine");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn summary_shows_latest_message() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), None).await.unwrap();

        repo.add_message(&alice(), user_msg(chat.id, "first")).await.unwrap();
        repo.add_message(&alice(), bot_msg(chat.id, "second")).await.unwrap();

        let chats = repo.list_chats(&alice()).await.unwrap();
        assert_eq!(chats[0].last_message, "second");
    }

    #[tokio::test]
    async fn messages_come_back_in_insertion_order() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), None).await.unwrap();

        for i in 0..5 {
            repo.add_message(&alice(), user_msg(chat.id, &format!("m{i}")))
                .await
                .unwrap();
        }

        let contents: Vec<String> = repo
            .get_messages(&alice(), chat.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn add_message_trims_and_returns_stored_row() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), None).await.unwrap();

        let stored = repo
            .add_message(&alice(), bot_msg(chat.id, "  hello  "))
            .await
            .unwrap();
        assert_eq!(stored.content, "hello");
        assert_eq!(stored.sender, Sender::Bot);

        let messages = repo.get_messages(&alice(), chat.id).await.unwrap();
        assert_eq!(messages, vec![stored]);
    }

    #[tokio::test]
    async fn add_message_rejects_blank_content() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), None).await.unwrap();

        let err = repo
            .add_message(&alice(), user_msg(chat.id, "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatHistoryError::EmptyContent));
        assert!(repo.get_messages(&alice(), chat.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_owner_cannot_touch_chat() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), Some("private")).await.unwrap();
        repo.add_message(&alice(), user_msg(chat.id, "secret")).await.unwrap();

        assert!(repo.get_messages(&bob(), chat.id).await.unwrap().is_empty());

        let err = repo
            .add_message(&bob(), user_msg(chat.id, "intrusion"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatHistoryError::ChatNotFound(id) if id == chat.id));

        assert!(!repo.auto_title(&bob(), chat.id, "hijack").await.unwrap());
        assert!(!repo.delete_chat(&bob(), chat.id).await.unwrap());
        assert!(repo.search_chats(&bob(), "secret").await.unwrap().is_empty());

        // Alice still sees everything untouched
        let messages = repo.get_messages(&alice(), chat.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(repo.list_chats(&alice()).await.unwrap()[0].title, "private");
    }

    #[tokio::test]
    async fn add_message_to_unknown_chat_fails() {
        let repo = repo().await;
        let err = repo
            .add_message(&alice(), user_msg(ChatId::new(), "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatHistoryError::ChatNotFound(_)));
    }

    #[tokio::test]
    async fn auto_title_applies_once() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), None).await.unwrap();
        let text = "Plan my trip to Japan for two weeks including Kyoto and Tokyo";

        assert!(repo.auto_title(&alice(), chat.id, text).await.unwrap());
        let title = repo.list_chats(&alice()).await.unwrap()[0].title.clone();
        assert_eq!(title, format!("{}{TRUNCATION_MARKER}", &text[..42]));

        assert!(!repo.auto_title(&alice(), chat.id, "Something else").await.unwrap());
        let chats = repo.list_chats(&alice()).await.unwrap();
        assert_eq!(chats[0].title, title);
    }

    #[tokio::test]
    async fn auto_title_keeps_custom_titles() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), Some("Trip Plan")).await.unwrap();

        assert!(!repo.auto_title(&alice(), chat.id, "hello").await.unwrap());
        assert_eq!(repo.list_chats(&alice()).await.unwrap()[0].title, "Trip Plan");
    }

    #[tokio::test]
    async fn auto_title_matches_default_case_insensitively() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), Some("neuer CHAT")).await.unwrap();

        assert!(repo.auto_title(&alice(), chat.id, "Short").await.unwrap());
        assert_eq!(repo.list_chats(&alice()).await.unwrap()[0].title, "Short");
    }

    #[tokio::test]
    async fn auto_title_ignores_blank_candidate_and_missing_chat() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), None).await.unwrap();

        assert!(!repo.auto_title(&alice(), chat.id, "   ").await.unwrap());
        assert!(!repo.auto_title(&alice(), ChatId::new(), "hello").await.unwrap());
        assert_eq!(
            repo.list_chats(&alice()).await.unwrap()[0].title,
            DEFAULT_CHAT_TITLE
        );
    }

    #[tokio::test]
    async fn delete_chat_cascades_messages() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), None).await.unwrap();
        repo.add_message(&alice(), user_msg(chat.id, "one")).await.unwrap();
        repo.add_message(&alice(), bot_msg(chat.id, "two")).await.unwrap();

        assert!(repo.delete_chat(&alice(), chat.id).await.unwrap());
        assert!(repo.get_messages(&alice(), chat.id).await.unwrap().is_empty());
        assert!(repo.list_chats(&alice()).await.unwrap().is_empty());

        let (orphans,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM chat_messages WHERE chat_id = ?")
                .bind(chat.id.to_string())
                .fetch_one(&repo.pool)
                .await
                .unwrap();
        assert_eq!(orphans, 0);

        // Second delete finds nothing
        assert!(!repo.delete_chat(&alice(), chat.id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_unknown_chat_returns_false() {
        let repo = repo().await;
        assert!(!repo.delete_chat(&alice(), ChatId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn search_matches_titles_and_messages_case_insensitively() {
        let repo = repo().await;
        let by_title = repo.create_chat(&alice(), Some("Kyoto temples")).await.unwrap();
        tick().await;
        let by_message = repo.create_chat(&alice(), None).await.unwrap();
        repo.add_message(&alice(), bot_msg(by_message.id, "Visit KYOTO in spring"))
            .await
            .unwrap();
        repo.add_message(&alice(), user_msg(by_message.id, "and kyoto again"))
            .await
            .unwrap();
        tick().await;
        repo.create_chat(&alice(), Some("Groceries")).await.unwrap();

        let results = repo.search_chats(&alice(), "kyoto").await.unwrap();
        let ids: Vec<ChatId> = results.iter().map(|c| c.id).collect();

        // Deduplicated, most recently updated first
        assert_eq!(ids, vec![by_message.id, by_title.id]);
        assert_eq!(results[0].last_message, "and kyoto again");
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let repo = repo().await;
        let chat = repo.create_chat(&alice(), Some("Über München")).await.unwrap();

        let results = repo.search_chats(&alice(), "über münchen").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, chat.id);
    }

    #[tokio::test]
    async fn search_blank_query_returns_nothing() {
        let repo = repo().await;
        repo.create_chat(&alice(), Some("anything")).await.unwrap();

        assert!(repo.search_chats(&alice(), "").await.unwrap().is_empty());
        assert!(repo.search_chats(&alice(), "  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_is_capped() {
        let repo = repo().await;
        for i in 0..(SEARCH_RESULT_LIMIT + 5) {
            repo.create_chat(&alice(), Some(&format!("Kyoto {i}")))
                .await
                .unwrap();
        }

        let results = repo.search_chats(&alice(), "kyoto").await.unwrap();
        assert_eq!(results.len(), SEARCH_RESULT_LIMIT);
    }

    #[tokio::test]
    async fn search_escapes_like_wildcards() {
        let repo = repo().await;
        let percent = repo.create_chat(&alice(), Some("Budget")).await.unwrap();
        repo.add_message(&alice(), user_msg(percent.id, "Done at 100% today"))
            .await
            .unwrap();
        let plain = repo.create_chat(&alice(), Some("Notes")).await.unwrap();
        repo.add_message(&alice(), user_msg(plain.id, "100 items, done"))
            .await
            .unwrap();
        let underscore = repo.create_chat(&alice(), Some("Code")).await.unwrap();
        repo.add_message(&alice(), user_msg(underscore.id, "rename my_var"))
            .await
            .unwrap();

        let results = repo.search_chats(&alice(), "0% ").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, percent.id);

        let results = repo.search_chats(&alice(), "Y_V").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, underscore.id);

        assert!(repo.search_chats(&alice(), "my\\var").await.unwrap().is_empty());

        repo.add_message(&alice(), bot_msg(plain.id, r"saved to C:\Temp"))
            .await
            .unwrap();
        let results = repo.search_chats(&alice(), r"c:\temp").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, plain.id);
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_on_file_database_all_succeed() {
        use crate::setup::setup_database;
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let pool = setup_database(&dir.path().join("chats.db")).await.unwrap();
        let repo = Arc::new(SqliteChatHistoryRepository::new(pool));

        let mut chats = Vec::new();
        for i in 0..8 {
            let chat = repo
                .create_chat(&alice(), Some(&format!("Chat {i}")))
                .await
                .unwrap();
            chats.push(chat.id);
        }

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let repo = Arc::clone(&repo);
                let chat_id = chats[i % chats.len()];
                tokio::spawn(async move {
                    repo.add_message(&alice(), user_msg(chat_id, &format!("message {i}")))
                        .await
                })
            })
            .collect();

        let mut failures = Vec::new();
        for handle in handles {
            if let Err(e) = handle.await.unwrap() {
                failures.push(e.to_string());
            }
        }
        assert!(failures.is_empty(), "failed appends: {failures:?}");

        for chat_id in chats {
            let messages = repo.get_messages(&alice(), chat_id).await.unwrap();
            assert_eq!(messages.len(), 25);
        }
    }
}
