//! End-to-end pipeline tests over fake collaborators.
//!
//! Every external dependency (completion model, wiki provider, query
//! executor) is substituted with an in-memory fake, so these tests
//! exercise the real retrieval, gating, filtering, and composition logic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use deskbot_core::{AppError, AppResult, ContentPolicy};
use deskbot_knowledge::answer::REFUSAL;
use deskbot_knowledge::{
    AnswerComposer, InboundHandler, MessageEvent, QueryTranslator, RecordSearcher, RowSet,
    SourceKind, SourceSearcher, SqlExecutor, WikiSearch, WikiSearchHit, APOLOGY,
};
use deskbot_llm::{CompletionRequest, CompletionResponse, LlmClient, TokenUsage};
use serde_json::json;

/// Completion fake that routes on the prompt shape: translation prompts end
/// with "SQL:", everything else is synthesis. Records every prompt.
struct FakeOracle {
    sql_reply: Result<String, String>,
    answer_reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeOracle {
    fn new(sql_reply: Result<String, String>, answer_reply: Result<String, String>) -> Arc<Self> {
        Arc::new(Self {
            sql_reply,
            answer_reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn synthesis_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|prompt| !prompt.trim_end().ends_with("SQL:"))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl LlmClient for FakeOracle {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, request: &CompletionRequest) -> AppResult<CompletionResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());

        let reply = if request.prompt.trim_end().ends_with("SQL:") {
            &self.sql_reply
        } else {
            &self.answer_reply
        };

        match reply {
            Ok(content) => Ok(CompletionResponse {
                content: content.clone(),
                model: request.model.clone(),
                usage: TokenUsage::default(),
            }),
            Err(message) => Err(AppError::Llm(message.clone())),
        }
    }
}

struct FakeWiki {
    hits: Vec<WikiSearchHit>,
}

#[async_trait::async_trait]
impl WikiSearch for FakeWiki {
    async fn search(&self, _query: &str, _limit: usize) -> AppResult<Vec<WikiSearchHit>> {
        Ok(self.hits.clone())
    }
}

struct RecordingExecutor {
    row_set: RowSet,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl SqlExecutor for RecordingExecutor {
    async fn fetch_rows(&self, _statement: &str) -> AppResult<RowSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.row_set.clone())
    }
}

fn wiki_hit(title: &str, excerpt: &str) -> WikiSearchHit {
    WikiSearchHit {
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        url: format!("https://wiki.example.com/{}", title.to_lowercase()),
    }
}

fn composer(
    oracle: Arc<FakeOracle>,
    hits: Vec<WikiSearchHit>,
    row_set: RowSet,
    tables: Vec<String>,
) -> (Arc<RecordingExecutor>, AnswerComposer) {
    let policy = Arc::new(ContentPolicy::with_extra_patterns(&[]).unwrap());
    let executor = Arc::new(RecordingExecutor {
        row_set,
        calls: AtomicUsize::new(0),
    });

    let sources = SourceSearcher::new(Arc::new(FakeWiki { hits }), Arc::clone(&policy), 5);
    let records = RecordSearcher::new(
        QueryTranslator::new(oracle.clone(), "llama3.2"),
        executor.clone(),
        Arc::clone(&policy),
        tables,
    );

    let composer = AnswerComposer::new(
        sources,
        records,
        oracle,
        "llama3.2",
        policy,
        "Confluence",
    );

    (executor, composer)
}

#[tokio::test]
async fn wiki_only_answer_is_attributed_to_the_wiki() {
    let oracle = FakeOracle::new(
        Ok("unused".to_string()),
        Ok("Install the VPN client from the portal and sign in with SSO.".to_string()),
    );
    let (executor, composer) = composer(
        oracle.clone(),
        vec![wiki_hit("VPN Setup", "Install the VPN client from the portal")],
        RowSet::default(),
        Vec::new(), // zero allowed tables configured
    );

    let answer = composer.compose("What is the VPN setup process?").await.unwrap();

    assert!(answer.text.starts_with("Install the VPN client"));
    assert!(answer.text.ends_with("Sources: Confluence"));
    assert_eq!(answer.sources, vec![SourceKind::Wiki]);
    assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn destructive_translation_never_reaches_the_executor() {
    let oracle = FakeOracle::new(
        Ok("DROP TABLE users;".to_string()),
        Ok("I could not find anything relevant.".to_string()),
    );
    let (executor, composer) = composer(
        oracle,
        Vec::new(),
        RowSet {
            columns: vec!["id".to_string()],
            rows: vec![vec![json!(1)]],
        },
        vec!["users".to_string()],
    );

    let answer = composer.compose("delete all the users").await.unwrap();

    assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    assert!(answer.sources.is_empty());
    assert!(!answer.text.contains("Sources:"));
}

#[tokio::test]
async fn unsafe_row_is_dropped_whole_and_never_enters_the_prompt() {
    let oracle = FakeOracle::new(
        Ok("SELECT name, ssn FROM employees".to_string()),
        Ok("Bob is on file.".to_string()),
    );
    let (_, composer) = composer(
        oracle.clone(),
        Vec::new(),
        RowSet {
            columns: vec!["name".to_string(), "ssn".to_string()],
            rows: vec![
                vec![json!("Alice"), json!("123-45-6789")],
                vec![json!("Bob"), json!("n/a")],
            ],
        },
        vec!["employees".to_string()],
    );

    let answer = composer.compose("who is on file?").await.unwrap();

    // The surviving record attributes the database; the dropped one left no trace.
    assert_eq!(answer.sources, vec![SourceKind::Database]);
    assert!(answer.text.ends_with("Sources: internal database"));

    let synthesis = oracle.synthesis_prompts();
    assert_eq!(synthesis.len(), 1);
    assert!(synthesis[0].contains("Bob"));
    assert!(!synthesis[0].contains("Alice"));
    assert!(!synthesis[0].contains("123-45-6789"));
}

#[tokio::test]
async fn both_sources_are_attributed_together() {
    let oracle = FakeOracle::new(
        Ok("SELECT name FROM employees".to_string()),
        Ok("Engineering is run by Bob.".to_string()),
    );
    let (_, composer) = composer(
        oracle,
        vec![wiki_hit("Org Chart", "Engineering reports to Bob")],
        RowSet {
            columns: vec!["name".to_string()],
            rows: vec![vec![json!("Bob")]],
        },
        vec!["employees".to_string()],
    );

    let answer = composer.compose("who runs engineering?").await.unwrap();

    assert_eq!(answer.sources, vec![SourceKind::Wiki, SourceKind::Database]);
    assert!(answer
        .text
        .ends_with("Sources: Confluence and internal database"));
}

#[tokio::test]
async fn empty_sources_mean_no_attribution_suffix() {
    let oracle = FakeOracle::new(
        Ok(String::new()),
        Ok("I could not find anything about that.".to_string()),
    );
    let (_, composer) = composer(oracle, Vec::new(), RowSet::default(), vec!["t".to_string()]);

    let answer = composer.compose("anything").await.unwrap();

    assert!(answer.sources.is_empty());
    assert_eq!(answer.text, "I could not find anything about that.");
}

#[tokio::test]
async fn flagged_synthesis_is_replaced_by_the_refusal() {
    let oracle = FakeOracle::new(
        Ok("unused".to_string()),
        Ok("The admin password is hunter2.".to_string()),
    );
    let (_, composer) = composer(
        oracle,
        vec![wiki_hit("Clean", "nothing sensitive here")],
        RowSet::default(),
        Vec::new(),
    );

    let answer = composer.compose("what is the admin login?").await.unwrap();

    assert_eq!(answer.text, REFUSAL);
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn synthesis_failure_yields_the_apology_not_a_crash() {
    let oracle = FakeOracle::new(
        Ok(String::new()),
        Err("model unavailable".to_string()),
    );
    let (_, composer) = composer(oracle, Vec::new(), RowSet::default(), Vec::new());
    let handler = InboundHandler::new(composer);

    let event = MessageEvent {
        event_type: "message".to_string(),
        text: "What is the VPN setup process?".to_string(),
        channel_type: Some("im".to_string()),
        channel: None,
        user: Some("U1".to_string()),
    };

    let reply = handler.handle(&event).await;
    assert_eq!(reply.as_deref(), Some(APOLOGY));
}

#[tokio::test]
async fn mention_events_answer_and_other_channel_chatter_is_ignored() {
    let oracle = FakeOracle::new(
        Ok(String::new()),
        Ok("Here is what I found.".to_string()),
    );
    let (_, composer) = composer(
        oracle,
        vec![wiki_hit("Guide", "a clean excerpt")],
        RowSet::default(),
        Vec::new(),
    );
    let handler = InboundHandler::new(composer);

    let mention = MessageEvent {
        event_type: "app_mention".to_string(),
        text: "<@U0BOT> where is the guide?".to_string(),
        channel_type: Some("channel".to_string()),
        channel: Some("C1".to_string()),
        user: Some("U1".to_string()),
    };
    let reply = handler.handle(&mention).await.unwrap();
    assert!(reply.starts_with("Here is what I found."));

    let chatter = MessageEvent {
        event_type: "message".to_string(),
        text: "unrelated channel talk".to_string(),
        channel_type: Some("channel".to_string()),
        channel: Some("C1".to_string()),
        user: Some("U2".to_string()),
    };
    assert!(handler.handle(&chatter).await.is_none());
}
