use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{FakeTransport, Reply};
use crate::{
    BatchEntry, BatchProgress, BatchRequest, OllamaClient, TranslateError, TranslationRequest,
    Translator, translate_batch,
};

/// Translator that echoes text in upper case, one token per word.
///
/// Texts starting with `fail` produce a generation error, texts starting with
/// `cancel` trip the cancellation token mid-call.
#[derive(Default)]
struct ScriptedTranslator {
    seen: Mutex<Vec<TranslationRequest>>,
}

impl ScriptedTranslator {
    fn seen_texts(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.text.clone())
            .collect()
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(
        &self,
        request: &TranslationRequest,
        cancel: &CancellationToken,
        on_token: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String, TranslateError> {
        self.seen.lock().unwrap().push(request.clone());

        if request.text.starts_with("fail") {
            return Err(TranslateError::GenerationFailed(
                "HTTP 500: model crashed".to_string(),
            ));
        }
        if request.text.starts_with("cancel") {
            cancel.cancel();
            return Err(TranslateError::Cancelled);
        }

        for word in request.text.split_whitespace() {
            on_token(&word.to_uppercase());
        }
        Ok(request.text.to_uppercase())
    }
}

fn batch(texts: &[&str]) -> BatchRequest {
    BatchRequest {
        entries: texts
            .iter()
            .enumerate()
            .map(|(i, text)| BatchEntry {
                key: format!("key{i}"),
                source_text: text.to_string(),
                comment: Some(format!("comment {i}")),
            })
            .collect(),
        source_locale: "en".to_string(),
        target_locale: "de".to_string(),
        base_url: "http://localhost:11434".to_string(),
        model: "llama3".to_string(),
    }
}

#[tokio::test]
async fn test_all_entries_translated_in_order() {
    let translator = ScriptedTranslator::default();
    let request = batch(&["one", "two words", "three"]);
    let mut progress = Vec::new();
    let mut tokens = Vec::new();

    let results = translate_batch(
        &translator,
        &request,
        &CancellationToken::new(),
        |p| progress.push(p),
        |key: &str, token: &str| tokens.push((key.to_string(), token.to_string())),
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 3);
    let keys: Vec<_> = results.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["key0", "key1", "key2"]);
    assert_eq!(results[1].translation, "TWO WORDS");
    assert!(results.iter().all(|r| r.error.is_none()));

    assert_eq!(
        progress,
        vec![
            BatchProgress {
                completed: 1,
                total: 3,
                key: "key0".to_string(),
                translation: "ONE".to_string(),
            },
            BatchProgress {
                completed: 2,
                total: 3,
                key: "key1".to_string(),
                translation: "TWO WORDS".to_string(),
            },
            BatchProgress {
                completed: 3,
                total: 3,
                key: "key2".to_string(),
                translation: "THREE".to_string(),
            },
        ]
    );

    assert_eq!(tokens[1], ("key1".to_string(), "TWO".to_string()));
    assert_eq!(tokens[2], ("key1".to_string(), "WORDS".to_string()));
}

#[tokio::test]
async fn test_entry_metadata_is_threaded_through() {
    let translator = ScriptedTranslator::default();

    translate_batch(
        &translator,
        &batch(&["hello"]),
        &CancellationToken::new(),
        |_| {},
        |_: &str, _: &str| {},
    )
    .await
    .unwrap();

    let seen = translator.seen.lock().unwrap();
    assert_eq!(seen[0].key.as_deref(), Some("key0"));
    assert_eq!(seen[0].comment.as_deref(), Some("comment 0"));
    assert_eq!(seen[0].target_locale, "de");
    assert_eq!(seen[0].model, "llama3");
}

#[tokio::test]
async fn test_failed_entry_does_not_stop_batch() {
    let translator = ScriptedTranslator::default();
    let mut progress = Vec::new();

    let results = translate_batch(
        &translator,
        &batch(&["before", "fail here", "after"]),
        &CancellationToken::new(),
        |p| progress.push(p),
        |_: &str, _: &str| {},
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].translation, "BEFORE");
    assert_eq!(results[1].translation, "");
    assert!(results[1].error.as_deref().unwrap().contains("model crashed"));
    assert_eq!(results[2].translation, "AFTER");
    assert!(results[2].error.is_none());

    assert_eq!(progress.len(), 3);
    assert_eq!(progress[1].completed, 2);
    assert_eq!(progress[1].translation, "");
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let translator = ScriptedTranslator::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = translate_batch(
        &translator,
        &batch(&["one", "two"]),
        &cancel,
        |_| {},
        |_: &str, _: &str| {},
    )
    .await;

    assert!(matches!(result, Err(TranslateError::Cancelled)));
    assert!(translator.seen_texts().is_empty());
}

#[tokio::test]
async fn test_cancelled_before_each_entry() {
    let texts = ["a", "b", "c", "d"];

    for stop_before in 1..texts.len() {
        let translator = ScriptedTranslator::default();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        let result = translate_batch(
            &translator,
            &batch(&texts),
            &cancel,
            |p: BatchProgress| {
                if p.completed == stop_before {
                    trigger.cancel();
                }
            },
            |_: &str, _: &str| {},
        )
        .await;

        assert!(matches!(result, Err(TranslateError::Cancelled)));
        assert_eq!(translator.seen_texts().len(), stop_before);
    }
}

#[tokio::test]
async fn test_cancelled_mid_entry() {
    let translator = ScriptedTranslator::default();
    let mut progress = Vec::new();

    let result = translate_batch(
        &translator,
        &batch(&["first", "cancel now", "never"]),
        &CancellationToken::new(),
        |p| progress.push(p),
        |_: &str, _: &str| {},
    )
    .await;

    assert!(matches!(result, Err(TranslateError::Cancelled)));
    assert_eq!(translator.seen_texts(), vec!["first", "cancel now"]);
    assert_eq!(progress.len(), 1);
}

#[tokio::test]
async fn test_batch_over_streaming_client() {
    let transport = Arc::new(
        FakeTransport::new()
            .on(
                "http://localhost:11434/api/generate",
                Reply::ok(&["{\"response\":\"Hal\"}\n", "{\"response\":\"lo\"}\n"]),
            )
            .on(
                "http://localhost:11434/api/generate",
                Reply::status(404, "model not found"),
            )
            .on(
                "http://localhost:11434/api/generate",
                Reply::ok(&["{\"response\":\"German: Tschüss\"}\n"]),
            ),
    );
    let client = OllamaClient::with_transport(transport.clone(), Duration::from_secs(3));
    let mut streamed = String::new();

    let results = translate_batch(
        &client,
        &batch(&["Hello", "Thanks", "Bye"]),
        &CancellationToken::new(),
        |_| {},
        |_: &str, token: &str| streamed.push_str(token),
    )
    .await
    .unwrap();

    assert_eq!(results[0].translation, "Hallo");
    assert!(results[1].error.as_deref().unwrap().contains("model not found"));
    assert_eq!(results[2].translation, "Tschüss");
    assert_eq!(streamed, "HalloGerman: Tschüss");
}
