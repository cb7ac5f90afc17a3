//! Post-handler purge interceptor.
//!
//! Runs after a handler succeeds, looks up the handler's purge declarations
//! and dispatches them. The handler's response is always handed back
//! unchanged; purge failures are logged and swallowed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use stellate_client::{PurgeError, PurgeOutcome, Purger};
use stellate_core::{HandlerId, PurgeRegistry};

/// Boxed handler future returned by [`PurgeInterceptor::wrap`].
pub type HandlerFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Response interceptor wired with a registry and a purger.
#[derive(Clone)]
pub struct PurgeInterceptor {
    registry: Arc<PurgeRegistry>,
    purger: Arc<dyn Purger>,
    debug: bool,
}

impl PurgeInterceptor {
    pub fn new(registry: Arc<PurgeRegistry>, purger: Arc<dyn Purger>) -> Self {
        Self { registry, purger, debug: false }
    }

    /// Log every interception and the declarations found.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Await a handler and purge after it succeeds.
    ///
    /// Handler errors pass through untouched and trigger no purge.
    pub async fn intercept<T, E, F>(&self, handler: &HandlerId, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        T: Serialize,
    {
        let response = fut.await?;
        Ok(self.after_success(handler, response).await)
    }

    /// Dispatch the purges declared for `handler` and return `response` as is.
    ///
    /// Query and type purges run concurrently; both settle before this returns.
    pub async fn after_success<T: Serialize>(&self, handler: &HandlerId, response: T) -> T {
        if !self.purger.is_enabled() {
            return response;
        }

        if self.debug {
            tracing::debug!("interceptor triggered for handler: {}", handler);
        }

        let queries = self.registry.lookup_queries(handler).filter(|q| !q.is_empty());
        let declaration = self.registry.lookup_type(handler).filter(|d| !d.type_name.is_empty());

        if queries.is_none() && declaration.is_none() {
            return response;
        }

        let purge_queries = async {
            let queries = queries?;
            if self.debug {
                tracing::debug!("queries from metadata: {:?}", queries);
            }
            Some(self.purger.purge_queries(queries).await)
        };

        let purge_type = async {
            let declaration = declaration?;
            if self.debug {
                tracing::debug!("type from metadata: {:?}", declaration);
            }
            let outcome = match serde_json::to_value(&response) {
                Ok(payload) => {
                    self.purger
                        .purge_type(&declaration.type_name, declaration.id_reference.as_deref(), &payload)
                        .await
                }
                Err(e) => {
                    tracing::error!(%handler, "cannot serialize response for type purge: {}", e);
                    Err(PurgeError::Payload(e.to_string()))
                }
            };
            Some(outcome)
        };

        let (queries_outcome, type_outcome) = tokio::join!(purge_queries, purge_type);

        report(handler, "query", queries_outcome);
        report(handler, "type", type_outcome);

        response
    }

    /// Compose the interceptor around an async handler function.
    pub fn wrap<A, T, E, H, Fut>(
        self: Arc<Self>, handler: impl Into<HandlerId>, f: H,
    ) -> impl Fn(A) -> HandlerFuture<T, E> + Send + Sync + 'static
    where
        A: 'static,
        H: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + Send + Sync + 'static,
        E: Send + 'static,
    {
        let handler = handler.into();
        move |args: A| -> HandlerFuture<T, E> {
            let interceptor = Arc::clone(&self);
            let handler = handler.clone();
            let fut = f(args);
            Box::pin(async move { interceptor.intercept(&handler, fut).await })
        }
    }
}

fn report(handler: &HandlerId, kind: &str, outcome: Option<PurgeOutcome>) {
    if let Some(Err(err)) = outcome {
        tracing::warn!(%handler, kind, "purge failed, response delivered anyway: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Queries(Vec<String>),
        Type { type_name: String, id_reference: Option<String>, payload: Value },
    }

    #[derive(Default)]
    struct RecordingPurger {
        disabled: bool,
        fail_queries: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingPurger {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Purger for RecordingPurger {
        fn is_enabled(&self) -> bool {
            !self.disabled
        }

        async fn purge_queries(&self, queries: &[String]) -> PurgeOutcome {
            self.calls.lock().unwrap().push(Call::Queries(queries.to_vec()));
            if self.fail_queries { Err(PurgeError::HttpError { status: 500 }) } else { Ok(()) }
        }

        async fn purge_type(&self, type_name: &str, id_reference: Option<&str>, payload: &Value) -> PurgeOutcome {
            self.calls.lock().unwrap().push(Call::Type {
                type_name: type_name.to_string(),
                id_reference: id_reference.map(str::to_string),
                payload: payload.clone(),
            });
            Ok(())
        }
    }

    fn registry() -> Arc<PurgeRegistry> {
        let mut registry = PurgeRegistry::new();
        registry
            .declare_queries("upvotePost", ["allPosts", "feed"])
            .declare_type("updatePost", "post", Some("id"))
            .declare_queries("publishPost", ["allPosts"])
            .declare_type("publishPost", "post", Some("id"))
            .declare_queries("noop", Vec::<String>::new())
            .declare_type("untyped", "", Some("id"));
        Arc::new(registry)
    }

    fn interceptor(purger: &Arc<RecordingPurger>) -> PurgeInterceptor {
        let purger: Arc<dyn Purger> = purger.clone();
        PurgeInterceptor::new(registry(), purger).with_debug(true)
    }

    #[tokio::test]
    async fn test_queries_purged_once_with_full_list() {
        let purger = Arc::new(RecordingPurger::default());
        let response = interceptor(&purger).after_success(&"upvotePost".into(), "upvoted:42").await;

        assert_eq!(response, "upvoted:42");
        assert_eq!(purger.calls(), vec![Call::Queries(vec!["allPosts".into(), "feed".into()])]);
    }

    #[tokio::test]
    async fn test_type_purge_receives_payload() {
        let purger = Arc::new(RecordingPurger::default());
        let response = interceptor(&purger)
            .after_success(&"updatePost".into(), json!({"id": "A1"}))
            .await;

        assert_eq!(response, json!({"id": "A1"}));
        assert_eq!(
            purger.calls(),
            vec![Call::Type { type_name: "post".into(), id_reference: Some("id".into()), payload: json!({"id": "A1"}) }]
        );
    }

    #[tokio::test]
    async fn test_query_failure_does_not_skip_type_purge() {
        let purger = Arc::new(RecordingPurger { fail_queries: true, ..Default::default() });
        let response = interceptor(&purger)
            .after_success(&"publishPost".into(), json!({"id": "P9"}))
            .await;

        assert_eq!(response, json!({"id": "P9"}));
        let calls = purger.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&Call::Queries(vec!["allPosts".into()])));
        assert!(calls.iter().any(|c| matches!(c, Call::Type { type_name, .. } if type_name == "post")));
    }

    #[tokio::test]
    async fn test_disabled_purger_is_pass_through() {
        let purger = Arc::new(RecordingPurger { disabled: true, ..Default::default() });
        let response = interceptor(&purger)
            .after_success(&"publishPost".into(), json!({"id": "P9"}))
            .await;

        assert_eq!(response, json!({"id": "P9"}));
        assert!(purger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_undeclared_and_empty_declarations_dispatch_nothing() {
        let purger = Arc::new(RecordingPurger::default());
        let interceptor = interceptor(&purger);

        assert_eq!(interceptor.after_success(&"ping".into(), "pong").await, "pong");
        assert_eq!(interceptor.after_success(&"noop".into(), "done").await, "done");
        let response = interceptor.after_success(&"untyped".into(), json!({"id": "A1"})).await;
        assert_eq!(response, json!({"id": "A1"}));
        assert!(purger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_handler_error_skips_purge() {
        let purger = Arc::new(RecordingPurger::default());
        let result: Result<String, String> = interceptor(&purger)
            .intercept(&"upvotePost".into(), async { Err("boom".to_string()) })
            .await;

        assert_eq!(result, Err("boom".to_string()));
        assert!(purger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_intercept_success() {
        let purger = Arc::new(RecordingPurger::default());
        let result: Result<&str, String> =
            interceptor(&purger).intercept(&"upvotePost".into(), async { Ok("upvoted:7") }).await;

        assert_eq!(result, Ok("upvoted:7"));
        assert_eq!(purger.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_wrap_composes_around_handler() {
        let purger = Arc::new(RecordingPurger::default());
        let update_post = Arc::new(interceptor(&purger)).wrap("updatePost", |id: String| async move {
            Ok::<_, String>(json!({ "id": id }))
        });

        let response = update_post("A1".to_string()).await;

        assert_eq!(response, Ok(json!({"id": "A1"})));
        assert!(matches!(&purger.calls()[..], [Call::Type { payload, .. }] if payload == &json!({"id": "A1"})));
    }
}
