//! Request descriptor assembly and the send pipeline.

use std::sync::Arc;

use serde_json::Value;
use soa_odata::url::encode_component;
use soa_odata::{QueryComposer, QueryOptions, QueryProvider, compose};

use crate::config::RestConfig;
use crate::descriptor::{HttpMethod, RequestDescriptor};
use crate::error::RestError;
use crate::hook::{OnSend, PassThrough};
use crate::transport::Transport;

/// Parameters of a single request, in insertion order.
pub type RequestParams = serde_json::Map<String, Value>;

/// Key whose presence turns a delete into a batched delete sent as POST.
const BATCH_IDS_KEY: &str = "ids";

/// Builds request descriptors against one configured endpoint and dispatches
/// them through an optional [`OnSend`] hook to a [`Transport`].
///
/// Configuration, query provider and hook are fixed at construction, so a
/// builder can be shared across concurrent calls.
pub struct RequestBuilder<T> {
    config: RestConfig,
    transport: T,
    query_provider: Arc<dyn QueryProvider>,
    on_send: Arc<dyn OnSend>,
}

impl<T: Transport> RequestBuilder<T> {
    #[must_use]
    pub fn new(config: RestConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            query_provider: Arc::new(QueryComposer::default()),
            on_send: Arc::new(PassThrough),
        }
    }

    #[must_use]
    pub fn with_query_provider(mut self, provider: Arc<dyn QueryProvider>) -> Self {
        self.query_provider = provider;
        self
    }

    #[must_use]
    pub fn with_on_send(mut self, hook: Arc<dyn OnSend>) -> Self {
        self.on_send = hook;
        self
    }

    #[must_use]
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Descriptor for a GET of `resource`.
    ///
    /// A single parameter is appended as one encoded path segment (`/5`),
    /// several become a query string (`/?a=1&b=2`). Query fragments from
    /// `query` follow.
    #[must_use]
    pub fn build_get(
        &self,
        params: &RequestParams,
        resource: Option<&str>,
        query: Option<&QueryOptions>,
    ) -> RequestDescriptor {
        let resource = self.effective_resource(resource);
        let mut descriptor = self.descriptor(resource, HttpMethod::Get, None);
        append_params(&mut descriptor.path, params);
        if let Some(query) = query {
            compose(self.query_provider.as_ref(), &mut descriptor.path, query);
        }
        descriptor
    }

    #[must_use]
    pub fn build_post(&self, params: &Value, resource: Option<&str>) -> RequestDescriptor {
        let resource = self.effective_resource(resource);
        self.descriptor(resource, HttpMethod::Post, body(params))
    }

    #[must_use]
    pub fn build_put(&self, params: &Value, resource: Option<&str>) -> RequestDescriptor {
        let resource = self.effective_resource(resource);
        self.descriptor(resource, HttpMethod::Put, body(params))
    }

    /// Descriptor for a delete of `resource`.
    ///
    /// When `params` carries a non-null `ids` entry the delete is sent as a
    /// POST of those ids instead.
    #[must_use]
    pub fn build_delete(&self, params: &RequestParams, resource: Option<&str>) -> RequestDescriptor {
        if let Some(ids) = batch_ids(params) {
            return self.build_post(ids, resource);
        }
        let resource = self.effective_resource(resource);
        let mut descriptor = self.descriptor(resource, HttpMethod::Delete, None);
        append_params(&mut descriptor.path, params);
        descriptor
    }

    /// # Errors
    /// Returns [`RestError`] if the send hook rejects the request or the
    /// transport fails.
    pub async fn get(
        &self,
        params: &RequestParams,
        resource: Option<&str>,
        query: Option<&QueryOptions>,
    ) -> Result<Value, RestError> {
        let descriptor = self.build_get(params, resource, query);
        self.send(descriptor, self.effective_resource(resource)).await
    }

    /// # Errors
    /// Returns [`RestError`] if the send hook rejects the request or the
    /// transport fails.
    pub async fn post(&self, params: &Value, resource: Option<&str>) -> Result<Value, RestError> {
        let descriptor = self.build_post(params, resource);
        self.send(descriptor, self.effective_resource(resource)).await
    }

    /// # Errors
    /// Returns [`RestError`] if the send hook rejects the request or the
    /// transport fails.
    pub async fn put(&self, params: &Value, resource: Option<&str>) -> Result<Value, RestError> {
        let descriptor = self.build_put(params, resource);
        self.send(descriptor, self.effective_resource(resource)).await
    }

    /// # Errors
    /// Returns [`RestError`] if the send hook rejects the request or the
    /// transport fails.
    pub async fn delete(
        &self,
        params: &RequestParams,
        resource: Option<&str>,
    ) -> Result<Value, RestError> {
        let descriptor = self.build_delete(params, resource);
        self.send(descriptor, self.effective_resource(resource)).await
    }

    /// Run `descriptor` through the hook once, then through the transport once.
    ///
    /// # Errors
    /// [`RestError::Hook`] when the hook fails (the transport is not called),
    /// [`RestError::Transport`] when delivery fails.
    pub async fn send(
        &self,
        descriptor: RequestDescriptor,
        resource: Option<&str>,
    ) -> Result<Value, RestError> {
        let descriptor = self
            .on_send
            .on_send(descriptor, resource)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "send hook rejected request");
                RestError::Hook(e)
            })?;

        tracing::debug!(
            method = %descriptor.method,
            path = %descriptor.path,
            "dispatching request"
        );

        self.transport
            .send(descriptor)
            .await
            .map_err(RestError::Transport)
    }

    fn effective_resource<'a>(&self, resource: Option<&'a str>) -> Option<&'a str> {
        if self.config.exclude_resource_from_path {
            None
        } else {
            resource
        }
    }

    fn descriptor(
        &self,
        resource: Option<&str>,
        method: HttpMethod,
        data: Option<Value>,
    ) -> RequestDescriptor {
        let mut path = self.config.path.clone();
        match resource {
            Some(r) if r.starts_with('/') => path.push_str(r),
            Some(r) if !r.is_empty() => {
                path.push('/');
                path.push_str(r);
            }
            _ => {}
        }
        RequestDescriptor {
            host: self.config.host.clone(),
            port: self.config.port,
            protocol: self.config.protocol.clone(),
            method,
            path,
            data,
            with_credentials: self.config.with_credentials,
            headers: Vec::new(),
        }
    }
}

fn body(params: &Value) -> Option<Value> {
    if params.is_null() {
        None
    } else {
        Some(params.clone())
    }
}

fn batch_ids(params: &RequestParams) -> Option<&Value> {
    params.get(BATCH_IDS_KEY).filter(|ids| !ids.is_null())
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Append `params` to `path` as a path segment (one entry) or a query string
/// (several entries). Nothing is appended for an empty map.
fn append_params(path: &mut String, params: &RequestParams) {
    let suffix = match params.len() {
        0 => return,
        1 => params
            .values()
            .map(|v| encode_component(&param_text(v)).into_owned())
            .collect::<String>(),
        _ => {
            let pairs: Vec<String> = params
                .iter()
                .map(|(k, v)| format!("{k}={}", encode_component(&param_text(v))))
                .collect();
            format!("?{}", pairs.join("&"))
        }
    };
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(&suffix);
}
