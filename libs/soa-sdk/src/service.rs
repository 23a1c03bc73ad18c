//! Resource-bound service facade.

use std::sync::Arc;

use serde_json::Value;
use soa_odata::{Filter, Paginate, QueryOptions};
use soa_pagination::{PaginatedResult, PaginationEngine, ResultEnvelope};
use soa_rest::{RequestBuilder, RequestParams, RestError, Transport};

const DEFAULT_ID_FIELD: &str = "id";

/// Post-processing applied to every GET body before it is returned or paginated.
pub type OnGet = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Result of [`Service::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse {
    /// Response body as returned by the transport
    Raw(Value),
    /// Response run through the bound pagination engine
    Paginated(PaginatedResult),
}

impl ServiceResponse {
    /// Records carried by the response, regardless of shape.
    #[must_use]
    pub fn data(&self) -> &Value {
        match self {
            ServiceResponse::Raw(value) => value,
            ServiceResponse::Paginated(result) => &result.data,
        }
    }
}

/// One REST resource: a [`RequestBuilder`] plus the resource name, the name of
/// the identity field and an optional [`PaginationEngine`].
pub struct Service<T> {
    resource: String,
    id_field: String,
    rest: RequestBuilder<T>,
    pagination: Option<PaginationEngine>,
    on_get: Option<OnGet>,
}

impl<T: Transport> Service<T> {
    #[must_use]
    pub fn new(resource: impl Into<String>, rest: RequestBuilder<T>) -> Self {
        Self {
            resource: resource.into(),
            id_field: DEFAULT_ID_FIELD.to_owned(),
            rest,
            pagination: None,
            on_get: None,
        }
    }

    #[must_use]
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    #[must_use]
    pub fn with_pagination(mut self, engine: PaginationEngine) -> Self {
        self.pagination = Some(engine);
        self
    }

    /// Run `hook` over each GET response body. For paginated reads it sees the
    /// raw envelope, before the count and data fields are extracted.
    #[must_use]
    pub fn with_on_get(mut self, hook: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.on_get = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    #[must_use]
    pub fn rest(&self) -> &RequestBuilder<T> {
        &self.rest
    }

    /// Start a fluent query against this resource.
    #[must_use]
    pub fn query(&self) -> ServiceQuery<'_, T> {
        ServiceQuery {
            service: self,
            options: QueryOptions::new(),
        }
    }

    /// Fetch from the resource.
    ///
    /// When `query` asks for a page and a pagination engine is bound, the
    /// response is returned as a [`PaginatedResult`].
    ///
    /// # Errors
    /// Propagates [`RestError`] from the request builder.
    pub async fn get(
        &self,
        params: &RequestParams,
        query: &QueryOptions,
    ) -> Result<ServiceResponse, RestError> {
        let mut body = self.rest.get(params, Some(self.resource.as_str()), Some(query)).await?;
        if let Some(hook) = &self.on_get {
            body = hook(body);
        }
        match (&query.paginate, &self.pagination) {
            (Some(_), Some(engine)) => {
                let envelope = ResultEnvelope::from_json(body, engine.config());
                Ok(ServiceResponse::Paginated(engine.get(query, envelope)))
            }
            _ => Ok(ServiceResponse::Raw(body)),
        }
    }

    /// # Errors
    /// Propagates [`RestError`] from the request builder.
    pub async fn post(&self, params: &Value) -> Result<Value, RestError> {
        self.rest.post(params, Some(self.resource.as_str())).await
    }

    /// # Errors
    /// Propagates [`RestError`] from the request builder.
    pub async fn put(&self, params: &Value) -> Result<Value, RestError> {
        self.rest.put(params, Some(self.resource.as_str())).await
    }

    /// # Errors
    /// Propagates [`RestError`] from the request builder.
    pub async fn delete(&self, params: &RequestParams) -> Result<Value, RestError> {
        self.rest.delete(params, Some(self.resource.as_str())).await
    }

    /// Create or update: POST when `params` has no identity value, PUT otherwise.
    ///
    /// # Errors
    /// Propagates [`RestError`] from the request builder.
    pub async fn save(&self, params: &Value) -> Result<Value, RestError> {
        if self.is_new(params) {
            tracing::debug!(resource = %self.resource, "saving new entity");
            self.post(params).await
        } else {
            tracing::debug!(resource = %self.resource, "saving existing entity");
            self.put(params).await
        }
    }

    fn is_new(&self, params: &Value) -> bool {
        params.get(&self.id_field).is_none_or(Value::is_null)
    }
}

/// Fluent builder for the [`QueryOptions`] of one [`Service::get`].
///
/// Empty values are ignored rather than producing empty query fragments.
#[must_use]
pub struct ServiceQuery<'a, T> {
    service: &'a Service<T>,
    options: QueryOptions,
}

impl<T: Transport> ServiceQuery<'_, T> {
    /// Set the filter. Reserved (`$`-prefixed) intent keys are dropped first.
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        let filter = match filter.into() {
            Filter::Intent(intent) => Filter::Intent(intent.queryable()),
            expr @ Filter::Expression(_) => expr,
        };
        if !filter.is_empty() {
            self.options.filter = Some(filter);
        }
        self
    }

    pub fn order_by(mut self, field: &str) -> Self {
        if !field.is_empty() {
            self.options.order_by = Some(field.to_owned());
        }
        self
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        if !field.is_empty() {
            self.options.order_by_desc = Some(field.to_owned());
        }
        self
    }

    pub fn top(mut self, top: u64) -> Self {
        if top > 0 {
            self.options.top = Some(top);
        }
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        if skip > 0 {
            self.options.skip = Some(skip);
        }
        self
    }

    pub fn paginate(mut self, paginate: Paginate) -> Self {
        self.options.paginate = Some(paginate);
        self
    }

    /// Paginate with a page number as it arrives from a URL (`"2"`, `"2abc"`);
    /// unparseable input is page 1.
    pub fn paginate_raw(self, page: &str, page_size: u64) -> Self {
        self.paginate(Paginate::from_raw_page(page, page_size))
    }

    #[must_use]
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    #[must_use]
    pub fn into_options(self) -> QueryOptions {
        self.options
    }

    /// # Errors
    /// Propagates [`RestError`] from the request builder.
    pub async fn get(self, params: &RequestParams) -> Result<ServiceResponse, RestError> {
        self.service.get(params, &self.options).await
    }
}
