use async_trait::async_trait;

use crate::descriptor::RequestDescriptor;
use crate::error::BoxError;

/// Last stop before a request reaches the transport.
///
/// Runs exactly once per dispatched request. Returning `Err` aborts the call;
/// the returned descriptor is forwarded to the transport verbatim.
#[async_trait]
pub trait OnSend: Send + Sync {
    async fn on_send(
        &self,
        descriptor: RequestDescriptor,
        resource: Option<&str>,
    ) -> Result<RequestDescriptor, BoxError>;
}

/// Forwards every descriptor untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

#[async_trait]
impl OnSend for PassThrough {
    async fn on_send(
        &self,
        descriptor: RequestDescriptor,
        _resource: Option<&str>,
    ) -> Result<RequestDescriptor, BoxError> {
        Ok(descriptor)
    }
}
