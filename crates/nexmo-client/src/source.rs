use std::sync::Arc;

use async_trait::async_trait;
use nexmo_model::BalanceSample;

use crate::errors::BalanceError;

/// Anything that can produce one balance reading per call.
///
/// [`BalanceClient`](crate::BalanceClient) is the HTTP implementation; the collector
/// only depends on this trait.
#[async_trait]
pub trait BalanceSource: Send + Sync + 'static {
    async fn fetch_balance(&self) -> Result<BalanceSample, BalanceError>;
}

#[async_trait]
impl<T> BalanceSource for Arc<T>
where
    T: BalanceSource + ?Sized,
{
    async fn fetch_balance(&self) -> Result<BalanceSample, BalanceError> {
        (**self).fetch_balance().await
    }
}
