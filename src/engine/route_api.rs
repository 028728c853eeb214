use async_trait::async_trait;
use tokio::time::{error::Elapsed, timeout};

use super::Engine;
use crate::{
    api::RouteService,
    db::RouteStore,
    entities::{validate_endpoints, EndpointInput, EndpointRole},
    error::{timeout_error, Error},
};

/// Outcome of the timed part of a unit: either a unit ready to commit, or
/// the classified failure plus whatever unit is left to roll back.
type Prepared<U> = Result<Result<U, (Option<U>, Error)>, Elapsed>;

#[async_trait]
impl<S> RouteService for Engine<S>
where
    S: RouteStore + Send + Sync,
{
    /// Replaces the current route query: validate, then open a unit, clear,
    /// insert both endpoints, and recompute the derived path. Rejected
    /// input never reaches the store; any in-unit failure rolls the whole
    /// unit back, leaving the previously committed state untouched. The
    /// deadline covers everything from lock acquisition through
    /// recomputation, so a request stuck behind another writer aborts
    /// instead of waiting forever.
    #[tracing::instrument(skip(self))]
    async fn set_route(
        &self,
        start: Option<EndpointInput>,
        end: Option<EndpointInput>,
    ) -> Result<(), Error> {
        let (start, end) = validate_endpoints(start, end)?;

        let prepared = timeout(self.unit_timeout, async {
            let mut unit = self.store.begin().await.map_err(|err| (None, err))?;

            let steps = async {
                self.store.clear(&mut unit).await?;
                self.store
                    .insert(&mut unit, start, EndpointRole::Start)
                    .await?;
                self.store.insert(&mut unit, end, EndpointRole::End).await?;
                self.store.recompute_path(&mut unit).await
            };

            match steps.await {
                Ok(()) => Ok(unit),
                Err(err) => Err((Some(unit), err)),
            }
        })
        .await;

        self.finish(prepared).await
    }

    /// Empties the endpoint set and recomputes the (now empty) derived
    /// path, with the same deadline and commit-or-rollback behavior as
    /// `set_route`.
    #[tracing::instrument(skip(self))]
    async fn clear_route(&self) -> Result<(), Error> {
        let prepared = timeout(self.unit_timeout, async {
            let mut unit = self.store.begin().await.map_err(|err| (None, err))?;

            let steps = async {
                self.store.clear(&mut unit).await?;
                self.store.recompute_path(&mut unit).await
            };

            match steps.await {
                Ok(()) => Ok(unit),
                Err(err) => Err((Some(unit), err)),
            }
        })
        .await;

        self.finish(prepared).await
    }
}

impl<S> Engine<S>
where
    S: RouteStore + Send + Sync,
{
    async fn finish(&self, prepared: Prepared<S::Unit>) -> Result<(), Error> {
        match prepared {
            Ok(Ok(unit)) => self.store.commit(unit).await,
            Ok(Err((Some(unit), err))) => self.abort(unit, err).await,
            Ok(Err((None, err))) => Err(err),
            // The timed-out future was dropped mid-flight along with its
            // unit; dropping an uncommitted unit rolls it back.
            Err(_) => Err(timeout_error()),
        }
    }

    async fn abort(&self, unit: S::Unit, err: Error) -> Result<(), Error> {
        if let Err(rollback_err) = self.store.rollback(unit).await {
            tracing::error!(
                ?rollback_err,
                "rollback failed after aborted route transaction"
            );
        }

        Err(err)
    }
}
