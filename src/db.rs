use async_trait::async_trait;
use geo_types::Geometry;
use geozero::wkb;
use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres, Transaction};

use crate::config::StoreConfig;
use crate::entities::{EndpointRole, GeoPoint};
use crate::error::{connection_error, recomputation_error, store_error, Error};

type Database = Postgres;

/// The route state store: a persistent endpoint set (0 or 2 points) plus a
/// derived shortest-path artifact regenerated from it.
///
/// All mutating operations run inside a caller-supplied atomic unit. The
/// store does not enforce the 0-or-2 invariant itself; the engine owns the
/// clear/insert/recompute ordering and decides whether the unit commits.
#[async_trait]
pub trait RouteStore {
    type Unit: Send;

    /// Opens one atomic unit, holding exclusive write access to the
    /// endpoint set until it commits or rolls back. Dropping a unit
    /// without committing must discard its writes.
    async fn begin(&self) -> Result<Self::Unit, Error>;

    /// Removes every entry from the endpoint set. Idempotent.
    async fn clear(&self, unit: &mut Self::Unit) -> Result<(), Error>;

    /// Appends one point to the endpoint set under the given role.
    async fn insert(
        &self,
        unit: &mut Self::Unit,
        point: GeoPoint,
        role: EndpointRole,
    ) -> Result<(), Error>;

    /// Regenerates the derived shortest-path artifact from the current
    /// endpoint set. Safe to call when the set is empty. Failures are
    /// classified apart from plain store failures so an unhealthy spatial
    /// engine is distinguishable from an unhealthy store.
    async fn recompute_path(&self, unit: &mut Self::Unit) -> Result<(), Error>;

    async fn commit(&self, unit: Self::Unit) -> Result<(), Error>;

    async fn rollback(&self, unit: Self::Unit) -> Result<(), Error>;
}

pub struct PgRouteStore {
    pool: Pool<Database>,
    srid: i32,
    path_view: String,
}

impl PgRouteStore {
    #[tracing::instrument(name = "PgRouteStore::new", skip_all)]
    pub async fn new(config: &StoreConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(connection_error)?;

        // TODO: move this to migrations
        pool.execute(
            "CREATE TABLE IF NOT EXISTS points \
             (id SERIAL PRIMARY KEY, role VARCHAR NOT NULL, geom geometry(Point) NOT NULL)",
        )
        .await
        .map_err(|err| store_error(err, "failed to initialize the route store"))?;

        Ok(Self {
            pool,
            srid: config.srid,
            path_view: config.path_view.clone(),
        })
    }
}

#[async_trait]
impl RouteStore for PgRouteStore {
    type Unit = Transaction<'static, Database>;

    #[tracing::instrument(skip(self))]
    async fn begin(&self) -> Result<Self::Unit, Error> {
        let mut tx = self.pool.begin().await.map_err(connection_error)?;

        // READ COMMITTED would let two requests interleave their
        // clear/insert steps and tear the endpoint set, so every writer
        // takes the table lock up front.
        tx.execute("LOCK TABLE points IN ACCESS EXCLUSIVE MODE")
            .await
            .map_err(|err| store_error(err, "failed to lock the endpoint set"))?;

        Ok(tx)
    }

    #[tracing::instrument(skip(self, tx))]
    async fn clear(&self, tx: &mut Self::Unit) -> Result<(), Error> {
        tx.execute("DELETE FROM points")
            .await
            .map_err(|err| store_error(err, "failed to clear route data"))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, tx))]
    async fn insert(
        &self,
        tx: &mut Self::Unit,
        point: GeoPoint,
        role: EndpointRole,
    ) -> Result<(), Error> {
        let geometry: Geometry<f64> = point.into();

        tx.execute(
            sqlx::query("INSERT INTO points (role, geom) VALUES ($1, ST_SetSRID($2, $3))")
                .bind(role.name())
                .bind(wkb::Encode(geometry))
                .bind(self.srid),
        )
        .await
        .map_err(|err| store_error(err, "failed to update route data"))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, tx))]
    async fn recompute_path(&self, tx: &mut Self::Unit) -> Result<(), Error> {
        // The view name comes from deployment configuration, not request
        // input, so interpolation is safe here.
        tx.execute(format!("REFRESH MATERIALIZED VIEW {}", self.path_view).as_str())
            .await
            .map_err(recomputation_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self, tx))]
    async fn commit(&self, tx: Self::Unit) -> Result<(), Error> {
        tx.commit()
            .await
            .map_err(|err| store_error(err, "failed to commit the route transaction"))
    }

    #[tracing::instrument(skip(self, tx))]
    async fn rollback(&self, tx: Self::Unit) -> Result<(), Error> {
        tx.rollback()
            .await
            .map_err(|err| store_error(err, "failed to roll back the route transaction"))
    }
}
