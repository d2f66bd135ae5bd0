use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, PrimaryKeyTrait, QuerySelect, Select, SqlErr,
};

use quill_core::domain::{Page, PageRequest};
use quill_core::error::RepoError;

/// Generic PostgreSQL repository over a SeaORM entity.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Give back the connection, e.g. to read a mock transaction log.
    pub fn into_inner(self) -> DbConn {
        self.db
    }

    pub(crate) async fn fetch_by_id<T>(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<Option<T>, RepoError>
    where
        T: From<E::Model>,
    {
        let result = E::find_by_id(id).one(&self.db).await.map_err(repo_err)?;
        Ok(result.map(Into::into))
    }

    /// Insert and return the row as stored, including database-side
    /// defaults and trigger rewrites (`INSERT ... RETURNING`).
    pub(crate) async fn insert_returning<T, A>(&self, active_model: A) -> Result<T, RepoError>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
        T: From<E::Model>,
    {
        let model = active_model.insert(&self.db).await.map_err(repo_err)?;
        Ok(model.into())
    }

    pub(crate) async fn fetch_all<T>(&self, select: Select<E>) -> Result<Vec<T>, RepoError>
    where
        T: From<E::Model>,
    {
        let rows = select.all(&self.db).await.map_err(repo_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub(crate) async fn fetch_page<T>(
        &self,
        select: Select<E>,
        request: PageRequest,
    ) -> Result<Page<T>, RepoError>
    where
        E::Model: Sync,
        T: From<E::Model>,
    {
        let total = select.clone().count(&self.db).await.map_err(repo_err)?;
        let rows = select
            .offset(request.offset())
            .limit(request.per_page())
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            total,
            request,
        ))
    }
}

/// Map a SeaORM error onto the repository taxonomy, keeping the driver's message.
pub(crate) fn repo_err(err: DbErr) -> RepoError {
    match &err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        DbErr::RecordNotFound(_) => RepoError::NotFound,
        _ => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_))
            | Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                RepoError::Constraint(err.to_string())
            }
            _ => RepoError::Query(err.to_string()),
        },
    }
}
