use super::{Collection, DeleteResult, InsertOneResult, UpdateResult};
use crate::{
    domain::{Document, DocumentId, ID_FIELD},
    utils::error_chain_fmt,
};
use serde_json::Value;
use sqlx::{types::Json, PgExecutor, Postgres, QueryBuilder};
use std::fmt::Debug;
use uuid::Uuid;

#[derive(thiserror::Error)]
pub enum StoreError {
    /// A write would give two users the same email.
    #[error("A user with this email already exists.")]
    DuplicateKey(#[source] sqlx::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl StoreError {
    fn from_query(e: sqlx::Error, context: String) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::DuplicateKey(e),
            _ => Self::UnexpectedError(anyhow::Error::new(e).context(context)),
        }
    }
}

/// Which documents of a collection an operation applies to.
#[derive(Debug)]
pub enum Filter<'a> {
    All,
    Id(DocumentId),
    /// String equality on the value at a nested path, e.g. `worker.email`.
    Field {
        path: &'a [&'a str],
        value: &'a str,
    },
}

impl<'a> Filter<'a> {
    pub fn field(path: &'a [&'a str], value: &'a str) -> Self {
        Filter::Field { path, value }
    }

    fn push_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Filter::All => {
                qb.push("TRUE");
            }
            Filter::Id(id) => {
                qb.push("id = ").push_bind(*id.as_ref());
            }
            Filter::Field { path, value } => {
                let path: Vec<String> = path.iter().map(|key| key.to_string()).collect();
                qb.push("doc #>> ")
                    .push_bind(path)
                    .push("::text[] = ")
                    .push_bind(value.to_string());
            }
        }
    }
}

fn select<'q>(collection: Collection, filter: &Filter<'_>) -> QueryBuilder<'q, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT doc || jsonb_build_object('{ID_FIELD}', id) FROM {} WHERE ",
        collection.table()
    ));
    filter.push_to(&mut qb);
    qb
}

#[tracing::instrument(name = "Find one document", skip(executor))]
pub async fn find_one(
    executor: impl PgExecutor<'_>,
    collection: Collection,
    filter: &Filter<'_>,
) -> Result<Option<Value>, StoreError> {
    let mut qb = select(collection, filter);
    qb.push(" LIMIT 1");

    let doc = qb
        .build_query_scalar::<Json<Value>>()
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            StoreError::from_query(e, format!("Failed to fetch a document from `{collection}`."))
        })?
        .map(|Json(doc)| doc);

    Ok(doc)
}

#[tracing::instrument(name = "Find documents", skip(executor))]
pub async fn find(
    executor: impl PgExecutor<'_>,
    collection: Collection,
    filter: &Filter<'_>,
) -> Result<Vec<Value>, StoreError> {
    let mut qb = select(collection, filter);
    qb.push(" ORDER BY created_at");

    let docs = qb
        .build_query_scalar::<Json<Value>>()
        .fetch_all(executor)
        .await
        .map_err(|e| {
            StoreError::from_query(e, format!("Failed to fetch documents from `{collection}`."))
        })?
        .into_iter()
        .map(|Json(doc)| doc)
        .collect();

    Ok(docs)
}

#[tracing::instrument(name = "Insert a document", skip(executor, document))]
pub async fn insert_one(
    executor: impl PgExecutor<'_>,
    collection: Collection,
    document: Document,
) -> Result<InsertOneResult, StoreError> {
    let id = DocumentId::generate();
    let query = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.table());

    sqlx::query(&query)
        .bind(*id.as_ref())
        .bind(Json(document.into_value()))
        .execute(executor)
        .await
        .map_err(|e| {
            StoreError::from_query(e, format!("Failed to insert a document into `{collection}`."))
        })?;

    Ok(InsertOneResult::new(id))
}

/// Shallow-merge `patch` into the first matching document.
///
/// A document only counts as modified when the merge changes it.
#[tracing::instrument(name = "Update a document", skip(executor, patch))]
pub async fn update_one(
    executor: impl PgExecutor<'_>,
    collection: Collection,
    filter: &Filter<'_>,
    patch: Document,
) -> Result<UpdateResult, StoreError> {
    let table = collection.table();
    let patch = Json(patch.into_value());

    let mut qb = QueryBuilder::new(format!(
        "WITH target AS (SELECT id, doc FROM {table} WHERE "
    ));
    filter.push_to(&mut qb);
    qb.push(format!(
        " LIMIT 1 FOR UPDATE), \
        updated AS (UPDATE {table} SET doc = target.doc || "
    ))
    .push_bind(patch.clone())
    .push(format!(
        " FROM target WHERE {table}.id = target.id \
        AND target.doc IS DISTINCT FROM target.doc || "
    ))
    .push_bind(patch)
    .push(format!(
        " RETURNING {table}.id) \
        SELECT (SELECT count(*) FROM target), (SELECT count(*) FROM updated)"
    ));

    let (matched, modified) = qb
        .build_query_as::<(i64, i64)>()
        .fetch_one(executor)
        .await
        .map_err(|e| {
            StoreError::from_query(e, format!("Failed to update a document in `{collection}`."))
        })?;

    Ok(UpdateResult::updated(matched as u64, modified as u64))
}

/// Insert a user, or merge into the one already registered with the same email.
#[tracing::instrument(name = "Upsert a user", skip(executor, document))]
pub async fn upsert_user(
    executor: impl PgExecutor<'_>,
    document: Document,
) -> Result<UpdateResult, StoreError> {
    let (id, inserted): (Uuid, bool) = sqlx::query_as(
        r#"
        INSERT INTO users (id, doc)
        VALUES ($1, $2)
        ON CONFLICT ((doc->>'email')) DO UPDATE
        SET doc = users.doc || EXCLUDED.doc
        RETURNING id, (xmax = 0) AS inserted
        "#,
    )
    .bind(*DocumentId::generate().as_ref())
    .bind(Json(document.into_value()))
    .fetch_one(executor)
    .await
    .map_err(|e| StoreError::from_query(e, "Failed to upsert a user.".into()))?;

    if inserted {
        Ok(UpdateResult::upserted(id.into()))
    } else {
        Ok(UpdateResult::updated(1, 1))
    }
}

#[tracing::instrument(name = "Delete a document", skip(executor))]
pub async fn delete_one(
    executor: impl PgExecutor<'_>,
    collection: Collection,
    filter: &Filter<'_>,
) -> Result<DeleteResult, StoreError> {
    let table = collection.table();
    let mut qb = QueryBuilder::new(format!(
        "DELETE FROM {table} WHERE id IN (SELECT id FROM {table} WHERE "
    ));
    filter.push_to(&mut qb);
    qb.push(" LIMIT 1)");

    let deleted = qb
        .build()
        .execute(executor)
        .await
        .map_err(|e| {
            StoreError::from_query(e, format!("Failed to delete a document from `{collection}`."))
        })?
        .rows_affected();

    Ok(DeleteResult::new(deleted))
}
