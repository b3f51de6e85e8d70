// Pager - windowed reads returning Page (with total) or Slice (without)

use crate::error::map_sqlx_error;
use crate::query::{member_order_by, push_predicate};
use roster_core::domain::{MemberPredicate, Page, PageRequest, Slice};
use roster_core::error::{AppError, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use tracing::debug;

/// Content and count statements for one paged read.
///
/// Both are declared separately: the count never has to repeat the joins the
/// content needs. Neither carries a WHERE, ORDER BY or LIMIT clause; member
/// must be aliased `m` in both.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PagedQuery {
    pub content: &'static str,
    pub count: &'static str,
}

/// Fetch one window plus the total element count.
///
/// The count statement is skipped when the window itself determines the
/// total (see `PageRequest::derive_total`).
pub(crate) async fn fetch_page<R, T>(
    conn: &mut SqliteConnection,
    query: PagedQuery,
    predicate: &MemberPredicate,
    request: &PageRequest,
    convert: impl Fn(R) -> T,
) -> Result<Page<T>>
where
    R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let rows: Vec<R> = fetch_window(
        conn,
        query,
        predicate,
        request,
        u64::from(request.limit()),
    )
    .await?;

    let total = match request.derive_total(rows.len()) {
        Some(total) => {
            debug!(page = request.page(), total = total, "Count query elided");
            total
        }
        None => count(conn, query, predicate).await?,
    };

    let content = rows.into_iter().map(convert).collect();
    Ok(Page::new(content, request, total))
}

/// Fetch one window without counting; reads `size + 1` rows to learn `has_next`
pub(crate) async fn fetch_slice<R, T>(
    conn: &mut SqliteConnection,
    query: PagedQuery,
    predicate: &MemberPredicate,
    request: &PageRequest,
    convert: impl Fn(R) -> T,
) -> Result<Slice<T>>
where
    R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let rows: Vec<R> = fetch_window(
        conn,
        query,
        predicate,
        request,
        u64::from(request.limit()) + 1,
    )
    .await?;

    let content = rows.into_iter().map(convert).collect();
    Ok(Slice::from_overfetch(content, request))
}

/// Fetch one window and nothing else: no count, no over-fetch
pub(crate) async fn fetch_list<R, T>(
    conn: &mut SqliteConnection,
    query: PagedQuery,
    predicate: &MemberPredicate,
    request: &PageRequest,
    convert: impl Fn(R) -> T,
) -> Result<Vec<T>>
where
    R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let rows: Vec<R> = fetch_window(
        conn,
        query,
        predicate,
        request,
        u64::from(request.limit()),
    )
    .await?;

    Ok(rows.into_iter().map(convert).collect())
}

async fn fetch_window<R>(
    conn: &mut SqliteConnection,
    query: PagedQuery,
    predicate: &MemberPredicate,
    request: &PageRequest,
    limit: u64,
) -> Result<Vec<R>>
where
    R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let order_by = member_order_by(request.sort())?;
    let limit = to_sql_int(limit, "limit")?;
    let offset = to_sql_int(request.offset(), "offset")?;

    let mut qb = QueryBuilder::<Sqlite>::new(query.content);
    push_predicate(&mut qb, predicate, "m.");
    qb.push(order_by);
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);

    qb.build_query_as::<R>()
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)
}

async fn count(
    conn: &mut SqliteConnection,
    query: PagedQuery,
    predicate: &MemberPredicate,
) -> Result<u64> {
    let mut qb = QueryBuilder::<Sqlite>::new(query.count);
    push_predicate(&mut qb, predicate, "m.");

    let total: i64 = qb
        .build_query_scalar()
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    Ok(u64::try_from(total).unwrap_or(0))
}

fn to_sql_int(value: u64, what: &str) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| AppError::InvalidArgument(format!("Page {} out of range: {}", what, value)))
}
