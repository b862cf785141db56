use chrono::NaiveDate;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

use super::scope::{Page, Scope, ScopeKind};

/// How a table's rows are tied back to a caller scope
#[derive(Debug, Clone, Copy)]
pub enum ScopePath {
    /// The scope value lives on the row itself
    Direct { kind: ScopeKind, column: &'static str },
    /// The scope value lives on an owning row reached through a foreign key
    Owner {
        kind: ScopeKind,
        owner_table: &'static str,
        foreign_key: &'static str,
        owner_column: &'static str,
    },
}

impl ScopePath {
    pub fn kind(&self) -> ScopeKind {
        match self {
            ScopePath::Direct { kind, .. } | ScopePath::Owner { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntityTable {
    pub name: &'static str,
    pub scope: ScopePath,
    /// Tables with a `deleted_at` tombstone; others are deleted physically
    pub soft_delete: bool,
}

/// Users are visible through a store that belongs to the caller's tenant
pub const USERS: EntityTable = EntityTable {
    name: "users",
    scope: ScopePath::Owner {
        kind: ScopeKind::Tenant,
        owner_table: "stores",
        foreign_key: "store_id",
        owner_column: "tenant_id",
    },
    soft_delete: true,
};

pub const STOCKS: EntityTable = EntityTable {
    name: "stocks",
    scope: ScopePath::Direct { kind: ScopeKind::Store, column: "store_id" },
    soft_delete: false,
};

pub const CUSTOMERS: EntityTable = EntityTable {
    name: "customers",
    scope: ScopePath::Direct { kind: ScopeKind::Tenant, column: "tenant_id" },
    soft_delete: true,
};

/// Orders are visible through a customer that belongs to the caller's tenant
pub const ORDERS: EntityTable = EntityTable {
    name: "orders",
    scope: ScopePath::Owner {
        kind: ScopeKind::Tenant,
        owner_table: "customers",
        foreign_key: "customer_id",
        owner_column: "tenant_id",
    },
    soft_delete: false,
};

/// Typed bind parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Int(i64),
    Text(String),
    OptText(Option<String>),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Renders SQL for one table restricted to one caller scope.
/// `$1` is always the scope value; `$2` is the row id for single-row statements.
pub struct ScopedQuery<'a> {
    table: &'a EntityTable,
    scope_value: Uuid,
}

impl<'a> ScopedQuery<'a> {
    pub fn new(table: &'a EntityTable, scope: &Scope) -> Self {
        Self {
            table,
            scope_value: scope.value(table.scope.kind()),
        }
    }

    /// Paginated listing. The scope predicate is applied before LIMIT/OFFSET.
    pub fn select_page(&self, page: Page) -> SqlResult {
        let query = format!(
            "SELECT t.* FROM {} WHERE {} ORDER BY t.\"created_at\", t.\"id\" LIMIT $2 OFFSET $3",
            self.from_clause(),
            self.read_predicate()
        );
        SqlResult {
            query,
            params: vec![
                SqlParam::Uuid(self.scope_value),
                SqlParam::Int(page.limit),
                SqlParam::Int(page.offset),
            ],
        }
    }

    pub fn select_by_id(&self, id: SqlParam) -> SqlResult {
        let query = format!(
            "SELECT t.* FROM {} WHERE {} AND t.\"id\" = $2",
            self.from_clause(),
            self.read_predicate()
        );
        SqlResult {
            query,
            params: vec![SqlParam::Uuid(self.scope_value), id],
        }
    }

    /// Overwrite the given columns on one in-scope row and return the stored result
    pub fn update_by_id(&self, id: SqlParam, changes: Vec<(&'static str, SqlParam)>) -> SqlResult {
        let mut params = vec![SqlParam::Uuid(self.scope_value), id];
        let mut assignments = Vec::with_capacity(changes.len() + 1);
        for (column, value) in changes {
            params.push(value);
            assignments.push(format!("\"{}\" = ${}", column, params.len()));
        }
        assignments.push("\"updated_at\" = now()".to_string());

        let query = format!(
            "UPDATE \"{}\" AS t SET {} WHERE t.\"id\" = $2 AND {}{} RETURNING t.*",
            self.table.name,
            assignments.join(", "),
            self.write_predicate(),
            self.live_rows_only()
        );
        SqlResult { query, params }
    }

    /// Tombstone or physically remove one in-scope row
    pub fn delete_by_id(&self, id: SqlParam) -> SqlResult {
        let query = if self.table.soft_delete {
            format!(
                "UPDATE \"{}\" AS t SET \"deleted_at\" = now() WHERE t.\"id\" = $2 AND {}{}",
                self.table.name,
                self.write_predicate(),
                self.live_rows_only()
            )
        } else {
            format!(
                "DELETE FROM \"{}\" AS t WHERE t.\"id\" = $2 AND {}",
                self.table.name,
                self.write_predicate()
            )
        };
        SqlResult {
            query,
            params: vec![SqlParam::Uuid(self.scope_value), id],
        }
    }

    fn from_clause(&self) -> String {
        match self.table.scope {
            ScopePath::Direct { .. } => format!("\"{}\" AS t", self.table.name),
            ScopePath::Owner { owner_table, foreign_key, .. } => format!(
                "\"{}\" AS t JOIN \"{}\" AS o ON t.\"{}\" = o.\"id\"",
                self.table.name, owner_table, foreign_key
            ),
        }
    }

    fn read_predicate(&self) -> String {
        match self.table.scope {
            ScopePath::Direct { column, .. } => format!("t.\"{}\" = $1", column),
            ScopePath::Owner { owner_column, .. } => format!("o.\"{}\" = $1", owner_column),
        }
    }

    fn write_predicate(&self) -> String {
        match self.table.scope {
            ScopePath::Direct { column, .. } => format!("t.\"{}\" = $1", column),
            ScopePath::Owner { owner_table, foreign_key, owner_column, .. } => format!(
                "t.\"{}\" IN (SELECT \"id\" FROM \"{}\" WHERE \"{}\" = $1)",
                foreign_key, owner_table, owner_column
            ),
        }
    }

    fn live_rows_only(&self) -> &'static str {
        if self.table.soft_delete {
            " AND t.\"deleted_at\" IS NULL"
        } else {
            ""
        }
    }
}

pub fn bind_param_query(
    q: sqlx::query::Query<'_, Postgres, PgArguments>,
    param: SqlParam,
) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    match param {
        SqlParam::Uuid(v) => q.bind(v),
        SqlParam::Int(v) => q.bind(v),
        SqlParam::Text(v) => q.bind(v),
        SqlParam::OptText(v) => q.bind(v),
        SqlParam::Date(v) => q.bind(v),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    param: SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match param {
        SqlParam::Uuid(v) => q.bind(v),
        SqlParam::Int(v) => q.bind(v),
        SqlParam::Text(v) => q.bind(v),
        SqlParam::OptText(v) => q.bind(v),
        SqlParam::Date(v) => q.bind(v),
    }
}
