//! The query builder and session front door.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;

use crate::ast::{Expr, ResultShape, Selector, SortOrder};
use crate::compile::{fixed, predicate, projection, ParamContext, ProjectionPlan};
use crate::dialect::Dialect;
use crate::entity::{Entity, EntityDescriptor, EntityRegistry};
use crate::error::RelqResult;
use crate::log::LogConfig;
use crate::row::{self, Materialize, Record, RowCursor};
use crate::statement::{
    build_count, build_delete, build_insert, build_select, build_update, CallSite, SelectParts,
    Statement,
};

/// Entry point tying together the registry, dialect and logging config.
#[derive(Debug, Default)]
pub struct Session {
    registry: EntityRegistry,
    dialect: Dialect,
    log: LogConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Start a query over `S`.
    pub fn query<S: Entity>(&self) -> RelqResult<Query<S>> {
        Ok(Query {
            descriptor: self.registry.resolve::<S>()?,
            dialect: self.dialect,
            log: self.log.clone(),
            predicate: None,
            order: None,
            skip: None,
            take: None,
            plan: None,
            trace: None,
            _result: PhantomData,
        })
    }

    /// Compile an INSERT for one row.
    pub fn insert<S: Entity>(&self, row: &S) -> RelqResult<Statement> {
        let descriptor = self.registry.resolve::<S>()?;
        let statement = build_insert(
            &descriptor,
            &row.values(),
            None,
            self.dialect.generator().as_ref(),
        );
        self.log.emit(&statement.sql, &statement.params, self.dialect);
        Ok(statement)
    }

    /// Start an UPDATE for one row's values. A predicate must be supplied
    /// before the statement can compile.
    pub fn update<S: Entity>(&self, row: &S) -> RelqResult<Update<S>> {
        Ok(Update {
            descriptor: self.registry.resolve::<S>()?,
            dialect: self.dialect,
            log: self.log.clone(),
            values: row.values(),
            predicate: None,
            trace: None,
            _entity: PhantomData,
        })
    }

    /// Start a DELETE over `S`. A predicate must be supplied before the
    /// statement can compile.
    pub fn delete<S: Entity>(&self) -> RelqResult<Delete<S>> {
        Ok(Delete {
            descriptor: self.registry.resolve::<S>()?,
            dialect: self.dialect,
            log: self.log.clone(),
            predicate: None,
            trace: None,
            _entity: PhantomData,
        })
    }
}

/// Cache key for a compiled query shape: entity plus projection plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementKey {
    pub entity: String,
    pub plan: Option<ProjectionPlan>,
}

impl StatementKey {
    /// Stable text form of the key.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A composable query over source entity `S`, producing results of `R`.
///
/// Builder steps accumulate state; terminals compile without consuming, so
/// one built query can be recompiled or used to read many rows.
#[derive(Debug)]
pub struct Query<S: Entity, R = S> {
    descriptor: Arc<EntityDescriptor>,
    dialect: Dialect,
    log: LogConfig,
    predicate: Option<Expr>,
    order: Option<(String, SortOrder)>,
    skip: Option<u64>,
    take: Option<u64>,
    plan: Option<ProjectionPlan>,
    trace: Option<CallSite>,
    _result: PhantomData<fn() -> (S, R)>,
}

impl<S: Entity, R> Query<S, R> {
    /// Add a predicate; successive filters AND together.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Sort ascending by an entity field. Replaces any earlier sort key.
    pub fn order_by(mut self, field: &str) -> Self {
        self.order = Some((field.to_string(), SortOrder::Asc));
        self
    }

    /// Sort descending by an entity field. Replaces any earlier sort key.
    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order = Some((field.to_string(), SortOrder::Desc));
        self
    }

    pub fn skip(mut self, n: u64) -> Self {
        self.skip = Some(n);
        self
    }

    pub fn take(mut self, n: u64) -> Self {
        self.take = Some(n);
        self
    }

    /// Attach a call-site trace comment to compiled statements.
    pub fn with_trace(mut self, trace: CallSite) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Project into a new result shape. Fixed-value analysis of the current
    /// predicate runs here, so filters that should elide columns must come
    /// before the projection.
    pub fn select<R2>(self, selector: Selector) -> Query<S, R2> {
        let generator = self.dialect.generator();
        let analysis = fixed::analyze(self.predicate.as_ref());
        let plan = projection::compile(&selector, &self.descriptor, &analysis, generator.as_ref());
        Query {
            descriptor: self.descriptor,
            dialect: self.dialect,
            log: self.log,
            predicate: self.predicate,
            order: self.order,
            skip: self.skip,
            take: self.take,
            plan: Some(plan),
            trace: self.trace,
            _result: PhantomData,
        }
    }

    /// Project into a shape-declaring result type by same-name fields.
    pub fn select_auto<R2: ResultShape>(self) -> Query<S, R2> {
        self.select(Selector::auto::<R2>())
    }

    /// Read unprojected rows as [`Record`]s keyed by entity field name.
    pub fn records(self) -> Query<S, Record> {
        Query {
            descriptor: self.descriptor,
            dialect: self.dialect,
            log: self.log,
            predicate: self.predicate,
            order: self.order,
            skip: self.skip,
            take: self.take,
            plan: self.plan,
            trace: self.trace,
            _result: PhantomData,
        }
    }

    /// Compile the SELECT statement.
    pub fn to_select(&self) -> RelqResult<Statement> {
        let generator = self.dialect.generator();
        let mut ctx = ParamContext::new();
        let where_sql = match &self.predicate {
            Some(expr) => Some(predicate::compile_with(
                expr,
                &self.descriptor,
                generator.as_ref(),
                &mut ctx,
            )?),
            None => None,
        };
        let sql = build_select(
            &self.descriptor,
            &SelectParts {
                where_sql: where_sql.as_deref(),
                select_clause: self.plan.as_ref().map(|p| p.select_clause.as_str()),
                order: self.order.as_ref().map(|(f, o)| (f.as_str(), *o)),
                skip: self.skip,
                take: self.take,
                trace: self.trace.as_ref(),
            },
            generator.as_ref(),
        );
        let statement = Statement {
            sql,
            params: ctx.into_params(),
        };
        self.log.emit(&statement.sql, &statement.params, self.dialect);
        Ok(statement)
    }

    /// Compile a COUNT over the same FROM/WHERE.
    pub fn to_count(&self) -> RelqResult<Statement> {
        let generator = self.dialect.generator();
        let mut ctx = ParamContext::new();
        let where_sql = match &self.predicate {
            Some(expr) => Some(predicate::compile_with(
                expr,
                &self.descriptor,
                generator.as_ref(),
                &mut ctx,
            )?),
            None => None,
        };
        let sql = build_count(
            &self.descriptor,
            where_sql.as_deref(),
            self.trace.as_ref(),
            generator.as_ref(),
        );
        let statement = Statement {
            sql,
            params: ctx.into_params(),
        };
        self.log.emit(&statement.sql, &statement.params, self.dialect);
        Ok(statement)
    }

    /// Cache key identifying this query's compiled shape.
    pub fn cache_key(&self) -> StatementKey {
        StatementKey {
            entity: self.descriptor.type_name.clone(),
            plan: self.plan.clone(),
        }
    }
}

impl<S: Entity, R: Materialize> Query<S, R> {
    /// Materialize one fetched row.
    pub fn read_row(&self, cursor: &dyn RowCursor) -> RelqResult<R> {
        match &self.plan {
            Some(plan) => row::read_row(cursor, plan),
            None => {
                let record = row::read_entity(cursor, &self.descriptor)?;
                R::materialize(&record)
            }
        }
    }

    /// Materialize a batch of rows. The first conversion failure aborts and
    /// surfaces as the error.
    pub fn read_rows<'c, I>(&self, cursors: I) -> RelqResult<Vec<R>>
    where
        I: IntoIterator<Item = &'c dyn RowCursor>,
    {
        let mut out = Vec::new();
        for cursor in cursors {
            out.push(self.read_row(cursor)?);
        }
        Ok(out)
    }
}

/// Pending UPDATE: row values captured, awaiting a predicate.
#[derive(Debug)]
pub struct Update<S: Entity> {
    descriptor: Arc<EntityDescriptor>,
    dialect: Dialect,
    log: LogConfig,
    values: Vec<crate::ast::Value>,
    predicate: Option<Expr>,
    trace: Option<CallSite>,
    _entity: PhantomData<fn() -> S>,
}

impl<S: Entity> Update<S> {
    pub fn filter(mut self, expr: Expr) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    pub fn with_trace(mut self, trace: CallSite) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Compile the UPDATE. Fails with `MissingPredicate` when no filter was
    /// supplied.
    pub fn to_statement(&self) -> RelqResult<Statement> {
        let generator = self.dialect.generator();
        let statement = build_update(
            &self.descriptor,
            &self.values,
            self.predicate.as_ref(),
            self.trace.as_ref(),
            generator.as_ref(),
        )?;
        self.log.emit(&statement.sql, &statement.params, self.dialect);
        Ok(statement)
    }
}

/// Pending DELETE, awaiting a predicate.
#[derive(Debug)]
pub struct Delete<S: Entity> {
    descriptor: Arc<EntityDescriptor>,
    dialect: Dialect,
    log: LogConfig,
    predicate: Option<Expr>,
    trace: Option<CallSite>,
    _entity: PhantomData<fn() -> S>,
}

impl<S: Entity> Delete<S> {
    pub fn filter(mut self, expr: Expr) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    pub fn with_trace(mut self, trace: CallSite) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Compile the DELETE. Fails with `MissingPredicate` when no filter was
    /// supplied.
    pub fn to_statement(&self) -> RelqResult<Statement> {
        let generator = self.dialect.generator();
        let statement = build_delete(
            &self.descriptor,
            self.predicate.as_ref(),
            self.trace.as_ref(),
            generator.as_ref(),
        )?;
        self.log.emit(&statement.sql, &statement.params, self.dialect);
        Ok(statement)
    }
}
