//! Accumulated clause state of a query builder.
//!
//! Fragments are stored already rendered for the driver that produced them:
//! select expressions, tables and join conditions are escaped and prefixed,
//! predicates are complete SQL fragments including their connective.

use indexmap::{IndexMap, IndexSet};

use crate::clause::{Connective, JoinType};

/// A compiled predicate fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Connective the fragment was recorded with.
    pub connective: Connective,
    /// Number of fragments recorded before this one.
    pub position: usize,
    /// SQL text; starts with the connective unless `position` is zero.
    pub sql: String,
}

/// A compiled `JOIN` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    /// Join type.
    pub kind: JoinType,
    /// Escaped, prefixed table.
    pub table: String,
    /// Join condition.
    pub condition: String,
}

impl JoinClause {
    /// Render as `<TYPE> JOIN <table> ON <condition>`.
    pub fn to_sql(&self) -> String {
        format!("{} {} ON {}", self.kind.keyword(), self.table, self.condition)
    }
}

/// Mutable clause state between terminal calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuilderState {
    /// Select expressions.
    pub select: Vec<String>,
    /// Source tables.
    pub from: Vec<String>,
    /// Join clauses.
    pub joins: Vec<JoinClause>,
    /// `WHERE` fragments (where, like and regex variants).
    pub predicates: Vec<Predicate>,
    /// `ORDER BY` fragments.
    pub order_by: Vec<String>,
    /// `GROUP BY` columns, without duplicates.
    pub group_by: IndexSet<String>,
    /// `HAVING` fragments.
    pub having: Vec<Predicate>,
    /// `SELECT DISTINCT`.
    pub distinct: bool,
    /// Row limit.
    pub limit: Option<u64>,
    /// Row offset.
    pub offset: Option<u64>,
    /// Column to escaped value pairs for writes.
    pub set: IndexMap<String, String>,
}

impl BuilderState {
    /// Create empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Position the next `WHERE` fragment will be recorded at.
    pub fn next_predicate_position(&self) -> usize {
        self.predicates.len()
    }

    /// Position the next `HAVING` fragment will be recorded at.
    pub fn next_having_position(&self) -> usize {
        self.having.len()
    }

    /// Clear everything a read consumes.
    pub fn reset_select(&mut self) {
        self.select.clear();
        self.from.clear();
        self.joins.clear();
        self.predicates.clear();
        self.order_by.clear();
        self.group_by.clear();
        self.having.clear();
        self.distinct = false;
        self.limit = None;
        self.offset = None;
    }

    /// Clear everything a write consumes.
    pub fn reset_write(&mut self) {
        self.set.clear();
        self.from.clear();
        self.predicates.clear();
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
