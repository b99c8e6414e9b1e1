//! Ordered column declarations for a [`Table`](super::Table).

use std::collections::HashSet;

use serde::Serialize;

use super::value::ColumnType;
use crate::errors::{XMatchError, XMatchResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Column names and types, fixed when a table is created. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// # Errors
    /// [`XMatchError::ColumnCollision`] if a name appears twice.
    pub fn new(columns: Vec<Column>) -> XMatchResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(XMatchError::column_collision(
                    &column.name,
                    "is declared more than once",
                ));
            }
        }
        Ok(Self { columns })
    }

    /// Build from `(name, type)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> XMatchResult<Self>
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, ty)| Column::new(name, ty))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
