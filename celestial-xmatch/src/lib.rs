//! Positional cross-matching of two source tables.
//!
//! Given a table A and a table B that both carry RA/Dec columns in degrees,
//! every row of A is paired with its counterpart(s) in B and the pairs within
//! a separation threshold are merged into a single joined table.
//!
//! Table B is indexed once in an R*-tree over unit-sphere vectors; chord
//! distance is monotonic in angular separation, so the tree needs no special
//! handling at the RA seam or the poles. Reported separations are exact
//! (Vincenty) great-circle distances in arcseconds.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`index`] | [`CoordinateIndex`] nearest and radius queries, [`Neighbor`] |
//! | [`matcher`] | [`match_all`], [`match_one`], [`MatchMode`], [`MatchRecord`] |
//! | [`join`] | [`JoinBuilder`], [`CollisionPolicy`], [`NonMatchPolicy`] |
//! | [`table`] | [`Table`], [`Schema`], [`Value`], delimited-text I/O in [`table::csv`] |
//! | [`config`] | [`CrossMatchConfig`], JSON loading and validation |
//! | [`pipeline`] | [`cross_match`] end to end |
//! | [`summary`] | [`MatchSummary`] separation statistics |
//! | [`errors`] | [`XMatchError`] |
//!
//! # Quick Start
//!
//! ```
//! use celestial_xmatch::{cross_match, CollisionPolicy, ColumnType, CrossMatchConfig, Schema, Table, Value};
//!
//! let schema = Schema::from_pairs([("ra", ColumnType::Float), ("dec", ColumnType::Float)])?;
//! let a = Table::with_rows(schema.clone(), [vec![Value::Float(10.0), Value::Float(5.0)]])?;
//! let b = Table::with_rows(schema, [vec![Value::Float(10.0003), Value::Float(5.0)]])?;
//!
//! let config = CrossMatchConfig::nearest("ra", "dec", "ra", "dec", 2.0, CollisionPolicy::prefix("a_", "b_"));
//! let output = cross_match(&a, &b, &config)?;
//! assert_eq!(output.joined.len(), 1);
//! # Ok::<(), celestial_xmatch::XMatchError>(())
//! ```
//!
//! # Features
//!
//! - **`cli`**: enables the `xmatch` binary for matching CSV files from the
//!   command line.

pub mod config;
pub mod errors;
pub mod index;
pub mod join;
pub mod matcher;
pub mod pipeline;
pub mod summary;
pub mod table;

pub use config::CrossMatchConfig;
pub use errors::{XMatchError, XMatchResult};
pub use index::{CoordinateIndex, Neighbor};
pub use join::{CollisionPolicy, JoinBuilder, NonMatchPolicy, SEPARATION_COLUMN};
pub use matcher::{match_all, match_one, MatchMode, MatchRecord};
pub use pipeline::{cross_match, CrossMatchOutput};
pub use summary::{MatchSummary, SeparationStats};
pub use table::{Column, ColumnType, Schema, Table, Value};
