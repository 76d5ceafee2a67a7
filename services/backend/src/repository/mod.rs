//! One repository per resource family, each issuing exactly one statement
//! per operation on a connection the caller checked out of the pool.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::PgConnection;
use std::fmt::{Debug, Display};
use validator::Validate;

use crate::errors::{DecodeError, Result};

pub mod audit_repository;
pub mod balance_change_repository;
pub mod bet_repository;
pub mod bookie_repository;
pub mod competition_repository;
pub mod customer_repository;
pub mod customer_stats_repository;
pub mod event_repository;
pub mod money;
pub mod result_repository;
pub mod sport_repository;
pub mod team_repository;

pub use audit_repository::AuditRepository;
pub use balance_change_repository::BalanceChangeRepository;
pub use bet_repository::BetRepository;
pub use bookie_repository::BookieRepository;
pub use competition_repository::CompetitionRepository;
pub use customer_repository::CustomerRepository;
pub use customer_stats_repository::CustomerStatsRepository;
pub use event_repository::EventRepository;
pub use result_repository::ResultRepository;
pub use sport_repository::SportRepository;
pub use team_repository::TeamRepository;

/// Read side of a resource family.
#[async_trait]
pub trait ListRepository {
    /// Singular display name, used in spans and not-found messages
    const RESOURCE: &'static str;

    type Record: Serialize + Send;
    type Filter: DeserializeOwned + Debug + Send + Sync;

    /// All matching rows in the resource's fixed order.
    async fn list(conn: &mut PgConnection, filter: &Self::Filter) -> Result<Vec<Self::Record>>;
}

#[async_trait]
pub trait CreateRepository: ListRepository {
    type Draft: DeserializeOwned + Validate + Send + Sync;

    async fn create(conn: &mut PgConnection, draft: &Self::Draft) -> Result<Self::Record>;
}

/// Resources addressable by a path key (`/api/<plural>/<key>`).
pub trait Keyed {
    type Key: DeserializeOwned + Display + Send + Sync;
}

#[async_trait]
pub trait UpdateRepository: CreateRepository + Keyed {
    /// Replace every mutable field; `None` when no row has `key`.
    async fn update(
        conn: &mut PgConnection,
        key: &Self::Key,
        draft: &Self::Draft,
    ) -> Result<Option<Self::Record>>;
}

#[async_trait]
pub trait DeleteRepository: ListRepository + Keyed {
    /// Number of rows removed; zero is not an error.
    async fn delete(conn: &mut PgConnection, key: &Self::Key) -> Result<u64>;
}

/// Parse an enum-like text column into its closed type.
pub(crate) fn parse_column<T>(column: &'static str, value: &str) -> std::result::Result<T, DecodeError>
where
    T: std::str::FromStr<Err = shared::ValidationError>,
{
    value
        .trim()
        .parse()
        .map_err(|source| DecodeError::Variant { column, source })
}
