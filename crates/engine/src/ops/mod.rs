use chrono::FixedOffset;
use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod history;
mod resolver;
mod visibility;

pub use history::ResolvedTransaction;
pub use resolver::{Identity, ResolvedParticipant};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// Offset used to cut timestamps into calendar days when ordering history.
    day_boundary: FixedOffset,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn day_boundary(&self) -> FixedOffset {
        self.day_boundary
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    day_boundary_offset_minutes: Option<i32>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Offset from UTC, in minutes, of the calendar used to group history by
    /// day. Defaults to UTC.
    pub fn day_boundary(mut self, offset_minutes: i32) -> EngineBuilder {
        self.day_boundary_offset_minutes = Some(offset_minutes);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let minutes = self.day_boundary_offset_minutes.unwrap_or(0);
        let day_boundary = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                EngineError::InvalidConfig(format!("invalid day boundary offset: {minutes}"))
            })?;

        Ok(Engine {
            database: self.database,
            day_boundary,
        })
    }
}
