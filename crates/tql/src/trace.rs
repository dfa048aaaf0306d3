//! `tracing` events for built queries (feature `tracing`).

use crate::builder::CompiledQuery;
use crate::config::TqlConfig;
use crate::error::TqlError;
use tracing::Level;

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            _ => tracing::trace!($($field)*),
        }
    };
}

pub(crate) fn built(config: &TqlConfig, dialect: &str, compiled: &CompiledQuery) {
    let sql = config.truncate_sql(&compiled.sql);
    emit_at_level!(
        config.log_level,
        target: "tql.sql",
        dialect,
        param_count = compiled.params.len(),
        sql = %sql,
    );
}

pub(crate) fn failed(dialect: &str, err: &TqlError) {
    tracing::warn!(
        target: "tql.sql",
        dialect,
        code = err.code(),
        error = %err,
        "query build failed"
    );
}
