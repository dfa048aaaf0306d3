/// Settings for a [`Tql`](crate::Tql) instance.
///
/// Only affects logging: the SQL and params produced are the same for every
/// configuration.
#[derive(Debug, Clone)]
pub struct TqlConfig {
    /// Tracing event level for successfully built queries.
    #[cfg(feature = "tracing")]
    pub log_level: tracing::Level,
    /// Truncate logged SQL to this many bytes. `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TqlConfig {
    fn default() -> Self {
        Self {
            #[cfg(feature = "tracing")]
            log_level: tracing::Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TqlConfig {
    /// Create a new configuration with defaults (DEBUG, 200 bytes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    #[cfg(feature = "tracing")]
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                format!("{}...", truncate_sql_bytes(sql, max)).into()
            }
            _ => sql.into(),
        }
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
