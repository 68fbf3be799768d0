//! Column types and DDL rendering
//!
//! Identifiers are always emitted quoted and literals always escaped, so
//! names coming from configuration can never terminate the statement.

use std::fmt;

/// Largest precision PostgreSQL accepts for `NUMERIC`
pub const MAX_NUMERIC_PRECISION: u16 = 1000;

/// Column data types understood by the schema helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Exact decimal with `precision` total digits, `scale` of them after the point
    Numeric { precision: u16, scale: u16 },
}

impl ColumnType {
    /// `NUMERIC(precision, scale)`.
    ///
    /// Panics when the bounds are invalid; use it in `const` items so a bad
    /// definition fails to compile.
    pub const fn decimal(precision: u16, scale: u16) -> Self {
        assert!(
            precision >= 1 && precision <= MAX_NUMERIC_PRECISION,
            "NUMERIC precision must be between 1 and 1000"
        );
        assert!(scale <= precision, "NUMERIC scale cannot exceed precision");
        ColumnType::Numeric { precision, scale }
    }

    pub fn precision(&self) -> u16 {
        let ColumnType::Numeric { precision, .. } = *self;
        precision
    }

    pub fn scale(&self) -> u16 {
        let ColumnType::Numeric { scale, .. } = *self;
        scale
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric { precision, scale } => {
                write!(f, "NUMERIC({}, {})", precision, scale)
            }
        }
    }
}

/// Target shape of a column after a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub column_type: ColumnType,
    pub nullable: bool,
    /// `None` clears any existing comment
    pub comment: Option<String>,
}

impl ColumnDefinition {
    /// Nullable column without a comment
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            nullable: true,
            comment: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Quote a PostgreSQL identifier, doubling embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a PostgreSQL string literal, doubling embedded single quotes
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Statements that bring `table.column` to `definition`, in execution order
pub fn alter_column_statements(
    table: &str,
    column: &str,
    definition: &ColumnDefinition,
) -> Vec<String> {
    let table_ident = quote_identifier(table);
    let column_ident = quote_identifier(column);

    let nullability = if definition.nullable {
        "DROP NOT NULL"
    } else {
        "SET NOT NULL"
    };

    let comment = definition
        .comment
        .as_deref()
        .map(quote_literal)
        .unwrap_or_else(|| "NULL".to_string());

    vec![
        format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
            table_ident, column_ident, definition.column_type
        ),
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            table_ident, column_ident, nullability
        ),
        format!(
            "COMMENT ON COLUMN {}.{} IS {}",
            table_ident, column_ident, comment
        ),
    ]
}
