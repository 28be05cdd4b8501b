use model::Schema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DNF_TERMS: usize = 64;

/// SQL flavour used by the relational compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    MySql,
}

/// What the columnar compiler does with predicates it cannot push down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushdownStrategy {
    /// Evaluate them in memory after the scan.
    #[default]
    Split,
    /// Fail compilation.
    Reject,
}

/// Settings shared by all backend compilers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Placeholder and identifier quoting style for relational output
    pub dialect: SqlDialect,
    /// Handling of clauses the columnar pushdown cannot express
    pub pushdown_strategy: PushdownStrategy,
    /// Upper bound on the number of conjunctions in a pushdown filter
    pub max_dnf_terms: usize,
    /// Column types to check the filter against, if known
    pub schema: Option<Schema>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dialect: SqlDialect::default(),
            pushdown_strategy: PushdownStrategy::default(),
            max_dnf_terms: DEFAULT_MAX_DNF_TERMS,
            schema: None,
        }
    }
}

impl CompileOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_pushdown_strategy(mut self, strategy: PushdownStrategy) -> Self {
        self.pushdown_strategy = strategy;
        self
    }

    pub fn with_max_dnf_terms(mut self, max_dnf_terms: usize) -> Self {
        self.max_dnf_terms = max_dnf_terms.max(1);
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }
}
