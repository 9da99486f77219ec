/// Problems found while loading or checking a wizard definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to parse definition: {0}")]
    Parse(String),

    #[error("definition does not match schema:\n{}", .issues.join("\n"))]
    Schema { issues: Vec<String> },

    #[error("definition has no steps")]
    NoSteps,

    #[error("step `{0}` has no fields")]
    EmptyStep(String),

    #[error("field id `{0}` must be lowercase snake_case starting with a letter")]
    InvalidFieldId(String),

    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    #[error("`{0}` must allow at least one entry")]
    ZeroCap(String),

    #[error("locale `{locale}` has no options for choice field `{field}`")]
    MissingOptions { locale: String, field: String },

    #[error("dependency rule #{rule} references unknown field `{field}`")]
    UnknownRuleField { rule: usize, field: String },

    #[error("locale `{0}` is not defined")]
    UnknownLocale(String),
}
