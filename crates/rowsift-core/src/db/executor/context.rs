///
/// ExecutionContext
///
/// Opaque per-execution resource bundle handed to `RowSource::prepare`.
/// Row sources forward it unchanged to their delegates.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecutionContext {
    execution_id: u64,
}

impl ExecutionContext {
    #[must_use]
    pub const fn new(execution_id: u64) -> Self {
        Self { execution_id }
    }

    #[must_use]
    pub const fn execution_id(&self) -> u64 {
        self.execution_id
    }
}
