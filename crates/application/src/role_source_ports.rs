use rolekeep_core::AppResult;

/// Raw contents of one role definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinitionFile {
    /// File name, used only in error reports.
    pub name: String,
    /// Undecoded file bytes.
    pub contents: Vec<u8>,
}

/// Source port yielding every role definition file of one load.
pub trait RoleDefinitionSource: Send + Sync {
    /// Returns a human-readable location for logs.
    fn location(&self) -> String;

    /// Reads all definition files in iteration order.
    ///
    /// Any unreadable entry fails the whole read.
    fn read_definitions(&self) -> AppResult<Vec<RoleDefinitionFile>>;
}
