use colorbook_core::types::DbId;

/// Who a generation request is made on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// An end user whose quota or credits pay for the images.
    User { user_id: DbId },
    /// A trusted caller (service key or administrator). Unmetered and
    /// untracked.
    System,
}

impl Caller {
    /// User id of a metered caller.
    pub fn metered_user(&self) -> Option<DbId> {
        match self {
            Self::User { user_id } => Some(*user_id),
            Self::System => None,
        }
    }
}
