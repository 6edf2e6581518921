use crate::core::{Fields, RecordId};
use serde::Serialize;

/// Modal editor lifecycle.
///
/// ```text
/// Closed --open_create_editor--> Creating --save(ok) | cancel--> Closed
/// Closed --open_edit_editor----> Editing  --save(ok) | cancel--> Closed
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditorState {
    #[default]
    Closed,
    Creating {
        draft: Fields,
    },
    Editing {
        original_id: RecordId,
        draft: Fields,
    },
}

impl EditorState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn draft(&self) -> Option<&Fields> {
        match self {
            Self::Closed => None,
            Self::Creating { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub(crate) fn draft_mut(&mut self) -> Option<&mut Fields> {
        match self {
            Self::Closed => None,
            Self::Creating { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn editing_id(&self) -> Option<RecordId> {
        match self {
            Self::Editing { original_id, .. } => Some(*original_id),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Creating { .. } => "creating",
            Self::Editing { .. } => "editing",
        }
    }
}

/// Delete awaiting confirmation. Nothing is removed until confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingDeletion {
    pub target_id: RecordId,
}

/// What a validated save will do once it completes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SaveTarget {
    Create,
    Update(RecordId),
}

/// Handed out by `begin_save` and redeemed by `finish_save`. Tied to the
/// editor session that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    pub(crate) target: SaveTarget,
    pub(crate) draft: Fields,
    pub(crate) session: u64,
}

impl SaveTicket {
    pub fn is_create(&self) -> bool {
        matches!(self.target, SaveTarget::Create)
    }

    pub fn draft(&self) -> &Fields {
        &self.draft
    }
}
