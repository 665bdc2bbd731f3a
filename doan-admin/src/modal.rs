//! Detail / edit modal
//!
//! One slot per screen. Opening a second record replaces whatever the slot
//! held; nothing is written back until [`Modal::submit`] succeeds.

use shared::ValidationErrors;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Modal<T> {
    #[default]
    Closed,
    Viewing(T),
    Editing { original: T, draft: T },
}

impl<T: Clone> Modal<T> {
    pub fn open_view(&mut self, item: T) {
        *self = Self::Viewing(item);
    }

    /// Open for editing with the draft seeded from `item`
    pub fn open_edit(&mut self, item: T) {
        *self = Self::Editing {
            draft: item.clone(),
            original: item,
        };
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Record shown by the modal: the draft while editing
    pub fn current(&self) -> Option<&T> {
        match self {
            Self::Closed => None,
            Self::Viewing(item) => Some(item),
            Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn original(&self) -> Option<&T> {
        match self {
            Self::Editing { original, .. } => Some(original),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Close without touching anything
    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }

    /// Validate the draft. On success the modal closes and the candidate is
    /// returned; on failure it stays open with the draft intact.
    pub fn submit<V>(&mut self, validate: V) -> Result<T, ValidationErrors>
    where
        V: FnOnce(&T) -> Result<(), ValidationErrors>,
    {
        let Self::Editing { draft, .. } = self else {
            let mut errors = ValidationErrors::new();
            errors.add("form", "Không có biểu mẫu đang chỉnh sửa");
            return Err(errors);
        };
        validate(draft)?;
        let candidate = draft.clone();
        *self = Self::Closed;
        Ok(candidate)
    }
}
