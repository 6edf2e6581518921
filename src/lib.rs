// ============================================================================
// Crewboard Library
// ============================================================================

pub mod config;
pub mod controller;
pub mod core;
pub mod pager;
pub mod query;
pub mod screens;
pub mod session;
pub mod settings;
pub mod storage;

// Re-export main types for convenience
pub use config::BoardConfig;
pub use crate::core::{BoardError, Fields, Record, RecordId, Result};

// Re-export the managed collection API
pub use controller::{
    CollectionController, CollectionSpec, CollectionView, DataSource, EditorState, MockDataSource,
    Notification, NotificationKind, PendingDeletion,
};
pub use pager::{PageState, PageView, Pager};
pub use query::{Query, QueryEngine, SortSpec};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, RecordStore};

// ============================================================================
// Quick start
// ============================================================================

/// Controller for `screen` seeded with its mock fixture.
///
/// This is the shortest path to a working list page.
///
/// # Examples
///
/// ```
/// use crewboard::screens::Screen;
///
/// let mut users = crewboard::demo_controller(Screen::Users).unwrap();
/// users.set_search_term("hart");
/// let view = users.view();
/// assert_eq!(view.page.total_items, 1);
/// assert_eq!(view.page.items[0].get_str("name"), Some("Amelia Hart"));
/// ```
pub fn demo_controller(screen: screens::Screen) -> Result<CollectionController> {
    let config = BoardConfig::default();
    let mut controller = screens::controller_for(screen, config.page_size, config.page_window)?;
    controller.seed(screens::mock_records(screen))?;
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::Screen;

    #[test]
    fn test_demo_controller_for_every_collection_screen() {
        for screen in Screen::ALL.into_iter().filter(|s| s.is_collection()) {
            let mut controller = demo_controller(screen).unwrap();
            let view = controller.view();
            assert_eq!(view.page.current_page, 1);
            assert!(view.page.items.len() <= 5);
            assert_eq!(view.page.total_items, screens::mock_records(screen).len());
        }
    }

    #[test]
    fn test_demo_controller_rejects_non_collection_screen() {
        assert!(demo_controller(Screen::Dashboard).is_err());
    }
}
