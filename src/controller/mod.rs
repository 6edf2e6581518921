//! Managed collection controller
//!
//! One controller backs one CRUD screen. It owns the screen's record store,
//! query, page state, editor modal and pending delete confirmation, and
//! republishes a render-ready [`CollectionView`] after every input.
//!
//! # Architecture
//!
//! - `collection_spec.rs` - per-screen configuration
//! - `editor.rs` - editor modal and delete confirmation state
//! - `validation.rs` - draft validation rules
//! - `notify.rs` - single-slot toast notifications
//! - `source.rs` - initial data loading

mod collection_spec;
mod editor;
mod notify;
mod source;
mod validation;

pub use collection_spec::{CollectionSpec, FieldPattern, FilterSpec, NumericRange};
pub use editor::{EditorState, PendingDeletion, SaveTicket};
pub use notify::{Notification, NotificationAction, NotificationCenter, NotificationKind};
pub use source::{DataSource, MockDataSource};
pub use validation::validate_draft;

use crate::core::value::set_path;
use crate::core::{BoardError, Fields, Record, RecordId, Result};
use crate::pager::{PageState, PageView, Pager};
use crate::query::{ALL, Query, QueryEngine, SortSpec};
use crate::settings::{AuditAction, AuditEntry, AuditLog};
use crate::storage::{KeyValueStore, KeyValueStoreExt, RecordStore, StoreEvent, StoreSnapshot};
use chrono::{DateTime, Utc};
use editor::SaveTarget;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{Instrument, Level, event, info_span, warn};

/// Everything a page needs to render one frame of a managed collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionView {
    pub collection: String,
    pub page: PageView<Record>,
    pub query: Query,
    pub filters: Vec<FilterSpec>,
    pub editor: EditorState,
    pub pending_deletion: Option<PendingDeletion>,
    pub field_errors: BTreeMap<String, String>,
    pub notification: Option<Notification>,
    pub loading: bool,
    pub saving: bool,
}

/// Write-back target for the store snapshot.
struct Persistence {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

pub struct CollectionController {
    spec: CollectionSpec,
    store: RecordStore,
    engine: QueryEngine,
    pager: Pager,
    query: Query,
    page: PageState,
    editor: EditorState,
    editor_session: u64,
    pending_deletion: Option<PendingDeletion>,
    field_errors: BTreeMap<String, String>,
    notifications: NotificationCenter,
    results: Vec<RecordId>,
    inbox: Arc<Mutex<Vec<StoreEvent>>>,
    persistence: Option<Persistence>,
    restored: bool,
    audit: Option<AuditLog>,
    actor: String,
    loading: bool,
    saving: bool,
}

impl CollectionController {
    pub fn new(spec: CollectionSpec) -> Self {
        let mut store = RecordStore::new(spec.name.clone())
            .with_insert_position(spec.insert_position)
            .with_unique_fields(spec.unique_fields.iter().cloned())
            .with_defaults(spec.defaults.clone());

        let inbox = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&inbox);
        store.subscribe(move |change: &StoreEvent| {
            if let Ok(mut pending) = sink.lock() {
                pending.push(*change);
            }
        });

        let query = Query {
            sort: spec.sort.clone(),
            ..Query::default()
        };

        Self {
            engine: QueryEngine::new(spec.searchable_fields.iter().cloned()),
            pager: Pager::new(spec.page_window),
            page: PageState::new(spec.page_size),
            query,
            store,
            editor: EditorState::Closed,
            editor_session: 0,
            pending_deletion: None,
            field_errors: BTreeMap::new(),
            notifications: NotificationCenter::default(),
            results: Vec::new(),
            inbox,
            persistence: None,
            restored: false,
            audit: None,
            actor: "system".to_string(),
            loading: false,
            saving: false,
            spec,
        }
    }

    /// Reads the collection from `key` when present, and writes it back there
    /// after every successful mutation.
    pub fn with_persistence(mut self, kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if let Some(snapshot) = kv.get_as::<StoreSnapshot>(&key)? {
            event!(
                Level::DEBUG,
                collection = %self.spec.name,
                key = %key,
                records = snapshot.records.len(),
                "restored collection from local storage"
            );
            self.store.restore(snapshot)?;
            self.restored = true;
        }
        self.persistence = Some(Persistence { kv, key });
        self.reconcile();
        Ok(self)
    }

    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Name recorded in audit entries.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn with_notification_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.notifications = NotificationCenter::new(ttl);
        self
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Seeds the store directly. Ignored when local storage already held
    /// this collection.
    pub fn seed(&mut self, records: Vec<Fields>) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.store.seed(records)?;
        self.after_mutation();
        Ok(())
    }

    /// Fetches the initial collection from `source`, flagging the view as
    /// loading for the duration.
    pub async fn load_from<S>(&mut self, source: &S) -> Result<()>
    where
        S: DataSource + ?Sized,
    {
        if !self.begin_load()? {
            return Ok(());
        }
        let span = info_span!("collection_load", collection = %self.spec.name);
        let fetched = source.fetch().instrument(span.clone()).await;
        span.in_scope(|| self.finish_load(fetched))
    }

    /// First half of a load: marks the view as loading. Returns false when
    /// local storage already supplied the collection and nothing needs
    /// fetching.
    pub fn begin_load(&mut self) -> Result<bool> {
        if self.restored {
            return Ok(false);
        }
        if self.loading {
            return Err(BoardError::invalid_state("a load is already in flight"));
        }
        self.loading = true;
        Ok(true)
    }

    /// Second half of a load: seeds the store from what the source returned
    /// and clears the loading flag. A failed fetch leaves the store as it was
    /// and raises an error notification.
    pub fn finish_load(&mut self, fetched: Result<Vec<Fields>>) -> Result<()> {
        if !self.loading {
            return Err(BoardError::invalid_state("no load is in flight"));
        }
        self.loading = false;

        let outcome = fetched.and_then(|records| {
            let count = records.len();
            self.seed(records)?;
            event!(Level::INFO, collection = %self.spec.name, records = count, "collection loaded");
            Ok(())
        });
        if let Err(err) = &outcome {
            self.notify_error(err);
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Query & paging
    // ------------------------------------------------------------------

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.term = term.into();
        self.page.reset();
        self.recompute();
    }

    /// Sets an equality filter. `"All"` lifts the constraint.
    pub fn set_filter(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let Some(filter) = self.spec.filter_spec(field) else {
            return Err(BoardError::validation(field, "field is not filterable"));
        };
        if !filter.accepts(&value) {
            return Err(BoardError::validation(
                field,
                format!("'{}' is not one of the filter options", value),
            ));
        }

        if value == ALL {
            self.query.filters.remove(field);
        } else {
            self.query.filters.insert(field.to_string(), value);
        }
        self.page.reset();
        self.recompute();
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.query.term.clear();
        self.query.filters.clear();
        self.page.reset();
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.query.sort = sort;
        self.page.reset();
        self.recompute();
    }

    /// Moves to page `n` if it exists; otherwise nothing changes.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        self.reconcile();
        let total = self.total_pages();
        self.page.go_to(n, total)
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page.current_page() + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        match self.page.current_page().checked_sub(1) {
            Some(previous) => self.go_to_page(previous),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Editor
    // ------------------------------------------------------------------

    pub fn open_create_editor(&mut self) -> Result<()> {
        self.ensure_editor_closed("open the create editor")?;
        self.editor_session += 1;
        self.field_errors.clear();
        self.editor = EditorState::Creating {
            draft: self.spec.defaults.clone(),
        };
        Ok(())
    }

    /// Opens the editor on a deep copy of the record; the store is untouched
    /// until save.
    pub fn open_edit_editor(&mut self, id: RecordId) -> Result<()> {
        self.ensure_editor_closed("open the edit editor")?;
        let Some(record) = self.store.get(id) else {
            let err = BoardError::NotFound(id);
            self.notify_error(&err);
            return Err(err);
        };

        let draft = record.fields().clone();
        self.editor_session += 1;
        self.field_errors.clear();
        self.editor = EditorState::Editing {
            original_id: id,
            draft,
        };
        Ok(())
    }

    /// Sets `path` (dotted for nested fields) on the draft. Calling this with
    /// no editor open is a caller bug and fails fast.
    pub fn update_draft_field(&mut self, path: &str, value: JsonValue) -> Result<()> {
        let Some(draft) = self.editor.draft_mut() else {
            return Err(BoardError::invalid_state(format!(
                "cannot set '{}' on '{}': no draft is open",
                path, self.spec.name
            )));
        };
        set_path(draft, path, value)?;
        self.field_errors.remove(path);
        Ok(())
    }

    /// Validates and commits the draft in one step.
    pub fn save_draft(&mut self) -> Result<Record> {
        let ticket = self.begin_save()?;
        self.finish_save(ticket)
    }

    /// Same as [`save_draft`](Self::save_draft) with a simulated round trip
    /// between validation and commit. The view reports `saving` meanwhile.
    pub async fn save_draft_with_latency(&mut self, latency: Duration) -> Result<Record> {
        let ticket = self.begin_save()?;
        tokio::time::sleep(latency).await;
        self.finish_save(ticket)
    }

    /// First half of a save: validates the draft and marks the controller as
    /// saving. A second call before [`finish_save`](Self::finish_save) is
    /// rejected so a double click cannot submit twice.
    pub fn begin_save(&mut self) -> Result<SaveTicket> {
        if self.saving {
            return Err(BoardError::invalid_state("a save is already in flight"));
        }
        let (target, draft) = match &self.editor {
            EditorState::Closed => {
                return Err(BoardError::invalid_state("no draft is open to save"));
            }
            EditorState::Creating { draft } => (SaveTarget::Create, draft.clone()),
            EditorState::Editing { original_id, draft } => {
                (SaveTarget::Update(*original_id), draft.clone())
            }
        };

        let problems = validate_draft(&self.spec, &draft);
        if let Some(err) = validation::first_error(&problems) {
            self.field_errors = problems.into_iter().collect();
            self.notify_error(&err);
            return Err(err);
        }

        self.saving = true;
        Ok(SaveTicket {
            target,
            draft,
            session: self.editor_session,
        })
    }

    /// Second half of a save: applies the ticket to the store and closes the
    /// editor. On failure the editor stays open with the error attached.
    pub fn finish_save(&mut self, ticket: SaveTicket) -> Result<Record> {
        // a stale ticket must not clear the flag of a newer save
        if !self.editor.is_open() || ticket.session != self.editor_session {
            return Err(BoardError::invalid_state(
                "editor was closed before the save completed",
            ));
        }
        self.saving = false;

        let created = ticket.is_create();
        let outcome = match ticket.target {
            SaveTarget::Create => self.store.create(ticket.draft),
            SaveTarget::Update(id) => self.store.update(id, ticket.draft),
        };

        let record = match outcome {
            Ok(record) => record,
            Err(err) => {
                if let Some(field) = err.field() {
                    self.field_errors.insert(field.to_string(), err.to_string());
                }
                self.notify_error(&err);
                return Err(err);
            }
        };

        self.editor = EditorState::Closed;
        self.field_errors.clear();
        if created {
            self.page.reset();
        }
        let persisted = self.after_mutation();

        let (action, message) = if created {
            (AuditAction::Created, "Record created")
        } else {
            (AuditAction::Updated, "Record updated")
        };
        self.audit(action, record.id());
        if persisted {
            self.notifications
                .push(message, NotificationKind::Success, None);
        }
        Ok(record)
    }

    /// Discards the draft. Returns whether an editor was open.
    pub fn cancel_editor(&mut self) -> bool {
        let was_open = self.editor.is_open();
        self.editor = EditorState::Closed;
        self.field_errors.clear();
        self.saving = false;
        was_open
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    /// Asks for confirmation before deleting; nothing is removed yet.
    pub fn request_delete(&mut self, id: RecordId) -> Result<()> {
        if !self.store.contains(id) {
            let err = BoardError::NotFound(id);
            self.notify_error(&err);
            return Err(err);
        }
        self.pending_deletion = Some(PendingDeletion { target_id: id });
        Ok(())
    }

    pub fn confirm_delete(&mut self) -> Result<Record> {
        let Some(pending) = self.pending_deletion.take() else {
            return Err(BoardError::invalid_state("no deletion is pending"));
        };

        match self.store.delete(pending.target_id) {
            Ok(removed) => {
                let persisted = self.after_mutation();
                self.audit(AuditAction::Deleted, removed.id());
                if persisted {
                    self.notifications.push(
                        "Record deleted",
                        NotificationKind::Info,
                        Some(NotificationAction::undo_placeholder()),
                    );
                }
                Ok(removed)
            }
            Err(err) => {
                self.reconcile();
                self.notify_error(&err);
                Err(err)
            }
        }
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.pending_deletion.take().is_some()
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        self.notifications.dismiss(id)
    }

    pub fn expire_notifications(&mut self, now: DateTime<Utc>) -> Option<Notification> {
        self.notifications.expire(now)
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    pub fn spec(&self) -> &CollectionSpec {
        &self.spec
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn pending_deletion(&self) -> Option<PendingDeletion> {
        self.pending_deletion
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.results.len())
    }

    /// Records matching the current query, in display order.
    pub fn results(&self) -> Vec<&Record> {
        self.results
            .iter()
            .filter_map(|id| self.store.get(*id))
            .collect()
    }

    pub fn view(&mut self) -> CollectionView {
        self.reconcile();
        let matched: Vec<Record> = self.results().into_iter().cloned().collect();
        CollectionView {
            collection: self.spec.name.clone(),
            page: self.pager.paginate(&matched, &self.page),
            query: self.query.clone(),
            filters: self.spec.filters.clone(),
            editor: self.editor.clone(),
            pending_deletion: self.pending_deletion,
            field_errors: self.field_errors.clone(),
            notification: self.notifications.current().cloned(),
            loading: self.loading,
            saving: self.saving,
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_editor_closed(&self, action: &str) -> Result<()> {
        if self.editor.is_open() {
            return Err(BoardError::invalid_state(format!(
                "cannot {} while the editor is {}",
                action,
                self.editor.label()
            )));
        }
        Ok(())
    }

    /// Drains store events and, if anything changed, recomputes results.
    fn reconcile(&mut self) {
        let changed = match self.inbox.lock() {
            Ok(mut pending) => {
                let changed = !pending.is_empty();
                for change in pending.drain(..) {
                    if let StoreEvent::Deleted(id) = change {
                        if self.pending_deletion.is_some_and(|p| p.target_id == id) {
                            self.pending_deletion = None;
                        }
                    }
                }
                changed
            }
            Err(_) => true,
        };
        if changed {
            self.recompute();
        }
    }

    /// Re-runs the query and snaps the current page into range.
    fn recompute(&mut self) {
        self.results = self
            .engine
            .apply(self.store.list(), &self.query)
            .into_iter()
            .map(Record::id)
            .collect();
        let total = self.total_pages();
        self.page.clamp(total);
    }

    /// Returns false when the write-back failed; the error notification
    /// then stays up instead of a success message.
    fn after_mutation(&mut self) -> bool {
        self.reconcile();
        self.persist()
    }

    fn persist(&mut self) -> bool {
        let Some(persistence) = &self.persistence else {
            return true;
        };
        if let Err(err) = persistence.kv.set_as(&persistence.key, &self.store.snapshot()) {
            warn!(
                collection = %self.spec.name,
                key = %persistence.key,
                error = %err,
                "failed to write collection back to local storage"
            );
            self.notifications.push(
                format!("Changes could not be saved locally: {}", err),
                NotificationKind::Error,
                None,
            );
            return false;
        }
        true
    }

    fn audit(&self, action: AuditAction, record_id: RecordId) {
        let Some(audit) = &self.audit else {
            return;
        };
        let entry = AuditEntry {
            at: Utc::now(),
            actor: self.actor.clone(),
            collection: self.spec.name.clone(),
            action,
            record_id,
        };
        if let Err(err) = audit.record(entry) {
            warn!(collection = %self.spec.name, error = %err, "failed to append audit entry");
        }
    }

    fn notify_error(&mut self, err: &BoardError) {
        event!(Level::DEBUG, collection = %self.spec.name, error = %err, "operation rejected");
        self.notifications
            .push(err.to_string(), NotificationKind::Error, None);
    }
}

impl fmt::Debug for CollectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionController")
            .field("collection", &self.spec.name)
            .field("records", &self.store.len())
            .field("results", &self.results.len())
            .field("page", &self.page)
            .field("editor", &self.editor.label())
            .field("pending_deletion", &self.pending_deletion)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> CollectionSpec {
        CollectionSpec::new("tasks")
            .searchable(["task.title", "task.department"])
            .filter("status", ["Open", "Done"])
            .required(["task.title"])
            .page_size(5)
    }

    fn seeded(count: usize) -> CollectionController {
        let mut controller = CollectionController::new(spec());
        let records = (1..=count)
            .map(|i| {
                json!({"task": {"title": format!("Task {}", i), "department": "Ops"}, "status": if i % 2 == 0 { "Done" } else { "Open" }})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect();
        controller.seed(records).unwrap();
        controller
    }

    #[test]
    fn test_seed_computes_results() {
        let mut controller = seeded(12);
        assert_eq!(controller.result_count(), 12);
        assert_eq!(controller.total_pages(), 3);
        assert_eq!(controller.view().page.items.len(), 5);
    }

    #[test]
    fn test_edit_draft_is_isolated_from_store() {
        let mut controller = seeded(3);
        let id = controller.store().list()[0].id();
        controller.open_edit_editor(id).unwrap();
        controller
            .update_draft_field("task.title", json!("Changed"))
            .unwrap();

        assert_ne!(
            controller.store().get(id).unwrap().get_str("task.title"),
            Some("Changed")
        );
        assert!(controller.cancel_editor());
        assert_eq!(controller.editor(), &EditorState::Closed);
    }

    #[test]
    fn test_opening_editor_twice_is_invalid() {
        let mut controller = seeded(1);
        controller.open_create_editor().unwrap();
        let err = controller.open_create_editor().unwrap_err();
        assert!(matches!(err, BoardError::InvalidState(_)));
    }

    #[test]
    fn test_set_filter_rejects_unknown_field_and_option() {
        let mut controller = seeded(2);
        assert!(controller.set_filter("priority", "High").is_err());
        assert!(controller.set_filter("status", "Blocked").is_err());
        controller.set_filter("status", "Done").unwrap();
        assert_eq!(controller.result_count(), 1);
        controller.set_filter("status", ALL).unwrap();
        assert_eq!(controller.result_count(), 2);
    }

    #[test]
    fn test_pending_delete_cleared_by_delete() {
        let mut controller = seeded(2);
        let id = controller.store().list()[0].id();
        controller.request_delete(id).unwrap();
        assert_eq!(controller.pending_deletion(), Some(PendingDeletion { target_id: id }));
        controller.confirm_delete().unwrap();
        assert_eq!(controller.pending_deletion(), None);
        assert!(controller.confirm_delete().is_err());
    }
}
