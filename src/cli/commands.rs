use super::{Command, assignment_value, parse_assignment};
use anyhow::{Context, Result, anyhow};
use crewboard::config::BoardConfig;
use crewboard::controller::CollectionController;
use crewboard::core::RecordId;
use crewboard::query::SortSpec;
use crewboard::screens::{self, Screen};
use crewboard::session::{AppSession, Role};
use crewboard::settings::{AuditLog, SettingsStore};
use crewboard::storage::{FileKeyValueStore, KeyValueStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Local storage plus the logged-in session every command runs under.
pub struct Workspace {
    config: BoardConfig,
    kv: Arc<dyn KeyValueStore>,
    session: AppSession,
}

impl Workspace {
    pub fn open(config: BoardConfig, session: AppSession) -> Result<Self> {
        let kv = FileKeyValueStore::open(&config.data_dir).with_context(|| {
            format!("failed to open local storage at '{}'", config.data_dir.display())
        })?;
        info!(data_dir = %config.data_dir.display(), user = %session.user().username, "workspace opened");
        Ok(Self {
            config,
            kv: Arc::new(kv),
            session,
        })
    }

    pub fn into_session(self) -> AppSession {
        self.session
    }

    /// Controller for `screen`, restored from local storage or seeded from
    /// the mock fixture on first use.
    pub async fn controller(&self, screen: Screen) -> Result<CollectionController> {
        self.session.require_screen(screen)?;

        let ttl = chrono::Duration::from_std(self.config.notification_ttl)
            .context("notification ttl is out of range")?;
        let controller = screens::controller_for(screen, self.config.page_size, self.config.page_window)?;
        let key = self.config.collection_key(&controller.spec().name);

        let mut controller = controller
            .with_notification_ttl(ttl)
            .with_persistence(Arc::clone(&self.kv), key)?
            .with_audit(self.audit_log())
            .with_actor(self.session.user().username.clone());

        controller
            .load_from(&screens::mock_source(screen, self.config.simulated_latency))
            .await?;
        Ok(controller)
    }

    pub fn audit_log(&self) -> AuditLog {
        AuditLog::new(Arc::clone(&self.kv), self.config.audit_key())
    }

    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(Arc::clone(&self.kv), &self.config.namespace)
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Screens { role } => self.screens(role.unwrap_or(self.session.role())),
            Command::List { screen, search, filters, page, sort } => {
                self.list(screen, search, &filters, page, sort.as_deref()).await
            }
            Command::Add { screen, assignments } => self.add(screen, &assignments).await,
            Command::Edit { screen, id, assignments } => {
                self.edit(screen, RecordId::new(id), &assignments).await
            }
            Command::Delete { screen, id } => self.delete(screen, RecordId::new(id)).await,
            Command::Settings { assignments } => self.update_settings(&assignments),
            Command::Audit { limit } => {
                let entries = self.audit_log().entries()?;
                print_json(&entries.into_iter().take(limit).collect::<Vec<_>>())
            }
        }
    }

    fn screens(&self, role: Role) -> Result<()> {
        for screen in role.navigation() {
            println!("{:<10} {}", screen.slug(), screen.title());
        }
        Ok(())
    }

    async fn list(
        &self,
        screen: Screen,
        search: Option<String>,
        filters: &[String],
        page: usize,
        sort: Option<&str>,
    ) -> Result<()> {
        let mut controller = self.controller(screen).await?;

        if let Some(term) = search {
            controller.set_search_term(term);
        }
        for raw in filters {
            let (field, value) = parse_assignment(raw)?;
            controller.set_filter(&field, value)?;
        }
        if let Some(raw) = sort {
            let spec = SortSpec::parse(raw)
                .ok_or_else(|| anyhow!("expected field or field:desc, got '{}'", raw))?;
            controller.set_sort(Some(spec));
        }
        if page != 1 && !controller.go_to_page(page) {
            return Err(anyhow!(
                "page {} is out of range (1..={})",
                page,
                controller.total_pages().max(1)
            ));
        }

        print_json(&controller.view())
    }

    async fn add(&self, screen: Screen, assignments: &[String]) -> Result<()> {
        let mut controller = self.controller(screen).await?;
        controller.open_create_editor()?;
        apply_assignments(&mut controller, assignments)?;
        let record = self.save(&mut controller).await?;
        print_json(&record.to_json())
    }

    async fn edit(&self, screen: Screen, id: RecordId, assignments: &[String]) -> Result<()> {
        let mut controller = self.controller(screen).await?;
        controller.open_edit_editor(id)?;
        apply_assignments(&mut controller, assignments)?;
        let record = self.save(&mut controller).await?;
        print_json(&record.to_json())
    }

    async fn delete(&self, screen: Screen, id: RecordId) -> Result<()> {
        let mut controller = self.controller(screen).await?;
        controller.request_delete(id)?;
        let removed = controller.confirm_delete()?;
        println!("Deleted {} {}", controller.spec().name, removed.id());
        Ok(())
    }

    async fn save(&self, controller: &mut CollectionController) -> Result<crewboard::core::Record> {
        let saved = controller
            .save_draft_with_latency(self.config.simulated_latency)
            .await;
        saved.map_err(|err| {
            let details: Vec<String> = controller
                .field_errors()
                .iter()
                .map(|(field, message)| format!("  {}: {}", field, message))
                .collect();
            if details.is_empty() {
                anyhow!(err)
            } else {
                anyhow!("{}\n{}", err, details.join("\n"))
            }
        })
    }

    fn update_settings(&self, assignments: &[String]) -> Result<()> {
        self.session.require_screen(Screen::Settings)?;
        let store = self.settings();
        let mut settings = store.load()?;
        if !assignments.is_empty() {
            for raw in assignments {
                let (field, value) = parse_assignment(raw)?;
                settings.set_field(&field, &value)?;
            }
            store.save(&settings)?;
        }
        print_json(&settings)
    }
}

fn apply_assignments(controller: &mut CollectionController, assignments: &[String]) -> Result<()> {
    for raw in assignments {
        let (field, value) = parse_assignment(raw)?;
        controller.update_draft_field(&field, assignment_value(&value))?;
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewboard::session::DemoAuthenticator;

    async fn workspace(dir: &std::path::Path, user: &str, password: &str) -> Workspace {
        let auth = DemoAuthenticator::new().unwrap();
        let session = AppSession::login(&auth, user, password).await.unwrap();
        Workspace::open(BoardConfig::default().data_dir(dir), session).unwrap()
    }

    #[tokio::test]
    async fn test_add_persists_across_workspaces() {
        let dir = tempfile::tempdir().unwrap();
        let first = workspace(dir.path(), "admin", "admin123").await;
        first
            .run(Command::Add {
                screen: Screen::Tickets,
                assignments: vec!["subject=Printer jam".into(), "requester=Ada".into()],
            })
            .await
            .unwrap();

        let second = workspace(dir.path(), "employee", "employee123").await;
        let controller = second.controller(Screen::Tickets).await.unwrap();
        assert_eq!(controller.store().len(), 9);
        assert_eq!(
            controller.store().list()[0].get_str("subject"),
            Some("Printer jam")
        );
        assert_eq!(second.audit_log().entries().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_role_gates_screens() {
        let dir = tempfile::tempdir().unwrap();
        let employee = workspace(dir.path(), "employee", "employee123").await;
        assert!(employee.controller(Screen::Users).await.is_err());
        assert!(employee.controller(Screen::Tasks).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_add_reports_field_errors() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path(), "admin", "admin123").await;
        let err = ws
            .run(Command::Add {
                screen: Screen::Users,
                assignments: vec!["name=Ada".into(), "email=nope".into()],
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("email"));
    }
}
