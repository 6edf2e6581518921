//! Session and role navigation tests
//!
//! Run with: cargo test --test session_tests

use async_trait::async_trait;
use crewboard::core::{BoardError, Result};
use crewboard::screens::Screen;
use crewboard::session::{AppSession, Authenticator, DemoAuthenticator, Role, User};

/// Accepts any password for a single fixed user.
struct OpenDoor(User);

#[async_trait]
impl Authenticator for OpenDoor {
    async fn authenticate(&self, username: &str, _password: &str) -> Result<User> {
        if username == self.0.username {
            Ok(self.0.clone())
        } else {
            Err(BoardError::Unauthorized(format!("no account '{}'", username)))
        }
    }
}

#[tokio::test]
async fn test_demo_profiles_log_in() {
    let auth = DemoAuthenticator::new().unwrap();
    assert_eq!(auth.usernames(), vec!["admin", "employee", "manager"]);

    for (username, password, role) in [
        ("admin", "admin123", Role::Administrator),
        ("manager", "manager123", Role::Manager),
        ("employee", "employee123", Role::Employee),
    ] {
        let session = AppSession::login(&auth, username, password).await.unwrap();
        assert_eq!(session.role(), role);
        assert_eq!(session.user().username, username);
        assert_eq!(session.navigation(), role.navigation());
        session.logout();
    }
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let auth = DemoAuthenticator::new().unwrap();
    let err = AppSession::login(&auth, "admin", "manager123").await.unwrap_err();
    assert!(matches!(err, BoardError::Unauthorized(_)));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_sessions_are_distinct() {
    let auth = DemoAuthenticator::new().unwrap();
    let first = AppSession::login(&auth, "employee", "employee123").await.unwrap();
    let second = AppSession::login(&auth, "employee", "employee123").await.unwrap();
    assert_ne!(first.id(), second.id());
    assert!(second.started_at() >= first.started_at());
}

#[tokio::test]
async fn test_screen_access_follows_role() {
    let auth = DemoAuthenticator::new().unwrap();
    let admin = AppSession::login(&auth, "admin", "admin123").await.unwrap();
    let manager = AppSession::login(&auth, "manager", "manager123").await.unwrap();
    let employee = AppSession::login(&auth, "employee", "employee123").await.unwrap();

    for screen in Screen::ALL {
        assert!(admin.require_screen(screen).is_ok());
    }

    assert!(manager.can_access(Screen::Reports));
    assert!(matches!(
        manager.require_screen(Screen::Users),
        Err(BoardError::Unauthorized(_))
    ));
    assert!(!manager.can_access(Screen::Roles));

    assert_eq!(
        employee.navigation(),
        &[
            Screen::Dashboard,
            Screen::Tasks,
            Screen::Directory,
            Screen::Tickets,
            Screen::Settings
        ]
    );
    assert!(employee.require_screen(Screen::Reports).is_err());
}

#[tokio::test]
async fn test_custom_authenticator() {
    let door = OpenDoor(User {
        username: "kiosk".to_string(),
        display_name: "Lobby kiosk".to_string(),
        role: Role::Employee,
    });
    let session = AppSession::login(&door, "kiosk", "").await.unwrap();
    assert_eq!(session.user().display_name, "Lobby kiosk");
    assert!(AppSession::login(&door, "admin", "").await.is_err());

    let boxed: Box<dyn Authenticator> = Box::new(door);
    assert!(AppSession::login(boxed.as_ref(), "kiosk", "x").await.is_ok());
}
