use super::*;

#[tokio::test]
async fn demo_accounts_resolve_to_roles() {
    let directory = DemoDirectory;
    let doctor = directory.verify("doctor", "doctor").await.expect("doctor");
    assert_eq!(doctor.name, "Dr. Martin");
    assert_eq!(doctor.role, UserRole::Doctor);
    assert_eq!(doctor.id, UserId::new("doc-1"));

    let staff = directory
        .verify("personnel", "personnel")
        .await
        .expect("personnel");
    assert_eq!(staff.name, "Sarah Staff");
    assert_eq!(staff.role, UserRole::Personnel);

    let patient = directory.verify("sophie", "sophie").await.expect("sophie");
    assert_eq!(patient.name, "Sophie Dubois");
    assert_eq!(patient.role, UserRole::Patient);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let directory = DemoDirectory;
    assert_eq!(
        directory.verify("doctor", "sophie").await,
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(
        directory.verify("", "").await,
        Err(AuthError::InvalidCredentials)
    );
}

#[tokio::test]
async fn session_tracks_login_and_logout() {
    let mut session = AuthSession::default();
    assert!(!session.is_authenticated());

    let user = session
        .login(&DemoDirectory, "sophie", "sophie")
        .await
        .expect("login");
    assert_eq!(user.first_name(), "Sophie");
    assert!(session.is_authenticated());

    session.logout();
    assert!(!session.is_authenticated());
    assert_eq!(session.user(), None);
}

#[tokio::test]
async fn failed_login_keeps_current_user() {
    let mut session = AuthSession::default();
    session
        .login(&DemoDirectory, "doctor", "doctor")
        .await
        .expect("login");
    let err = session
        .login(&DemoDirectory, "doctor", "wrong")
        .await
        .expect_err("rejected");
    assert_eq!(
        err.user_message(Language::Fr),
        "Identifiants invalides. Réessayez."
    );
    assert_eq!(session.user().map(|u| u.username.as_str()), Some("doctor"));
}
