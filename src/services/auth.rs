use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AuthError;
use crate::store::{EntityStore, keys};

/// Credential check against whatever identity provider backs the app.
pub trait AuthService {
    fn login(&self, email: &str, password: &str) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// Stand-in provider: any non-empty email and password pass after `delay`.
#[derive(Debug, Clone, Default)]
pub struct LocalAuthService {
    pub delay: Duration,
}

impl LocalAuthService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl AuthService for LocalAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let valid = !email.trim().is_empty() && !password.is_empty();
        tokio::time::sleep(self.delay).await;
        if valid {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Signed-in flag persisted under `isAuthenticated`.
#[derive(Debug)]
pub struct AuthSession {
    store: Arc<EntityStore>,
    authenticated: bool,
}

impl AuthSession {
    pub fn mount(store: Arc<EntityStore>) -> Self {
        let authenticated = store.load::<bool>(keys::IS_AUTHENTICATED);
        Self {
            store,
            authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub async fn login<A: AuthService>(
        &mut self,
        service: &A,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if let Err(e) = service.login(email, password).await {
            log::warn!("Login rejected: {}", e);
            return Err(e);
        }
        self.authenticated = true;
        self.store.save(keys::IS_AUTHENTICATED, &true)?;
        log::info!("Signed in");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.authenticated = false;
        self.store.remove(keys::IS_AUTHENTICATED)?;
        log::info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

    #[tokio::test]
    async fn login_persists_and_logout_clears() {
        let store = Arc::new(EntityStore::in_memory());
        let service = LocalAuthService::default();

        let mut session = AuthSession::mount(Arc::clone(&store));
        assert!(!session.is_authenticated());

        session.login(&service, "me@example.com", "hunter2").await.unwrap();
        assert!(session.is_authenticated());
        assert!(AuthSession::mount(Arc::clone(&store)).is_authenticated());

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(!AuthSession::mount(store).is_authenticated());
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected() {
        let store = Arc::new(EntityStore::in_memory());
        let mut session = AuthSession::mount(store);
        let err = session
            .login(&LocalAuthService::default(), "", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn reads_flag_written_as_text() {
        let backend = MemoryBackend::new();
        backend.insert_raw(keys::IS_AUTHENTICATED, "true");
        let session = AuthSession::mount(Arc::new(EntityStore::new(backend)));
        assert!(session.is_authenticated());
    }
}
