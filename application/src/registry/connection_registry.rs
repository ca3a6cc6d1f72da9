//! Organization id → authenticated session map.
//!
//! Populated on successful login and consulted by every other operation.
//! Entries are never expired; removal only happens through
//! [`ConnectionRegistry::remove`] or [`ConnectionRegistry::remove_if_same`]
//! (used by logout when the dispatch policy asks for eviction).
//!
//! Guarded by a `tokio::sync::RwLock`: lookups from concurrent requests run
//! in parallel, puts and removes are exclusive. The lock is never held across
//! a remote call, since `get` hands out a cloned `Arc`.

use crate::ports::crm_gateway::CrmSession;
use eforce_domain::OrgId;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Lookup of an organization that has no live session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No active session for organization {0}")]
pub struct SessionNotFound(pub OrgId);

/// Process-wide registry of sessions, at most one per organization.
#[derive(Default)]
pub struct ConnectionRegistry {
    sessions: RwLock<HashMap<OrgId, Arc<dyn CrmSession>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session, replacing (and returning) any previous one for the
    /// same organization. The replaced session is not logged out.
    pub async fn put(
        &self,
        org_id: OrgId,
        session: Arc<dyn CrmSession>,
    ) -> Option<Arc<dyn CrmSession>> {
        let mut sessions = self.sessions.write().await;
        let previous = sessions.insert(org_id.clone(), session);
        debug!(
            "Registry: stored session for {} (replaced: {}, total: {})",
            org_id,
            previous.is_some(),
            sessions.len()
        );
        previous
    }

    pub async fn get(&self, org_id: &OrgId) -> Result<Arc<dyn CrmSession>, SessionNotFound> {
        self.sessions
            .read()
            .await
            .get(org_id)
            .cloned()
            .ok_or_else(|| SessionNotFound(org_id.clone()))
    }

    pub async fn remove(&self, org_id: &OrgId) -> Option<Arc<dyn CrmSession>> {
        let removed = self.sessions.write().await.remove(org_id);
        if removed.is_some() {
            debug!("Registry: removed session for {}", org_id);
        }
        removed
    }

    /// Remove the entry for `org_id` only while it still holds `session`.
    ///
    /// A logout must not evict a session that a concurrent re-login stored
    /// after the logged-out one was looked up. Returns whether an entry was
    /// removed.
    pub async fn remove_if_same(&self, org_id: &OrgId, session: &Arc<dyn CrmSession>) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(org_id) {
            Some(current) if Arc::ptr_eq(current, session) => {
                sessions.remove(org_id);
                debug!("Registry: removed session for {}", org_id);
                true
            }
            Some(_) => {
                debug!("Registry: kept newer session for {}", org_id);
                false
            }
            None => false,
        }
    }

    pub async fn contains(&self, org_id: &OrgId) -> bool {
        self.sessions.read().await.contains_key(org_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Connected organizations, sorted.
    pub async fn org_ids(&self) -> Vec<OrgId> {
        let mut ids: Vec<_> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::crm_gateway::GatewayError;
    use async_trait::async_trait;
    use eforce_domain::{
        AccessToken, LimitInfo, QueryResult, SObjectDescribe, SObjectName, SearchResult,
        Session, SoqlQuery, SoslSearch,
    };

    struct StubSession(Session);

    impl StubSession {
        fn new(org: &str, user: &str) -> Arc<dyn CrmSession> {
            Arc::new(Self(Session::new(
                OrgId::new(org).unwrap(),
                user,
                "https://example.my.salesforce.com",
                AccessToken::new("token"),
            )))
        }
    }

    #[async_trait]
    impl CrmSession for StubSession {
        fn session(&self) -> &Session {
            &self.0
        }

        fn limit_info(&self) -> Option<LimitInfo> {
            None
        }

        async fn logout(&self) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn query(&self, _soql: &SoqlQuery) -> Result<QueryResult, GatewayError> {
            Err(GatewayError::Timeout)
        }

        async fn search(&self, _sosl: &SoslSearch) -> Result<SearchResult, GatewayError> {
            Err(GatewayError::Timeout)
        }

        async fn describe(&self, _sobject: &SObjectName) -> Result<SObjectDescribe, GatewayError> {
            Err(GatewayError::Timeout)
        }
    }

    fn org(id: &str) -> OrgId {
        OrgId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let registry = ConnectionRegistry::new();
        assert!(registry.put(org("00DA"), StubSession::new("00DA", "005A")).await.is_none());

        let session = registry.get(&org("00DA")).await.unwrap();
        assert_eq!(session.session().user_id(), "005A");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_replaces_existing_session() {
        let registry = ConnectionRegistry::new();
        registry.put(org("00DA"), StubSession::new("00DA", "005A")).await;
        let previous = registry
            .put(org("00DA"), StubSession::new("00DA", "005B"))
            .await
            .unwrap();

        assert_eq!(previous.session().user_id(), "005A");
        assert_eq!(registry.len().await, 1);
        assert_eq!(
            registry.get(&org("00DA")).await.unwrap().session().user_id(),
            "005B"
        );
    }

    #[tokio::test]
    async fn test_get_unknown_org_is_not_found() {
        let registry = ConnectionRegistry::new();
        let err = registry.get(&org("00DX")).await.err().unwrap();
        assert_eq!(err, SessionNotFound(org("00DX")));
        assert_eq!(err.to_string(), "No active session for organization 00DX");
    }

    #[tokio::test]
    async fn test_remove_and_org_ids() {
        let registry = ConnectionRegistry::new();
        registry.put(org("00DB"), StubSession::new("00DB", "005B")).await;
        registry.put(org("00DA"), StubSession::new("00DA", "005A")).await;
        assert_eq!(registry.org_ids().await, vec![org("00DA"), org("00DB")]);

        assert!(registry.remove(&org("00DA")).await.is_some());
        assert!(registry.remove(&org("00DA")).await.is_none());
        assert!(!registry.contains(&org("00DA")).await);
        assert!(!registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_if_same_keeps_replacement() {
        let registry = ConnectionRegistry::new();
        let stale = StubSession::new("00DA", "005A");
        let fresh = StubSession::new("00DA", "005B");
        registry.put(org("00DA"), Arc::clone(&stale)).await;
        registry.put(org("00DA"), Arc::clone(&fresh)).await;

        assert!(!registry.remove_if_same(&org("00DA"), &stale).await);
        assert_eq!(
            registry.get(&org("00DA")).await.unwrap().session().user_id(),
            "005B"
        );

        assert!(registry.remove_if_same(&org("00DA"), &fresh).await);
        assert!(registry.is_empty().await);
        assert!(!registry.remove_if_same(&org("00DA"), &fresh).await);
    }
}
