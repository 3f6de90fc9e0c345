//! Store ownership guard.
//!
//! Every create, update and delete on a store-scoped entity goes through
//! [`OwnershipGuard`] before any write is attempted. The guard answers with a
//! [`Decision`]; expected outcomes (no caller, no store id, not the owner) are
//! plain values, and only a failing or slow [`ScopeStore`] becomes
//! [`Decision::Unavailable`].
//!
//! Precedence is fixed: the caller is checked first, then the store id, then
//! ownership. Ownership and existence are answered by one lookup on the pair
//! `(store id, owner)`, so a store owned by someone else and a store that does
//! not exist are indistinguishable to the caller.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::Store;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::types::{EntityKind, Operation};

/// Lookup of stores by id and owner
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// The store with `scope_id` owned by `owner`, in a single query
    async fn find_owned_scope(&self, scope_id: &str, owner: &Identity) -> Result<Option<Store>, DatabaseError>;
}

/// Outcome of an ownership check
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No caller identity (401)
    Unauthenticated,
    /// Empty store id (400)
    MissingScope,
    /// Caller does not own a store with this id (403)
    Forbidden,
    /// The scope lookup failed or timed out (500)
    Unavailable,
    Authorized(Store),
}

impl Decision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Decision::Authorized(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Decision::Authorized(_) => 200,
            Decision::MissingScope => 400,
            Decision::Unauthenticated => 401,
            Decision::Forbidden => 403,
            Decision::Unavailable => 500,
        }
    }

    /// The authorized store, or the error the caller should respond with
    pub fn into_result(self) -> Result<Store, ApiError> {
        match self {
            Decision::Authorized(store) => Ok(store),
            Decision::Unauthenticated => Err(ApiError::unauthorized("Unauthenticated")),
            Decision::MissingScope => Err(ApiError::bad_request("Store id is required")),
            Decision::Forbidden => Err(ApiError::forbidden("Unauthorized")),
            Decision::Unavailable => Err(ApiError::internal_server_error("Internal Error")),
        }
    }
}

/// One guarded request: who, which store, and what they want to do
#[derive(Debug, Clone)]
pub struct MutationRequest {
    pub caller: Option<Identity>,
    pub scope_id: String,
    pub operation: Operation,
    pub entity: EntityKind,
}

impl MutationRequest {
    pub fn new(
        caller: Option<Identity>,
        scope_id: impl Into<String>,
        operation: Operation,
        entity: EntityKind,
    ) -> Self {
        Self {
            caller,
            scope_id: scope_id.into(),
            operation,
            entity,
        }
    }
}

#[derive(Clone)]
pub struct OwnershipGuard {
    scopes: Arc<dyn ScopeStore>,
    lookup_timeout: Duration,
}

impl OwnershipGuard {
    pub fn new(scopes: Arc<dyn ScopeStore>, lookup_timeout: Duration) -> Self {
        Self { scopes, lookup_timeout }
    }

    /// Decide whether `caller` may mutate resources of store `scope_id`
    pub async fn authorize(&self, caller: Option<&Identity>, scope_id: &str) -> Decision {
        self.decide(caller, scope_id, None).await
    }

    /// Same decision as [`authorize`](Self::authorize), logged with the
    /// operation and entity kind of the request
    pub async fn check(&self, request: &MutationRequest) -> Decision {
        self.decide(
            request.caller.as_ref(),
            &request.scope_id,
            Some((request.operation, request.entity)),
        )
        .await
    }

    async fn decide(
        &self,
        caller: Option<&Identity>,
        scope_id: &str,
        action: Option<(Operation, EntityKind)>,
    ) -> Decision {
        let (operation, entity) = match action {
            Some((operation, entity)) => (operation.to_string(), entity.to_string()),
            None => ("unspecified".to_string(), "unspecified".to_string()),
        };

        let Some(caller) = caller else {
            return Decision::Unauthenticated;
        };

        let scope_id = scope_id.trim();
        if scope_id.is_empty() {
            return Decision::MissingScope;
        }

        let lookup = self.scopes.find_owned_scope(scope_id, caller);
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(store))) if owns(&store, scope_id, caller) => Decision::Authorized(store),
            Ok(Ok(Some(store))) => {
                tracing::warn!(
                    store_id = %scope_id,
                    identity = %caller,
                    returned_store = %store.id,
                    "Scope store returned a store that does not match the lookup"
                );
                Decision::Forbidden
            }
            Ok(Ok(None)) => {
                tracing::debug!(store_id = %scope_id, identity = %caller, %operation, %entity, "Ownership check denied");
                Decision::Forbidden
            }
            Ok(Err(e)) => {
                tracing::error!(
                    store_id = %scope_id,
                    identity = %caller,
                    %operation,
                    %entity,
                    error = %e,
                    "Ownership lookup failed"
                );
                Decision::Unavailable
            }
            Err(_) => {
                tracing::error!(
                    store_id = %scope_id,
                    identity = %caller,
                    %operation,
                    %entity,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Ownership lookup timed out"
                );
                Decision::Unavailable
            }
        }
    }
}

fn owns(store: &Store, scope_id: &str, caller: &Identity) -> bool {
    store.user_id == caller.as_str()
        && Uuid::parse_str(scope_id).map(|id| id == store.id).unwrap_or(false)
}
