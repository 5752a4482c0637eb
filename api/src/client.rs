//! Typed operations over the tenant admin REST endpoints.
//!
//! REQUEST CYCLE
//! =============
//! Every call goes through [`AdminApi::execute`]:
//!
//! 1. the current token is read from the session and attached as a bearer,
//! 2. the transport sends the request,
//! 3. a 401 expires the session (clear plus navigation hook) and fails,
//! 4. any other non-2xx fails with the server's `{error}` text,
//! 5. a 2xx body is decoded into the caller's type.
//!
//! Mutating operations validate their payload again before step 1, so a
//! hand-built request struct that skipped its constructor is still rejected
//! without touching the network.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use schema::{
    Account, AccountId, Dataset, DatasetLink, ErrorBody, LoginRequest, LoginResponse, MembershipKey, MessageBody,
    NewAccount, NewMembership, NewTenant, PageResponse, RoleChange, SetPassword, Tenant, TenantAccountJoin,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;
use crate::session::{SessionContext, SessionStore, StoredSession};
use crate::transport::{ApiRequest, Transport};

/// Which associations a membership listing covers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MembershipScope {
    #[default]
    All,
    Account(String),
    Tenant(String),
}

impl MembershipScope {
    fn request(&self, page: u32) -> ApiRequest {
        match self {
            Self::All => ApiRequest::get("/list_tenant_account.json"),
            Self::Account(id) => ApiRequest::get("/list_tenant_account_by_account.json").with_query("account_id", id),
            Self::Tenant(id) => ApiRequest::get("/list_tenant_account_by_tenant.json").with_query("tenant_id", id),
        }
        .with_query("page", page)
    }
}

/// Which datasets a dataset listing covers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DatasetScope {
    #[default]
    All,
    Tenant(String),
}

impl DatasetScope {
    fn request(&self, page: u32) -> ApiRequest {
        match self {
            Self::All => ApiRequest::get("/datasets.json"),
            Self::Tenant(id) => ApiRequest::get("/list_dataset_tenant.json").with_query("tenant_id", id),
        }
        .with_query("page", page)
    }
}

/// REST client bound to one transport and one session.
pub struct AdminApi<T, S> {
    transport: T,
    session: SessionContext<S>,
}

impl<T: Transport, S: SessionStore> AdminApi<T, S> {
    pub fn new(transport: T, session: SessionContext<S>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionContext<S> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Exchange credentials for a token and persist the session.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] carries the server's reason for rejected
    /// credentials; [`ApiError::MissingToken`] if the server answered 2xx
    /// without a token.
    pub async fn login(&self, request: &LoginRequest) -> Result<StoredSession, ApiError> {
        request.validate()?;
        let response: LoginResponse = self.execute(ApiRequest::post("/login.json", body(request)?)).await?;
        if response.token.is_empty() {
            return Err(ApiError::MissingToken);
        }
        let session = StoredSession { token: response.token, data: response.data };
        self.session.begin(&session)?;
        log::info!("signed in as {}", session.data.email);
        Ok(session)
    }

    /// Drop the stored session. The backend keeps no server-side session.
    pub fn logout(&self) {
        self.session.end();
    }

    // =========================================================================
    // ACCOUNTS
    // =========================================================================

    /// # Errors
    ///
    /// Any [`ApiError`] from the request cycle.
    pub async fn list_accounts(&self, page: u32) -> Result<PageResponse<Account>, ApiError> {
        self.execute(ApiRequest::get("/accounts.json").with_query("page", page)).await
    }

    /// # Errors
    ///
    /// [`ApiError::Invalid`] before sending for a blank name or bad email.
    pub async fn add_account(&self, request: &NewAccount) -> Result<Account, ApiError> {
        self.mutate("/add_account.json", request).await
    }

    /// Delete an account; the backend also removes its associations.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request cycle.
    pub async fn delete_account(&self, request: &AccountId) -> Result<MessageBody, ApiError> {
        self.mutate("/del_account.json", request).await
    }

    /// # Errors
    ///
    /// [`ApiError::Invalid`] before sending for a short password.
    pub async fn set_account_password(&self, request: &SetPassword) -> Result<MessageBody, ApiError> {
        self.mutate("/set_account_password.json", request).await
    }

    // =========================================================================
    // TENANTS
    // =========================================================================

    /// # Errors
    ///
    /// Any [`ApiError`] from the request cycle.
    pub async fn list_tenants(&self, page: u32) -> Result<PageResponse<Tenant>, ApiError> {
        self.execute(ApiRequest::get("/tenants.json").with_query("page", page)).await
    }

    /// # Errors
    ///
    /// [`ApiError::Invalid`] before sending for a blank name.
    pub async fn add_tenant(&self, request: &NewTenant) -> Result<Tenant, ApiError> {
        self.mutate("/add_tenant.json", request).await
    }

    // =========================================================================
    // TENANT ACCOUNT JOINS
    // =========================================================================

    /// # Errors
    ///
    /// Any [`ApiError`] from the request cycle.
    pub async fn list_memberships_in(
        &self,
        scope: &MembershipScope,
        page: u32,
    ) -> Result<PageResponse<TenantAccountJoin>, ApiError> {
        self.execute(scope.request(page)).await
    }

    /// # Errors
    ///
    /// [`ApiError::Invalid`] before sending when either id is blank.
    pub async fn add_membership(&self, request: &NewMembership) -> Result<TenantAccountJoin, ApiError> {
        self.mutate("/add_tenant_account.json", request).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request cycle.
    pub async fn remove_membership(&self, request: &MembershipKey) -> Result<MessageBody, ApiError> {
        self.mutate("/del_tenant_account.json", request).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request cycle.
    pub async fn change_role(&self, request: &RoleChange) -> Result<MessageBody, ApiError> {
        self.mutate("/update_tenant_account_role.json", request).await
    }

    // =========================================================================
    // DATASETS
    // =========================================================================

    /// # Errors
    ///
    /// Any [`ApiError`] from the request cycle.
    pub async fn list_datasets(&self, page: u32) -> Result<PageResponse<Dataset>, ApiError> {
        self.list_datasets_in(&DatasetScope::All, page).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request cycle.
    pub async fn list_datasets_in(&self, scope: &DatasetScope, page: u32) -> Result<PageResponse<Dataset>, ApiError> {
        self.execute(scope.request(page)).await
    }

    /// Attach an existing dataset to a workspace.
    ///
    /// # Errors
    ///
    /// [`ApiError::Invalid`] before sending when either id is blank.
    pub async fn link_dataset(&self, request: &DatasetLink) -> Result<MessageBody, ApiError> {
        self.mutate("/add_dataset_tenant.json", request).await
    }

    /// # Errors
    ///
    /// [`ApiError::Invalid`] before sending when either id is blank.
    pub async fn unlink_dataset(&self, request: &DatasetLink) -> Result<MessageBody, ApiError> {
        self.mutate("/del_dataset_tenant.json", request).await
    }

    // =========================================================================
    // REQUEST CYCLE
    // =========================================================================

    async fn mutate<B, R>(&self, endpoint: &str, request: &B) -> Result<R, ApiError>
    where
        B: Serialize + Validate,
        R: DeserializeOwned,
    {
        request.validate()?;
        self.execute(ApiRequest::post(endpoint, body(request)?)).await
    }

    async fn execute<R: DeserializeOwned>(&self, mut request: ApiRequest) -> Result<R, ApiError> {
        request.bearer = self.session.token();
        let label = request.describe();
        log::debug!("{label}");

        let response = self.transport.send(request).await?;
        if response.status == 401 {
            log::warn!("{label}: 401, session expired");
            self.session.expire();
            return Err(ApiError::Unauthorized { message: error_message(&response.body) });
        }
        if !response.is_success() {
            let message = error_message(&response.body).unwrap_or_else(|| format!("HTTP {}", response.status));
            log::debug!("{label}: {} {message}", response.status);
            return Err(ApiError::Status { status: response.status, message });
        }
        decode(&response.body)
    }
}

fn body<B: Serialize>(request: &B) -> Result<serde_json::Value, ApiError> {
    Ok(serde_json::to_value(request)?)
}

/// Decode a 2xx body; an empty body reads as `{}` so acknowledgements without
/// content still succeed.
fn decode<R: DeserializeOwned>(raw: &[u8]) -> Result<R, ApiError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_str("{}")?);
    }
    Ok(serde_json::from_slice(raw)?)
}

fn error_message(raw: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(raw).ok().map(|body| body.error).filter(|message| !message.is_empty())
}
