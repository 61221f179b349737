use std::sync::Arc;

use laboratory::{SpecContext, expect};

use sylvia_iot_authz::{
    Error,
    authorizer::{Authorizer, DEF_EXPIRES_IN_DAYS, Options},
    models::{
        AuthorizationModel, AuthorizationRequest,
        authorization::DAY_SECS,
        scope::{DEFAULT_SCOPE, SCOPE_ADMIN, SCOPE_READ, SCOPE_WRITE, ScopeMatch},
    },
};

use super::STATE;
use crate::{TEST_CLIENT_ID, TEST_REALM, TEST_USER_ID, TestState, models::BrokenModel};

fn new_request(scope: &str) -> AuthorizationRequest {
    AuthorizationRequest {
        realm: TEST_REALM.to_string(),
        user_id: TEST_USER_ID.to_string(),
        client_id: Some(TEST_CLIENT_ID.to_string()),
        token: None,
        scope: Some(scope.to_string()),
    }
}

/// Test [`Authorizer::issue`].
pub fn issue(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();
    let memory = state.memory.as_ref().unwrap();

    expect(authorizer.options().expires_in_days).to_equal(DEF_EXPIRES_IN_DAYS)?;
    expect(authorizer.options().scope_match).to_equal(ScopeMatch::Substring)?;

    let result = runtime.block_on(async {
        let auth = authorizer.issue(&new_request(DEFAULT_SCOPE)).await?;
        let stored = memory.find_by_token(auth.token.as_str()).await?;
        Ok::<_, Error>((auth, stored, memory.len().await))
    });
    let (auth, stored, len) = match result {
        Err(e) => return Err(format!("issue() error: {}", e)),
        Ok(result) => result,
    };
    expect(auth.expires - auth.created).to_equal(DEF_EXPIRES_IN_DAYS * DAY_SECS)?;
    expect(stored.as_ref()).to_equal(Some(&auth))?;
    expect(len).to_equal(1)
}

/// Test [`Authorizer::issue_for`].
pub fn issue_for(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let result = runtime.block_on(async {
        let never = authorizer.issue_for(&new_request(DEFAULT_SCOPE), 0).await?;
        let mut req = new_request(DEFAULT_SCOPE);
        req.client_id = Some("client2".to_string());
        let expired = authorizer.issue_for(&req, -1).await?;
        Ok::<_, Error>((never, expired))
    });
    let (never, expired) = match result {
        Err(e) => return Err(format!("issue_for() error: {}", e)),
        Ok(result) => result,
    };
    expect(never.expires).to_equal(0)?;
    expect(expired.is_valid()).to_equal(false)?;

    let result = runtime.block_on(async {
        authorizer
            .check_authorization(expired.token.as_str(), SCOPE_READ)
            .await
    });
    match result {
        Err(Error::NotAuthorized) => Ok(()),
        _ => Err("expired token should be NotAuthorized".to_string()),
    }
}

/// Test [`Authorizer::import`].
pub fn import(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let mut req = new_request(DEFAULT_SCOPE);
    let result = runtime.block_on(async { authorizer.import(&req, 1).await });
    match result {
        Err(Error::NoToken) => (),
        _ => return Err("import() without token should be NoToken".to_string()),
    }

    req.token = Some("imported-token".to_string());
    let result = runtime.block_on(async {
        authorizer.import(&req, 1).await?;
        authorizer
            .check_authorization("imported-token", SCOPE_WRITE)
            .await
    });
    match result {
        Err(e) => Err(format!("check imported token error: {}", e)),
        Ok(auth) => expect(auth.client_id.as_str()).to_equal(TEST_CLIENT_ID),
    }
}

/// Test [`Authorizer::check_authorization`] with normal scopes.
pub fn check_authorization(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let result = runtime.block_on(async { authorizer.issue(&new_request(SCOPE_READ)).await });
    let auth = match result {
        Err(e) => return Err(format!("issue() error: {}", e)),
        Ok(auth) => auth,
    };
    let token = auth.token.as_str();

    let (read, write, empty_scope) = runtime.block_on(async {
        (
            authorizer.check_authorization(token, SCOPE_READ).await,
            authorizer.check_authorization(token, SCOPE_WRITE).await,
            authorizer.check_authorization(token, "").await,
        )
    });
    match read {
        Err(e) => return Err(format!("check {} error: {}", SCOPE_READ, e)),
        Ok(granted) => expect(&granted).to_equal(&auth)?,
    }
    match write {
        Err(Error::NotAuthorized) => (),
        _ => return Err(format!("check {} should be NotAuthorized", SCOPE_WRITE)),
    }
    match empty_scope {
        Err(Error::NotAuthorized) => Ok(()),
        _ => Err("check empty scope should be NotAuthorized".to_string()),
    }
}

/// Test [`Authorizer::check_authorization`] with the admin scope.
pub fn check_admin(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let result = runtime.block_on(async {
        let auth = authorizer.issue(&new_request(SCOPE_ADMIN)).await?;
        let token = auth.token.as_str();
        authorizer.check_authorization(token, SCOPE_READ).await?;
        authorizer.check_authorization(token, SCOPE_WRITE).await?;
        authorizer.check_authorization(token, "production:build").await?;
        authorizer.check_authorization(token, "").await
    });
    match result {
        Err(e) => Err(format!("check admin error: {}", e)),
        Ok(auth) => expect(auth.has_admin_scope()).to_equal(true),
    }
}

/// Test [`Authorizer::check_authorization`] with empty, unknown, expired and revoked tokens.
pub fn check_invalid(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let result = runtime.block_on(async { authorizer.check_authorization("", SCOPE_READ).await });
    match result {
        Err(Error::NoToken) => (),
        _ => return Err("empty token should be NoToken".to_string()),
    }
    let result =
        runtime.block_on(async { authorizer.check_authorization("unknown", SCOPE_READ).await });
    match result {
        Err(Error::NotAuthorized) => (),
        _ => return Err("unknown token should be NotAuthorized".to_string()),
    }

    let result = runtime.block_on(async {
        let expired = authorizer.issue_for(&new_request(SCOPE_ADMIN), -1).await?;
        let mut req = new_request(SCOPE_ADMIN);
        req.client_id = Some("client2".to_string());
        let revoked = authorizer.issue(&req).await?;
        authorizer.revoke(revoked.token.as_str()).await?;
        Ok::<_, Error>((
            authorizer
                .check_authorization(expired.token.as_str(), SCOPE_READ)
                .await,
            authorizer
                .check_authorization(revoked.token.as_str(), SCOPE_READ)
                .await,
        ))
    });
    let (expired, revoked) = match result {
        Err(e) => return Err(format!("prepare error: {}", e)),
        Ok(result) => result,
    };
    match expired {
        Err(Error::NotAuthorized) => (),
        _ => return Err("expired token should be NotAuthorized".to_string()),
    }
    match revoked {
        Err(Error::NotAuthorized) => Ok(()),
        _ => Err("revoked token should be NotAuthorized".to_string()),
    }
}

/// Test [`Authorizer::check_authorization`] with [`ScopeMatch::Exact`].
pub fn check_exact(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let memory = state.memory.as_ref().unwrap();

    let substring = state.authorizer.as_ref().unwrap();
    let exact = Authorizer::new(
        memory.clone(),
        Options {
            scope_match: ScopeMatch::Exact,
            ..Default::default()
        },
    );

    let result = runtime.block_on(async {
        let readonly = exact.issue(&new_request("api:readonly")).await?;
        let mut req = new_request("api:administrator");
        req.client_id = Some("client2".to_string());
        let not_admin = exact.issue(&req).await?;
        Ok::<_, Error>((
            exact
                .check_authorization(readonly.token.as_str(), SCOPE_READ)
                .await,
            substring
                .check_authorization(readonly.token.as_str(), SCOPE_READ)
                .await,
            exact
                .check_authorization(not_admin.token.as_str(), SCOPE_WRITE)
                .await,
            substring
                .check_authorization(not_admin.token.as_str(), SCOPE_WRITE)
                .await,
        ))
    });
    let (exact_readonly, substring_readonly, exact_admin, substring_admin) = match result {
        Err(e) => return Err(format!("issue() error: {}", e)),
        Ok(result) => result,
    };
    match exact_readonly {
        Err(Error::NotAuthorized) => (),
        _ => return Err("exact match should deny api:readonly".to_string()),
    }
    expect(substring_readonly.is_ok()).to_equal(true)?;
    match exact_admin {
        Err(Error::NotAuthorized) => (),
        _ => return Err("exact match should deny api:administrator".to_string()),
    }
    expect(substring_admin.is_ok()).to_equal(true)
}

/// Test [`Authorizer::check_authorization`] when the store fails.
pub fn check_store_error(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = Authorizer::new(Arc::new(BrokenModel), Options::default());

    let result = runtime.block_on(async { authorizer.check_authorization("token", "").await });
    match result {
        Err(Error::NotAuthorized) => (),
        _ => return Err("store error should be NotAuthorized".to_string()),
    }
    let result = runtime.block_on(async { authorizer.issue(&new_request(SCOPE_READ)).await });
    match result {
        Err(Error::Store(_)) => Ok(()),
        _ => Err("issue() should be Store error".to_string()),
    }
}

/// Test [`Authorizer::resolve_client_id`].
pub fn resolve_client_id(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let result = runtime.block_on(async {
        let expired = authorizer.issue_for(&new_request(""), -1).await?;
        authorizer.resolve_client_id(expired.token.as_str()).await
    });
    match result {
        Err(e) => return Err(format!("resolve_client_id() error: {}", e)),
        Ok(client_id) => expect(client_id.as_str()).to_equal(TEST_CLIENT_ID)?,
    }

    match runtime.block_on(async { authorizer.resolve_client_id("unknown").await }) {
        Err(Error::NotAuthorized) => (),
        _ => return Err("unknown token should be NotAuthorized".to_string()),
    }
    match runtime.block_on(async { authorizer.resolve_client_id("").await }) {
        Err(Error::NoToken) => (),
        _ => return Err("empty token should be NoToken".to_string()),
    }

    let broken = Authorizer::new(Arc::new(BrokenModel), Options::default());
    match runtime.block_on(async { broken.resolve_client_id("token").await }) {
        Err(Error::Store(_)) => Ok(()),
        _ => Err("store error should be propagated".to_string()),
    }
}

/// Test [`Authorizer::find_by_identity`].
pub fn find_by_identity(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let result = runtime.block_on(async {
        let old = authorizer.issue(&new_request(SCOPE_READ)).await?;
        let new = authorizer.issue(&new_request(SCOPE_WRITE)).await?;
        let found = authorizer.find_by_identity(TEST_REALM, TEST_CLIENT_ID).await?;
        let old_check = authorizer
            .check_authorization(old.token.as_str(), SCOPE_READ)
            .await;
        Ok::<_, Error>((new, found, old_check))
    });
    let (new, found, old_check) = match result {
        Err(e) => return Err(format!("find_by_identity() error: {}", e)),
        Ok(result) => result,
    };
    expect(found.as_ref()).to_equal(Some(&new))?;
    match old_check {
        Err(Error::NotAuthorized) => Ok(()),
        _ => Err("replaced token should be NotAuthorized".to_string()),
    }
}

/// Test [`Authorizer::revoke`].
pub fn revoke(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let result = runtime.block_on(async {
        let auth = authorizer.issue(&new_request(SCOPE_READ)).await?;
        authorizer.revoke(auth.token.as_str()).await
    });
    match result {
        Err(e) => return Err(format!("revoke() error: {}", e)),
        Ok(auth) => expect(auth.revoked).to_equal(true)?,
    }
    match runtime.block_on(async { authorizer.revoke("unknown").await }) {
        Err(Error::NotAuthorized) => Ok(()),
        _ => Err("revoke() unknown token should be NotAuthorized".to_string()),
    }
}

/// Test [`Authorizer::delete`].
pub fn delete(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = state.authorizer.as_ref().unwrap();

    let result = runtime.block_on(async {
        let auth = authorizer.issue(&new_request(SCOPE_READ)).await?;
        let deleted = authorizer.delete(TEST_REALM, TEST_CLIENT_ID).await?;
        let check = authorizer
            .check_authorization(auth.token.as_str(), SCOPE_READ)
            .await;
        let again = authorizer.delete(TEST_REALM, TEST_CLIENT_ID).await?;
        Ok::<_, Error>((auth, deleted, check, again))
    });
    let (auth, deleted, check, again) = match result {
        Err(e) => return Err(format!("delete() error: {}", e)),
        Ok(result) => result,
    };
    expect(deleted.as_ref()).to_equal(Some(&auth))?;
    expect(again.is_none()).to_equal(true)?;
    match check {
        Err(Error::NotAuthorized) => Ok(()),
        _ => Err("deleted token should be NotAuthorized".to_string()),
    }
}

/// Test [`Authorizer::revoke`] and [`Authorizer::delete`] with a store without supports.
pub fn not_implemented(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();
    let authorizer = Authorizer::new(Arc::new(BrokenModel), Options::default());

    let (revoke, delete) = runtime.block_on(async {
        (
            authorizer.revoke("token").await,
            authorizer.delete(TEST_REALM, TEST_CLIENT_ID).await,
        )
    });
    match revoke {
        Err(Error::NotImplemented) => (),
        _ => return Err("revoke() should be NotImplemented".to_string()),
    }
    match delete {
        Err(Error::NotImplemented) => Ok(()),
        _ => Err("delete() should be NotImplemented".to_string()),
    }
}
