mod common;

use anyhow::Result;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use common::{TestServer, ADMIN, MODERATOR};
use portal_admin::client::{refresh, ApiClient, ClientError, RemoteSource};
use portal_admin::entities::{Coupon, Job, PortalUser};
use portal_admin::permission::Role;
use portal_admin::view::{FilterSpec, ListViewState, Pagination, SortSpec, ViewQuery};

async fn signed_in(server: &TestServer, account: (&str, &str)) -> Result<ApiClient> {
    let client = ApiClient::new(&server.base_url)?;
    let login = client.login(account.0, account.1).await?;
    Ok(client.with_token(Some(login.token)))
}

#[tokio::test]
async fn login_and_whoami_round_trip() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = signed_in(&server, MODERATOR).await?;

    let user = client.whoami().await?;
    assert_eq!(user.role, Role::SubAdmin);
    assert!(user.permissions.contains("jobs", portal_admin::types::Operation::Delete));
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_a_server_rejection() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = ApiClient::new(&server.base_url)?;
    match client.login("admin", "wrong").await {
        Err(ClientError::ServerRejection { status, .. }) => assert_eq!(status, 401),
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn rejected_token_is_auth_expiry() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = ApiClient::new(&server.base_url)?.with_token(Some("not-a-jwt".into()));
    assert!(client.whoami().await.unwrap_err().is_auth_expiry());

    let query = ViewQuery::default();
    let err = client.list::<Job>("jobs", &query).await.unwrap_err();
    assert!(err.is_auth_expiry());
    Ok(())
}

#[tokio::test]
async fn typed_lists_decode_the_envelope() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = signed_in(&server, ADMIN).await?;

    let query = ViewQuery {
        filters: FilterSpec::new().with_filter("status", "Active"),
        sort: Some(SortSpec::desc("discount")),
        pagination: Pagination::new(1, 10),
    };
    let page = client.list::<Coupon>("coupons", &query).await?;
    assert_eq!(page.total_count, 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.rows[0].code, "SPRING24");
    assert_eq!(page.rows[0].discount, Decimal::new(155, 1));

    let users = client
        .list::<PortalUser>("universities", &ViewQuery::default())
        .await?;
    assert!(users.rows.iter().all(|u| u.role == Role::University));
    Ok(())
}

#[tokio::test]
async fn server_side_errors_are_classified() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = signed_in(&server, MODERATOR).await?;

    let err = client.list::<PortalUser>("users", &ViewQuery::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::ServerRejection { status: 403, .. }));

    let err = client.get::<Job>("jobs", "job-404").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));

    let query = ViewQuery {
        filters: FilterSpec::new().with_filter("colour", "red"),
        ..ViewQuery::default()
    };
    let err = client.list::<Job>("jobs", &query).await.unwrap_err();
    assert!(err.field_errors().is_some_and(|f| f.contains_key("colour")));
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = signed_in(&server, ADMIN).await?;

    let job: Job = client.get("jobs", "job-3").await?;
    assert_eq!(job.title, "Campus Recruiter");

    client.delete("jobs", "job-3").await?;
    assert!(matches!(client.get::<Job>("jobs", "job-3").await, Err(ClientError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn remote_refresh_updates_the_page_state() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = signed_in(&server, ADMIN).await?;
    let source = RemoteSource::new(client, "jobs");

    let mut state = ListViewState::new(1);
    state.set_sort(Some(SortSpec::asc("title")));
    state.set_page(99);
    let state = Mutex::new(state);

    let page = refresh::<Job, _>(&source, &state).await?.expect("only fetch in flight");
    // the server clamps and the state keeps the clamped page
    assert_eq!(page.current_page, 4);
    assert_eq!(page.rows[0].id, "job-4");
    assert_eq!(state.lock().await.current_page(), 4);

    state.lock().await.set_search("engineer");
    let page = refresh::<Job, _>(&source, &state).await?.expect("only fetch in flight");
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_count, 1);
    Ok(())
}
