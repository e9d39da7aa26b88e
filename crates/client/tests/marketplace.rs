use std::time::Duration;

use assert_matches::assert_matches;
use chrono::{TimeDelta, Utc};
use encore_actor_memory::{MemoryBackend, Operation};
use encore_client::{BookingForm, Client, ClientOptions, Error, ProfileForm};
use encore_gate::{Dashboard, GateState};
use encore_model::{EventType, GigStatus, IdentityId, Role};
use encore_query::{NotificationLevel, QueryClientOptions, QueryState};
use encore_session::MemoryIdentityProvider;

type TestClient = Client<MemoryBackend, MemoryIdentityProvider>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn logged_in(backend: &MemoryBackend, options: ClientOptions) -> (TestClient, IdentityId) {
    let provider = MemoryIdentityProvider::new(IdentityId::new());
    provider.finish_initialization();

    let client = Client::new(backend.clone(), provider, options).await;
    let identity = client.login(None).await.unwrap();

    (client, identity)
}

async fn onboard(
    backend: &MemoryBackend,
    role: Role,
    name: &str,
    options: ClientOptions,
) -> (TestClient, IdentityId) {
    let (client, identity) = logged_in(backend, options).await;

    client
        .submit_profile(ProfileForm {
            name: name.to_string(),
            phone: "+91 1234567890".to_string(),
            bio: "Live music".to_string(),
            location: "Mumbai, MH".to_string(),
            role: Some(role),
        })
        .await
        .unwrap();

    (client, identity)
}

#[tokio::test]
async fn test_new_user_reaches_their_dashboard() {
    init_tracing();

    let backend = MemoryBackend::new();
    let provider = MemoryIdentityProvider::new(IdentityId::new());
    let client = Client::new(backend.clone(), provider.clone(), ClientOptions::default()).await;

    assert_eq!(client.route("/").await, GateState::Unauthenticated);

    provider.finish_initialization();
    client.login(Some(Role::Venue)).await.unwrap();

    assert_eq!(client.gate("/").await, GateState::ProfileLoading);
    assert_eq!(client.route("/").await, GateState::NeedsProfileSetup);

    let mut notifications = client.subscribe();
    let profile = client
        .submit_profile(ProfileForm {
            name: "The Blue Note".to_string(),
            phone: "555-0100".to_string(),
            location: "Pune".to_string(),
            ..ProfileForm::default()
        })
        .await
        .unwrap();

    assert_eq!(profile.role, Role::Venue);
    assert_eq!(
        notifications.recv().await.unwrap().message,
        "Profile saved successfully"
    );
    assert_eq!(
        client.route("/").await,
        GateState::Dashboard(Dashboard::Venue)
    );
    assert_eq!(client.route("/admin").await, GateState::AccessDenied);
}

#[tokio::test]
async fn test_booking_through_payout() {
    init_tracing();

    let backend = MemoryBackend::new();
    let fresh = ClientOptions {
        query: QueryClientOptions {
            stale_time: Duration::ZERO,
            ..QueryClientOptions::default()
        },
        ..ClientOptions::default()
    };
    let (musician, musician_id) = onboard(&backend, Role::Musician, "Asha Rao", fresh).await;
    let (venue, _) = onboard(
        &backend,
        Role::Venue,
        "The Blue Note",
        ClientOptions::default(),
    )
    .await;
    let now = Utc::now();

    let dashboard = venue.venue_dashboard("mumbai", now).await;
    assert_eq!(dashboard.musicians.len(), 1);
    let performer = dashboard.musicians[0].clone();
    assert_eq!(performer.id, musician_id);

    let mut notifications = venue.subscribe();
    let gig_id = venue
        .submit_booking(
            &performer,
            BookingForm {
                name: "Friday Night Jazz".to_string(),
                date: (now - TimeDelta::hours(2)).format("%Y-%m-%dT%H:%M").to_string(),
                price: "5000".to_string(),
            },
            now,
        )
        .await
        .unwrap();
    assert_eq!(
        notifications.recv().await.unwrap().message,
        "Gig booked successfully!"
    );

    let dashboard = venue.venue_dashboard("", now).await;
    assert_eq!(dashboard.gigs.len(), 1);
    assert_eq!(dashboard.awaiting_verification.len(), 1);
    let gig = dashboard.awaiting_verification[0].clone();
    assert_eq!(gig.id, gig_id);

    let view = musician.musician_dashboard(now).await;
    assert_eq!(view.tickets.len(), 1);
    assert_eq!(view.wallet.locked, 5000);
    assert_eq!(view.earnings, 0);

    let dir = tempfile::tempdir().unwrap();
    let path = musician.download_ticket(&view.tickets[0], dir.path()).await.unwrap();
    assert!(path.ends_with("encoreats-ticket-Friday-Night-Jazz.png"));
    assert!(path.exists());

    assert_matches!(
        venue.confirm_scan(&gig, "gig-0").await,
        Err(Error::InvalidTicket(_))
    );
    assert_eq!(backend.call_count(Operation::VerifyGig).await, 0);

    venue.confirm_scan(&gig, &gig.ticket_payload()).await.unwrap();

    let dashboard = venue.venue_dashboard("", now).await;
    assert_eq!(dashboard.completed_count, 1);
    assert!(dashboard.awaiting_verification.is_empty());
    assert_eq!(dashboard.gigs[0].status, GigStatus::Completed);

    backend.record_payout(musician_id, 2000).await.unwrap();

    let view = musician.musician_dashboard(now).await;
    assert!(view.tickets.is_empty());
    assert_eq!(view.wallet.locked, 0);
    assert_eq!(view.wallet.available, 3000);
    assert_eq!(view.wallet.paid, 2000);
    assert_eq!(view.earnings, 5000);
}

#[tokio::test]
async fn test_failed_write_surfaces_error_notification() {
    init_tracing();

    let backend = MemoryBackend::new();
    let (customer, _) = onboard(&backend, Role::Customer, "Dev", ClientOptions::default()).await;
    let mut notifications = customer.subscribe();

    // Only musicians own slots.
    let result = customer.create_slot(Utc::now()).await;

    assert_matches!(result, Err(Error::Query(_)));
    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert!(notification.message.starts_with("Failed to create slot: "));
}

#[tokio::test]
async fn test_customer_and_landing_listings() {
    init_tracing();

    let backend = MemoryBackend::new();
    let (_, musician_id) =
        onboard(&backend, Role::Musician, "Asha", ClientOptions::default()).await;
    let (venue, _) = onboard(&backend, Role::Venue, "Blue Note", ClientOptions::default()).await;
    let (customer, _) = onboard(&backend, Role::Customer, "Dev", ClientOptions::default()).await;
    let performer = customer
        .venue_dashboard("", Utc::now())
        .await
        .musicians
        .into_iter()
        .find(|m| m.id == musician_id)
        .unwrap();

    let now = Utc::now();
    for (offset, name) in [
        (3, "Jazz Late"),
        (1, "Jazz Early"),
        (-1, "Jazz Gone"),
        (2, "Rock On"),
    ] {
        venue
            .submit_booking(
                &performer,
                BookingForm {
                    name: name.to_string(),
                    date: (now + TimeDelta::days(offset)).to_rfc3339(),
                    price: "100".to_string(),
                },
                now + TimeDelta::milliseconds(offset + 10),
            )
            .await
            .unwrap();
    }

    let names: Vec<_> = customer
        .customer_dashboard("jazz", now)
        .await
        .gigs
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Jazz Early", "Jazz Late"]);

    let anonymous = Client::new(
        backend.clone(),
        {
            let provider = MemoryIdentityProvider::new(IdentityId::new());
            provider.finish_initialization();
            provider
        },
        ClientOptions::default(),
    )
    .await;
    assert_eq!(anonymous.landing("", now).await.gigs.len(), 3);
    assert_eq!(anonymous.route("/").await, GateState::Unauthenticated);
}

#[tokio::test]
async fn test_admin_sees_usage() {
    init_tracing();

    let backend = MemoryBackend::new();
    let (customer, _) = onboard(&backend, Role::Customer, "Dev", ClientOptions::default()).await;
    customer.telemetry().flush().await;

    let provider = MemoryIdentityProvider::new(IdentityId::new());
    provider.finish_initialization();
    let admin = Client::new(backend.clone(), provider, ClientOptions::default()).await;

    assert_eq!(admin.admin_dashboard().await, QueryState::Disabled);

    let identity = admin.login(Some(Role::Venue)).await.unwrap();
    backend.grant_admin(identity).await;
    admin
        .submit_profile(ProfileForm {
            name: "Ops".to_string(),
            phone: "0".to_string(),
            location: "HQ".to_string(),
            ..ProfileForm::default()
        })
        .await
        .unwrap();

    assert_eq!(admin.route("/admin").await, GateState::AdminView);
    admin.telemetry().flush().await;

    let QueryState::Success(dashboard) = admin.admin_dashboard().await else {
        panic!("admin dashboard should load");
    };
    assert_eq!(dashboard.summary.total_unique_users, 2);
    assert_eq!(dashboard.summary.total_sessions, 1);
    assert!(
        dashboard
            .events
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp)
    );
    assert!(dashboard.events.iter().any(|row| {
        row.event == EventType::PageView.label() && row.page.as_deref() == Some("/admin")
    }));
}
