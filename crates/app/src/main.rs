//! HireLink command-line client.
//!
//! ```text
//! hirelink jobs [search]        list open jobs
//! hirelink artisans [skill]     search the artisan directory
//! hirelink login <email>        sign in (password from HIRELINK_PASSWORD)
//! hirelink logout               sign out and forget the stored token
//! hirelink watch [job-id ...]   stream live updates until Ctrl-C
//! ```

use std::sync::Arc;

use hirelink_application::{ApplicationError, EventDispatcher, LiveFeed};
use hirelink_domain::models::{ArtisanFilters, JobFilters, RecordId};
use hirelink_domain::{ClientConfig, Credentials, EventKind};
use hirelink_infrastructure::{HireLinkClient, build_client, build_live_updates, load_config};
use parking_lot::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = concat!(
    "usage: hirelink <jobs [search] | artisans [skill] | login <email> | logout",
    " | watch [job-id ...]>"
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let config = load_config(None).await?;
    let client = build_client(&config)?;
    if let Some(user) = client.auth.restore().await? {
        info!(user = %user.name, "signed in");
    }

    match command.as_str() {
        "jobs" => list_jobs(&client, args.get(1).cloned()).await?,
        "artisans" => list_artisans(&client, args.get(1).cloned()).await?,
        "login" => login(&client, args.get(1).map(String::as_str)).await?,
        "logout" => {
            client.auth.logout().await?;
            println!("signed out");
        }
        "watch" => {
            let jobs = args[1..]
                .iter()
                .map(|id| id.parse::<RecordId>())
                .collect::<Result<Vec<_>, _>>()?;
            watch(&client, &config, &jobs).await?;
        }
        other => {
            eprintln!("unknown command {other:?}\n{USAGE}");
        }
    }

    Ok(())
}

async fn list_jobs(
    client: &HireLinkClient,
    search: Option<String>,
) -> Result<(), ApplicationError> {
    let filters = JobFilters {
        search,
        ..JobFilters::open()
    };
    let jobs = client.jobs.list(&filters).await?;
    if jobs.is_empty() {
        println!("no open jobs");
    }
    for job in jobs {
        let budget = job.budget.map_or_else(|| "-".to_string(), |b| format!("{b:.2}"));
        println!(
            "#{:<6} {:<40} {:<14} {:>10}  {}",
            job.id,
            job.title,
            job.category.as_deref().unwrap_or("-"),
            budget,
            job.location.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn list_artisans(
    client: &HireLinkClient,
    skill: Option<String>,
) -> Result<(), ApplicationError> {
    let artisans = client
        .profiles
        .artisans(&ArtisanFilters {
            skill,
            ..ArtisanFilters::default()
        })
        .await?;
    for artisan in artisans {
        let rate = artisan
            .hourly_rate
            .map_or_else(|| "-".to_string(), |r| format!("{r:.2}/h"));
        println!(
            "#{:<6} {:<30} {:<30} {:>10}  rating {}",
            artisan.id,
            artisan.name,
            artisan.skills.join(", "),
            rate,
            artisan.rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}"))
        );
    }
    Ok(())
}

async fn login(
    client: &HireLinkClient,
    email: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(email) = email else {
        return Err("login needs an email".into());
    };
    let password = std::env::var("HIRELINK_PASSWORD")
        .map_err(|_| "set HIRELINK_PASSWORD to sign in")?;
    let user = client
        .auth
        .login(&Credentials::new(email, password))
        .await?;
    println!("signed in as {} ({:?})", user.name, user.role);
    Ok(())
}

async fn watch(
    client: &HireLinkClient,
    config: &ClientConfig,
    jobs: &[RecordId],
) -> Result<(), ApplicationError> {
    let live = build_live_updates(client, config);
    let events = live.connect(jobs).await?;
    let unread = client.notifications.unread_count().await.unwrap_or_else(|e| {
        warn!(error = %e, "could not load unread count");
        0
    });

    let feed = Arc::new(Mutex::new(LiveFeed::new().with_unread(unread)));
    let mut dispatcher = EventDispatcher::new();
    let sink = Arc::clone(&feed);
    dispatcher.subscribe(move |event| {
        sink.lock().apply(event);
    });
    dispatcher.on(EventKind::MessageSent, |event| {
        println!("[message] {}", event.record("message"));
    });
    let counter = Arc::clone(&feed);
    dispatcher.on(EventKind::NotificationSent, move |event| {
        let unread = counter.lock().unread_notifications();
        println!("[notification] {} ({unread} unread)", event.record("notification"));
    });
    dispatcher.on(EventKind::JobUpdated, |event| {
        println!("[job] {}", event.record("job"));
    });

    println!("watching for updates, Ctrl-C to stop");
    tokio::select! {
        received = dispatcher.run(events) => info!(received, "connection closed"),
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    let feed = feed.lock();
    info!(
        messages = feed.messages().len(),
        notifications = feed.notifications().len(),
        jobs = feed.jobs().len(),
        "session summary"
    );
    Ok(())
}
