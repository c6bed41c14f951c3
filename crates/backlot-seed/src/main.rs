//! Backlot seed CLI
//!
//! Runs migrations, loads demo data, or wipes the database. Demo data is
//! generated with `fake` so every run produces a fresh-looking console.

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use fake::faker::company::en::{Buzzword, CompanyName};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backlot_auth::JwtService;
use backlot_core::config::AppConfig;
use backlot_core::{AppError, Id};
use backlot_db::{
    AssistantRepo, CallRepo, CampaignRepo, CollectionRepo, ContactRepo, CustomerRepo, Database,
    DatabaseConfig, PhoneNumberRepo, ProductRepo, SupplierRepo,
};
use backlot_models::{
    CallStatus, CampaignStatus, CreateAssistant, CreateCall, CreateCampaign, CreateCollection,
    CreateContact, CreateCustomer, CreateOrder, CreatePhoneNumber, CreateProduct, CreateSupplier,
    CreateUser, OrderItemInput, OrderStatus, UpdateOrder, User, UserRole,
};
use backlot_services::{AccountService, OrderService};

#[derive(Parser)]
#[command(name = "backlot-seed")]
#[command(version, about = "Backlot database utilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending migrations
    Migrate,
    /// Populate the database with demo data (runs migrations first)
    Demo(DemoArgs),
    /// Truncate every Backlot table
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct DemoArgs {
    /// Login of the seeded admin account
    #[arg(long, default_value = "admin@backlot.test")]
    admin_email: String,
    /// Password of the seeded admin account
    #[arg(long, default_value = "backlot-admin")]
    admin_password: String,
    #[arg(long, default_value_t = 3)]
    assistants: usize,
    #[arg(long, default_value_t = 25)]
    contacts: usize,
    #[arg(long, default_value_t = 20)]
    products: usize,
    #[arg(long, default_value_t = 10)]
    customers: usize,
    #[arg(long, default_value_t = 15)]
    orders: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("load configuration")?;

    let db = Database::connect(&DatabaseConfig::from(&config.database))
        .await
        .context("connect to database")?;

    match cli.command {
        Commands::Migrate => {
            db.migrate().await.context("run migrations")?;
            info!("migrations applied");
        }
        Commands::Demo(args) => {
            db.migrate().await.context("run migrations")?;
            seed_demo(&db, &config, &args).await?;
        }
        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("refusing to truncate without --yes");
            }
            reset(&db).await?;
            info!("database reset");
        }
    }

    db.close().await;
    Ok(())
}

async fn reset(db: &Database) -> anyhow::Result<()> {
    sqlx::query(
        "TRUNCATE order_items, orders, customers, collection_products, collections, products, \
         suppliers, calls, phone_numbers, campaign_contacts, campaigns, contacts, assistants, \
         users RESTART IDENTITY CASCADE",
    )
    .execute(db.pool())
    .await?;
    Ok(())
}

async fn seed_demo(db: &Database, config: &AppConfig, args: &DemoArgs) -> anyhow::Result<()> {
    let pool = db.pool().clone();
    let mut rng = rand::thread_rng();

    let admin = ensure_admin(&pool, config, args).await?;
    info!(email = %admin.email, "admin account ready");

    // Console side: assistants, contacts, campaigns, phone numbers, calls.
    let assistants = AssistantRepo::new(pool.clone());
    let models = ["gpt-4o", "claude-3-5-sonnet", "gemini-1.5-pro"];
    let voices = ["alloy", "echo", "nova", "shimmer"];
    let mut assistant_ids = Vec::new();
    for i in 0..args.assistants {
        let row = assistants
            .create(
                admin.id,
                CreateAssistant {
                    name: format!("{} Assistant", Buzzword().fake::<String>()),
                    description: Some(Sentence(4..9).fake()),
                    model: models[i % models.len()].to_string(),
                    voice: voices[i % voices.len()].to_string(),
                    first_message: "Hi! How can I help you today?".into(),
                    system_prompt: Sentence(8..15).fake(),
                    active: true,
                },
            )
            .await?;
        assistant_ids.push(row.id);
    }
    info!(count = assistant_ids.len(), "assistants seeded");

    let contacts = ContactRepo::new(pool.clone());
    let mut contact_ids = Vec::new();
    for _ in 0..args.contacts {
        let row = contacts
            .create(
                admin.id,
                CreateContact {
                    name: Name().fake(),
                    phone: random_phone(&mut rng),
                    email: Some(random_email(&mut rng)),
                    notes: None,
                },
            )
            .await?;
        contact_ids.push(row.id);
    }
    info!(count = contact_ids.len(), "contacts seeded");

    let campaigns = CampaignRepo::new(pool.clone());
    let statuses = [
        CampaignStatus::Draft,
        CampaignStatus::Scheduled,
        CampaignStatus::Active,
        CampaignStatus::Paused,
        CampaignStatus::Completed,
    ];
    for n in 1..=3usize {
        let campaign = campaigns
            .create(
                admin.id,
                CreateCampaign {
                    name: format!("{} Outreach {}", Buzzword().fake::<String>(), n),
                    description: Some(Sentence(4..9).fake()),
                    status: *statuses.choose(&mut rng).unwrap(),
                    assistant_id: assistant_ids.choose(&mut rng).copied(),
                },
            )
            .await?;

        if !contact_ids.is_empty() {
            let amount = rng.gen_range(1..=contact_ids.len().min(8));
            let picked: Vec<Id> = contact_ids
                .choose_multiple(&mut rng, amount)
                .copied()
                .collect();
            campaigns.attach_contacts(campaign.id, &picked).await?;
        }
    }
    info!("campaigns seeded");

    let phone_numbers = PhoneNumberRepo::new(pool.clone());
    let mut phone_number_ids = Vec::new();
    for i in 0..assistant_ids.len().max(2) {
        let row = phone_numbers
            .create(CreatePhoneNumber {
                number: random_phone(&mut rng),
                label: Some(format!("Line {}", i + 1)),
                provider: Some("twilio".into()),
                assistant_id: assistant_ids.get(i).copied(),
                active: true,
            })
            .await?;
        phone_number_ids.push(row.id);
    }
    info!(count = phone_number_ids.len(), "phone numbers seeded");

    let calls = CallRepo::new(pool.clone());
    let call_statuses = [
        CallStatus::Queued,
        CallStatus::InProgress,
        CallStatus::Completed,
        CallStatus::Failed,
        CallStatus::NoAnswer,
    ];
    let call_count = if assistant_ids.is_empty() { 0 } else { args.contacts.min(15) };
    for _ in 0..call_count {
        calls
            .create(CreateCall {
                assistant_id: *assistant_ids.choose(&mut rng).unwrap(),
                contact_id: contact_ids.choose(&mut rng).copied(),
                phone_number_id: phone_number_ids.choose(&mut rng).copied(),
                status: *call_statuses.choose(&mut rng).unwrap(),
                started_at: Some(Utc::now() - Duration::minutes(rng.gen_range(5..10_000))),
            })
            .await?;
    }
    info!("calls seeded");

    // Wholesale side: suppliers, products, collections, customers, orders.
    let suppliers = SupplierRepo::new(pool.clone());
    let mut supplier_ids = Vec::new();
    for _ in 0..4 {
        let row = suppliers
            .create(CreateSupplier {
                name: CompanyName().fake(),
                contact_name: Some(Name().fake()),
                email: Some(random_email(&mut rng)),
                phone: Some(random_phone(&mut rng)),
                address: None,
                lead_time_days: Some(rng.gen_range(2..30)),
                active: true,
            })
            .await?;
        supplier_ids.push(row.id);
    }
    info!(count = supplier_ids.len(), "suppliers seeded");

    let products = ProductRepo::new(pool.clone());
    let mut product_ids = Vec::new();
    for i in 0..args.products {
        let row = products
            .create(CreateProduct {
                supplier_id: supplier_ids.choose(&mut rng).copied(),
                sku: format!("SKU-{:03}-{:04}", i, rng.gen_range(0..10_000)),
                name: format!("{} {}", Buzzword().fake::<String>(), Buzzword().fake::<String>()),
                description: Some(Sentence(4..9).fake()),
                price_cents: rng.gen_range(5..500) * 100,
                stock: rng.gen_range(0..2_000),
                active: true,
            })
            .await?;
        product_ids.push(row.id);
    }
    info!(count = product_ids.len(), "products seeded");

    let collections = CollectionRepo::new(pool.clone());
    for name in ["Bestsellers", "New Arrivals", "Clearance"] {
        let collection = collections
            .create(CreateCollection {
                name: name.into(),
                description: Some(Sentence(4..9).fake()),
                active: true,
            })
            .await?;
        if !product_ids.is_empty() {
            let amount = rng.gen_range(1..=product_ids.len().min(6));
            let picked: Vec<Id> = product_ids
                .choose_multiple(&mut rng, amount)
                .copied()
                .collect();
            collections.attach_products(collection.id, &picked).await?;
        }
    }
    info!("collections seeded");

    let customers = CustomerRepo::new(pool.clone());
    let mut customer_ids = Vec::new();
    for _ in 0..args.customers {
        let row = customers
            .create(CreateCustomer {
                name: Name().fake(),
                email: random_email(&mut rng),
                phone: Some(random_phone(&mut rng)),
                company: Some(CompanyName().fake()),
                address: None,
            })
            .await?;
        customer_ids.push(row.id);
    }
    info!(count = customer_ids.len(), "customers seeded");

    let orders = OrderService::new(pool.clone());
    let mut placed = 0;
    let order_count = if customer_ids.is_empty() || product_ids.is_empty() {
        0
    } else {
        args.orders
    };
    for _ in 0..order_count {
        let item_count = rng.gen_range(1..=3);
        let items: Vec<OrderItemInput> = product_ids
            .choose_multiple(&mut rng, item_count)
            .map(|&product_id| OrderItemInput {
                product_id,
                quantity: rng.gen_range(1..=10),
            })
            .collect();

        let result = orders
            .place(CreateOrder {
                customer_id: *customer_ids.choose(&mut rng).unwrap(),
                notes: None,
                items,
            })
            .await?;
        placed += 1;

        // Walk some orders forward so the list view shows the whole lifecycle.
        let mut status = OrderStatus::Pending;
        for next in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            if !rng.gen_bool(0.6) {
                break;
            }
            orders
                .update(
                    result.order.id,
                    UpdateOrder {
                        status: Some(next),
                        notes: None,
                    },
                )
                .await?;
            status = next;
        }
        tracing::debug!(order_id = result.order.id, status = status.as_str(), "order seeded");
    }
    info!(count = placed, "orders seeded");

    Ok(())
}

/// Create the admin account, or load it when a previous run already did.
async fn ensure_admin(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    args: &DemoArgs,
) -> anyhow::Result<User> {
    let jwt = JwtService::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl_secs);
    let accounts = AccountService::new(pool.clone(), jwt);

    match accounts
        .create(CreateUser {
            email: args.admin_email.clone(),
            name: "Backlot Admin".into(),
            password: args.admin_password.clone(),
            role: UserRole::Admin,
            active: true,
        })
        .await
    {
        Ok(user) => Ok(user),
        Err(AppError::UniqueViolation { .. }) => accounts
            .login(&args.admin_email, &args.admin_password)
            .await
            .map(|(_, user)| user)
            .context("admin exists but the given password does not match"),
        Err(e) => Err(e.into()),
    }
}

fn random_phone(rng: &mut impl Rng) -> String {
    format!("+1555{:07}", rng.gen_range(0..10_000_000u32))
}

fn random_email(rng: &mut impl Rng) -> String {
    let name: String = Name().fake();
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '.' })
        .collect();
    format!("{}.{}@example.net", slug, rng.gen_range(100..100_000u32))
}
