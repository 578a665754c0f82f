use agrihub::{
    auth::AuthService,
    domain::{
        AnnouncementStatus, CreateAnnouncementRequest, CreateProgramRequest, PreferredContact,
        ProgramStatus, RegisterFarmerRequest,
    },
    repository::{
        AnnouncementRepository, FarmerRepository, ProgramRepository,
        SqliteAnnouncementRepository, SqliteFarmerRepository, SqliteProgramRepository,
    },
};
use chrono::{Duration, Utc};
use clap::Parser;
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;

#[derive(Parser)]
#[command(about = "Seed the AgriHub database with demo data")]
struct Args {
    /// Number of fake farmer accounts to create
    #[arg(long, default_value_t = 5)]
    farmers: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    // Initialize database connection
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:agrihub.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize repositories
    let farmer_repo = SqliteFarmerRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());
    let program_repo = SqliteProgramRepository::new(db_pool.clone());

    // Seed farmers
    println!("👥 Creating farmers...");

    let admin_hash = AuthService::hash_password("admin123").await?;
    let admin = farmer_repo
        .create(
            RegisterFarmerRequest {
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: "admin@agrihub.local".to_string(),
                password: "admin123".to_string(),
                phone_number: None,
                date_of_birth: None,
                gender: None,
                farm_address: None,
                farm_size: None,
                farm_type: None,
                crops_grown: vec![],
                farming_experience: None,
                organization_member: false,
                organization_name: None,
                preferred_contact: PreferredContact::Email,
            },
            admin_hash,
        )
        .await?;

    // The registration path always creates plain farmer accounts, so the
    // admin role is set directly.
    sqlx::query("UPDATE farmers SET role = 'admin' WHERE id = ?")
        .bind(admin.id)
        .execute(&db_pool)
        .await?;

    let farmer_hash = AuthService::hash_password("farmer123").await?;
    for _ in 0..args.farmers {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let email: String = SafeEmail().fake();
        let street: String = StreetName().fake();
        let phone: String = PhoneNumber().fake();

        farmer_repo
            .create(
                RegisterFarmerRequest {
                    first_name,
                    last_name,
                    email,
                    password: "farmer123".to_string(),
                    phone_number: Some(phone),
                    date_of_birth: None,
                    gender: None,
                    farm_address: Some(format!("{} Road, Barangay San Isidro", street)),
                    farm_size: Some("2 hectares".to_string()),
                    farm_type: Some("Crop farming".to_string()),
                    crops_grown: vec!["rice".to_string(), "corn".to_string()],
                    farming_experience: Some("5-10 years".to_string()),
                    organization_member: false,
                    organization_name: None,
                    preferred_contact: PreferredContact::Email,
                },
                farmer_hash.clone(),
            )
            .await?;
    }

    // Seed announcements
    println!("📢 Creating announcements...");

    let now = Utc::now();

    announcement_repo
        .create(CreateAnnouncementRequest {
            title: "Welcome to Agricultural Information System".to_string(),
            content: "We are excited to launch our new platform dedicated to supporting \
                      agricultural development in our community."
                .to_string(),
            category: Some("General".to_string()),
            status: AnnouncementStatus::Published,
            image_url: None,
            published_at: Some(now),
            expires_at: None,
        })
        .await?;

    announcement_repo
        .create(CreateAnnouncementRequest {
            title: "New Farming Techniques Workshop".to_string(),
            content: "Join us for a workshop on modern farming techniques this weekend. \
                      Learn about sustainable practices and efficient crop management."
                .to_string(),
            category: Some("Workshop".to_string()),
            status: AnnouncementStatus::Published,
            image_url: None,
            published_at: Some(now),
            expires_at: Some(now + Duration::days(7)),
        })
        .await?;

    announcement_repo
        .create(CreateAnnouncementRequest {
            title: "Seasonal Crop Planning Guide".to_string(),
            content: "Get ready for the upcoming planting season with our comprehensive \
                      crop planning guide."
                .to_string(),
            category: Some("Guide".to_string()),
            status: AnnouncementStatus::Published,
            image_url: None,
            published_at: Some(now),
            expires_at: None,
        })
        .await?;

    announcement_repo
        .create(CreateAnnouncementRequest {
            title: "Fertilizer Subsidy (draft)".to_string(),
            content: "Details of the upcoming fertilizer subsidy are being finalized.".to_string(),
            category: Some("Subsidy".to_string()),
            status: AnnouncementStatus::Draft,
            image_url: None,
            published_at: None,
            expires_at: None,
        })
        .await?;

    // Seed programs
    println!("🌾 Creating programs...");

    program_repo
        .create(CreateProgramRequest {
            title: "Rice Production Enhancement Program".to_string(),
            description: "Training and certified seed distribution for rice farmers."
                .to_string(),
            category: Some("Training".to_string()),
            status: ProgramStatus::Active,
            starts_on: Some(now.date_naive()),
            ends_on: Some((now + Duration::days(90)).date_naive()),
            location: Some("Municipal Agriculture Office".to_string()),
            capacity: Some(50),
        })
        .await?;

    program_repo
        .create(CreateProgramRequest {
            title: "Organic Farming Transition".to_string(),
            description: "Assistance for farms converting to organic certification."
                .to_string(),
            category: Some("Assistance".to_string()),
            status: ProgramStatus::Upcoming,
            starts_on: Some((now + Duration::days(30)).date_naive()),
            ends_on: None,
            location: None,
            capacity: None,
        })
        .await?;

    println!("✅ Seeding complete.");
    println!("   Admin login: admin@agrihub.local / admin123");

    Ok(())
}
