/**
 * Seed Users Binary
 *
 * Creates (or resets) the development accounts alice, bob and charlie in
 * the database named by `DATABASE_URL`.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use feedline::backend::seed::{seed_users, SEED_PASSWORD};
    use feedline::backend::server::{config::load_database, ServerConfig};

    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = ServerConfig::from_env();
    let pool = load_database(&config.database_url).await?;

    let users = seed_users(&pool, config.bcrypt_cost).await?;
    for user in &users {
        println!("{} <{}> / {}", user.username, user.email, SEED_PASSWORD);
    }

    pool.close().await;
    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Seeding requires the 'ssr' feature to be enabled.");
    std::process::exit(1);
}
