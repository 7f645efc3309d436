use commerce_api::{
    config::AppConfig,
    db::{connect, run_migrations},
    dto::{auth::RegisterRequest, products::CreateProductRequest},
    error::AppError,
    models::User,
    routes::params::PageRequest,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let (db, write_pool) = connect(&config).await?;
    run_migrations(&write_pool).await?;
    let state = AppState::new(db, &config);

    let admin = ensure_user(&state, "admin", "admin@example.com", "admin123", "admin").await?;
    let trainee = ensure_user(&state, "trainee", "trainee@example.com", "trainee123", "trainee").await?;
    seed_products(&state, &admin).await?;

    println!(
        "Seed completed. Admin ID: {}, Trainee ID: {} (cart {})",
        admin.id, trainee.id, trainee.cart_id
    );
    Ok(())
}

async fn ensure_user(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<User> {
    match state.users.get_by_username(username).await {
        Ok(user) => {
            println!("User {username} already present");
            return Ok(user);
        }
        Err(AppError::NotFound(_)) => {}
        Err(err) => return Err(err.into()),
    }

    let user = state
        .users
        .create(RegisterRequest {
            email: email.to_string(),
            user_name: username.to_string(),
            name: username.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        })
        .await?;
    println!("Created user {username} (role={})", user.role);
    Ok(user)
}

async fn seed_products(state: &AppState, admin: &User) -> anyhow::Result<()> {
    let products = [
        ("Axum Hoodie", 50, 55.0),
        ("Ferris Mug", 100, 12.0),
        ("Rust Sticker Pack", 200, 5.0),
        ("E-book: Async Rust", 75, 25.0),
    ];

    for (name, stock, price) in products {
        let existing = state
            .products
            .get_all(PageRequest::default(), Some(name.to_string()))
            .await?;
        if existing.items.iter().any(|p| p.name == name) {
            continue;
        }
        state
            .products
            .create(
                CreateProductRequest {
                    name: name.to_string(),
                    stock,
                    price,
                },
                admin.id,
            )
            .await?;
    }

    println!("Seeded products");
    Ok(())
}
