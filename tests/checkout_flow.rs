use commerce_api::{
    config::AppConfig,
    db::{Db, create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        cart::{AddToCartRequest, CheckoutRequest},
        products::CreateProductRequest,
    },
    error::AppError,
    models::{
        OrderItem, OrderItemPayload, OrderPayload, OrderStatus, Product, Role, SoftDelete,
    },
    repositories::{OrderFilter, OrderRepository, PgOrderRepository},
    routes::params::PageRequest,
    state::AppState,
    utils::jwt::Claims,
};
use sea_orm::SqlxPostgresConnector;
use uuid::Uuid;

struct Ctx {
    state: AppState,
    db: Db,
}

/// Connects to `TEST_DATABASE_URL` (or `DATABASE_URL`). `None` means skip.
async fn setup() -> anyhow::Result<Option<Ctx>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;
    let db = Db::single(SqlxPostgresConnector::from_sqlx_postgres_pool(pool));

    let config = AppConfig {
        database_url: database_url.clone(),
        read_database_url: database_url,
        max_connections: 5,
        jwt_secret: "integration-secret".into(),
        jwt_ttl_minutes: 60,
        jwt_issuer: "commerce-api".into(),
        host: "127.0.0.1".into(),
        port: 0,
    };
    Ok(Some(Ctx {
        state: AppState::new(db.clone(), &config),
        db,
    }))
}

/// Registers a fresh user and returns the claims of its token.
async fn register(state: &AppState, prefix: &str, role: &str) -> anyhow::Result<Claims> {
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("{prefix}-{}", &suffix[..12]);
    let token = state
        .auth
        .register(RegisterRequest {
            email: format!("{username}@example.com"),
            user_name: username.clone(),
            name: prefix.to_string(),
            password: "wonderland".into(),
            role: role.into(),
        })
        .await?;
    Ok(state.jwt.verify(&token.access_token)?)
}

async fn product(state: &AppState, stock: i32, price: f64) -> anyhow::Result<Product> {
    Ok(state
        .products
        .create(
            CreateProductRequest {
                name: format!("P-{}", Uuid::new_v4()),
                stock,
                price,
            },
            Uuid::new_v4(),
        )
        .await?)
}

#[tokio::test]
async fn register_add_checkout_and_cancel() -> anyhow::Result<()> {
    let Some(Ctx { state, .. }) = setup().await? else {
        return Ok(());
    };

    let alice = register(&state, "alice", "trainee").await?;
    assert_eq!(alice.role, Role::Trainee);

    let login = state
        .auth
        .login(LoginRequest {
            user_name: alice.user_name.clone(),
            password: "wonderland".into(),
        })
        .await?;
    assert_eq!(state.jwt.verify(&login.access_token)?.cart_id, alice.cart_id);

    let wrong = state
        .auth
        .login(LoginRequest {
            user_name: alice.user_name.clone(),
            password: "looking-glass".into(),
        })
        .await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

    let p1 = product(&state, 5, 10.0).await?;
    let item = state
        .carts
        .add_to_cart(
            AddToCartRequest {
                product_id: p1.id,
                quantity: 2,
            },
            alice.user_id,
            alice.cart_id,
        )
        .await?;
    assert_eq!(item.price, 20.0);

    let too_many = state
        .carts
        .add_to_cart(
            AddToCartRequest {
                product_id: p1.id,
                quantity: 6,
            },
            alice.user_id,
            alice.cart_id,
        )
        .await;
    assert!(matches!(too_many, Err(AppError::BadRequest(_))));

    // Same product again: merged into the existing line, not a second row.
    let merged = state
        .carts
        .add_to_cart(
            AddToCartRequest {
                product_id: p1.id,
                quantity: 1,
            },
            alice.user_id,
            alice.cart_id,
        )
        .await?;
    assert_eq!(merged.id, item.id);
    assert_eq!(merged.quantity, 3);
    assert_eq!(merged.price, 30.0);

    let items = state.carts.get_cart_items(alice.cart_id).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 3);
    assert_eq!(items[0].price, 30.0);

    let order = state
        .carts
        .checkout(
            CheckoutRequest {
                items: vec![merged.id],
            },
            alice.cart_id,
            alice.user_id,
        )
        .await?;
    assert_eq!(order.total_price, 30.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(state.carts.get_cart_items(alice.cart_id).await?.is_empty());

    let stored = state
        .orders
        .get_by_id(order.id, alice.user_id, alice.role)
        .await?;
    assert_eq!(stored.order_items.len(), 1);
    assert_eq!(stored.order_items[0].quantity, 3);
    assert_eq!(stored.order_items[0].price, 30.0);

    let bob = register(&state, "bob", "trainee").await?;
    let denied = state
        .orders
        .cancel_order(order.id, bob.user_id, bob.role)
        .await;
    assert!(matches!(denied, Err(AppError::Unauthorized(_))));
    let untouched = state
        .orders
        .get_by_id(order.id, alice.user_id, alice.role)
        .await?;
    assert!(untouched.deleted.is_none());

    let cancelled = state
        .orders
        .cancel_order(order.id, alice.user_id, alice.role)
        .await?;
    assert!(cancelled.is_deleted());

    let reloaded = state
        .orders
        .get_by_id(order.id, alice.user_id, alice.role)
        .await?;
    let stamp = reloaded.deleted.expect("order tombstone");
    assert_eq!(stamp.deleted_by, alice.user_id);
    assert!(reloaded
        .order_items
        .iter()
        .all(|i| i.deleted.map(|t| t.deleted_by) == Some(alice.user_id)));

    Ok(())
}

#[tokio::test]
async fn checkout_with_unknown_item_creates_no_order() -> anyhow::Result<()> {
    let Some(Ctx { state, .. }) = setup().await? else {
        return Ok(());
    };

    let carol = register(&state, "carol", "trainee").await?;
    let result = state
        .carts
        .checkout(
            CheckoutRequest {
                items: vec![Uuid::new_v4()],
            },
            carol.cart_id,
            carol.user_id,
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let orders = state
        .orders
        .get_all(
            PageRequest::default(),
            OrderFilter::default(),
            carol.user_id,
            carol.role,
        )
        .await?;
    assert_eq!(orders.total, 0);
    Ok(())
}

#[tokio::test]
async fn failed_item_update_rolls_back_order_cancel() -> anyhow::Result<()> {
    let Some(Ctx { state, db }) = setup().await? else {
        return Ok(());
    };

    let dave = register(&state, "dave", "trainee").await?;
    let p = product(&state, 3, 4.0).await?;
    let order = state
        .orders
        .create_order(
            OrderPayload {
                user_id: dave.user_id,
                total_price: 4.0,
                status: OrderStatus::Pending,
            },
            vec![OrderItemPayload {
                product_id: p.id,
                user_id: dave.user_id,
                quantity: 1,
                price: 4.0,
            }],
        )
        .await?;

    // An item that was never stored makes the per-item update fail mid-transaction.
    let ghost = OrderItem::new_from_payload(
        OrderItemPayload {
            product_id: p.id,
            user_id: dave.user_id,
            quantity: 1,
            price: 4.0,
        },
        order.id,
    );
    let mut doomed = state
        .orders
        .get_by_id(order.id, dave.user_id, dave.role)
        .await?;
    doomed.order_items.push(ghost);
    doomed.cancel(dave.user_id)?;

    let repo = PgOrderRepository::new(db);
    assert!(repo.cancel(doomed).await.is_err());

    let reloaded = state
        .orders
        .get_by_id(order.id, dave.user_id, dave.role)
        .await?;
    assert!(reloaded.deleted.is_none());
    assert!(reloaded.order_items.iter().all(|i| i.deleted.is_none()));
    Ok(())
}

#[tokio::test]
async fn second_cancel_from_a_stale_read_conflicts() -> anyhow::Result<()> {
    let Some(Ctx { state, db }) = setup().await? else {
        return Ok(());
    };

    let hank = register(&state, "hank", "trainee").await?;
    let admin = register(&state, "admin", "admin").await?;
    let order = state
        .orders
        .create_order(
            OrderPayload {
                user_id: hank.user_id,
                total_price: 0.0,
                status: OrderStatus::Pending,
            },
            Vec::new(),
        )
        .await?;

    // Both readers see a live order before either writes.
    let mut first = state
        .orders
        .get_by_id(order.id, hank.user_id, hank.role)
        .await?;
    let mut second = first.clone();
    first.cancel(hank.user_id)?;
    second.cancel(admin.user_id)?;

    let repo = PgOrderRepository::new(db);
    repo.cancel(first).await?;
    let lost = repo.cancel(second).await;
    assert!(matches!(lost, Err(AppError::Conflict(_))));

    let reloaded = state
        .orders
        .get_by_id(order.id, hank.user_id, hank.role)
        .await?;
    assert_eq!(reloaded.deleted.map(|t| t.deleted_by), Some(hank.user_id));
    Ok(())
}

#[tokio::test]
async fn product_title_filter_treats_wildcards_literally() -> anyhow::Result<()> {
    let Some(Ctx { state, .. }) = setup().await? else {
        return Ok(());
    };

    let marker = Uuid::new_v4().simple().to_string();
    let plain = state
        .products
        .create(
            CreateProductRequest {
                name: format!("{marker}ab"),
                stock: 1,
                price: 1.0,
            },
            Uuid::new_v4(),
        )
        .await?;
    let underscored = state
        .products
        .create(
            CreateProductRequest {
                name: format!("{marker}a_b"),
                stock: 1,
                price: 1.0,
            },
            Uuid::new_v4(),
        )
        .await?;

    let found = state
        .products
        .get_all(PageRequest::default(), Some(format!("{marker}a_")))
        .await?;
    let ids: Vec<_> = found.items.iter().map(|p| p.id).collect();
    assert!(ids.contains(&underscored.id));
    assert!(!ids.contains(&plain.id));
    Ok(())
}

#[tokio::test]
async fn trainee_listing_never_shows_other_users_orders() -> anyhow::Result<()> {
    let Some(Ctx { state, .. }) = setup().await? else {
        return Ok(());
    };

    let erin = register(&state, "erin", "trainee").await?;
    let frank = register(&state, "frank", "trainee").await?;
    for user in [&erin, &frank] {
        state
            .orders
            .create_order(
                OrderPayload {
                    user_id: user.user_id,
                    total_price: 0.0,
                    status: OrderStatus::Pending,
                },
                Vec::new(),
            )
            .await?;
    }

    let filter = OrderFilter {
        user_id: Some(erin.user_id),
        ..Default::default()
    };
    let seen = state
        .orders
        .get_all(PageRequest::default(), filter, frank.user_id, frank.role)
        .await?;

    assert_eq!(seen.total, 1);
    assert!(seen.items.iter().all(|o| o.user_id == frank.user_id));
    Ok(())
}

#[tokio::test]
async fn duplicate_username_conflicts_and_deleted_user_cannot_log_in() -> anyhow::Result<()> {
    let Some(Ctx { state, .. }) = setup().await? else {
        return Ok(());
    };

    let grace = register(&state, "grace", "root").await?;
    assert_eq!(grace.role, Role::Trainee);

    let duplicate = state
        .auth
        .register(RegisterRequest {
            email: format!("other-{}@example.com", Uuid::new_v4().simple()),
            user_name: grace.user_name.clone(),
            name: "Grace".into(),
            password: "pw".into(),
            role: "trainee".into(),
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    state.users.delete_by_id(grace.user_id, grace.user_id).await?;
    let again = state.users.delete_by_id(grace.user_id, grace.user_id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let login = state
        .auth
        .login(LoginRequest {
            user_name: grace.user_name.clone(),
            password: "wonderland".into(),
        })
        .await;
    assert!(matches!(login, Err(AppError::Unauthorized(_))));
    Ok(())
}
