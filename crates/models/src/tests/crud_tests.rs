use anyhow::Result;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, TransactionTrait};
use uuid::Uuid;

use super::setup_test_db;
use crate::errors::ModelError;
use crate::{banner, category, product, profile, session, user, user_credentials};

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_category_product_crud() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let txn = db.begin().await?;

    let (cat, created) = category::get_or_create(&txn, &unique("Carnes")).await?;
    assert!(created);
    let (again, created_again) = category::get_or_create(&txn, &cat.name).await?;
    assert!(!created_again);
    assert_eq!(again.id, cat.id);

    let p = product::create(&txn, product::NewProduct {
        name: unique("Chicharrón Premium 500g"),
        description: Some("Chicharrón de cerdo crocante".into()),
        price: Decimal::from(18000),
        category_id: cat.id,
        stock: 50,
        image: None,
        featured: false,
    }).await?;
    assert_eq!(p.price, Decimal::new(1800000, 2));
    assert_eq!(p.category_id, cat.id);
    assert!(!p.featured);

    let found = product::Entity::find_by_id(p.id)
        .find_also_related(category::Entity)
        .one(&txn)
        .await?;
    let (found, found_cat) = found.expect("product exists");
    assert_eq!(found.name, p.name);
    assert_eq!(found_cat.map(|c| c.name), Some(cat.name.clone()));

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_product_requires_existing_category() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let res = product::create(&db, product::NewProduct {
        name: unique("Huérfano"),
        description: None,
        price: Decimal::ONE,
        category_id: i32::MAX,
        stock: 1,
        image: None,
        featured: false,
    }).await;
    assert!(matches!(res, Err(ModelError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn test_banner_defaults() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let txn = db.begin().await?;
    let title = unique("Promo");
    let b = banner::create(&txn, banner::NewBanner::new(&title, "Solo hoy", "banners/promo.png")).await?;
    assert_eq!(b.tag, banner::DEFAULT_TAG);
    assert_eq!(b.button_label, "VER MÁS");
    assert!(b.active);
    let (again, created) = banner::get_or_create(&txn, banner::NewBanner::new(&title, "Otro", "banners/x.png")).await?;
    assert!(!created);
    assert_eq!(again.id, b.id);
    assert_eq!(again.subtitle, "Solo hoy");
    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_user_profile_session_crud() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let txn = db.begin().await?;

    let username = unique("cliente");
    let u = user::create(&txn, user::NewUser {
        username: username.clone(),
        email: "cliente@tienda.co".into(),
        first_name: "Ana".into(),
        last_name: "Ruiz".into(),
    }).await?;
    assert!(u.last_login.is_none());

    let dup = user::create(&txn, user::NewUser {
        username: username.clone(),
        email: "otro@tienda.co".into(),
        first_name: String::new(),
        last_name: String::new(),
    }).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));
    // a failed statement aborts a Postgres transaction
    txn.rollback().await?;

    let txn = db.begin().await?;
    let u = user::create(&txn, user::NewUser {
        username: username.clone(),
        email: "cliente@tienda.co".into(),
        first_name: "Ana".into(),
        last_name: "Ruiz".into(),
    }).await?;
    let cred = user_credentials::upsert_password(&txn, u.id, "$argon2id$v=19$stub".into(), "argon2").await?;
    assert_eq!(cred.user_id, u.id);
    let p = profile::create(&txn, u.id, "3001234567", "Calle 10 # 5-20").await?;
    assert_eq!(profile::find_by_user(&txn, u.id).await?.map(|x| x.id), Some(p.id));

    let token = unique("tok");
    session::create(&txn, &token, u.id, Utc::now() + Duration::hours(1)).await?;
    let expired = unique("old");
    session::create(&txn, &expired, u.id, Utc::now() - Duration::hours(1)).await?;
    assert_eq!(session::delete_expired_for_user(&txn, u.id, Utc::now()).await?, 1);
    assert!(session::find(&txn, &token).await?.is_some());
    assert!(session::delete(&txn, &token).await?);
    assert!(!session::delete(&txn, &token).await?);

    user::record_login(&txn, u.id, Utc::now().into()).await?;
    let reloaded = user::find_by_username(&txn, &username).await?.expect("user");
    assert!(reloaded.last_login.is_some());

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_user_and_profile_partial_update() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let txn = db.begin().await?;

    let u = user::create(&txn, user::NewUser {
        username: unique("perfil"),
        email: "perfil@tienda.co".into(),
        first_name: "Luis".into(),
        last_name: String::new(),
    }).await?;
    profile::create(&txn, u.id, "111", "Calle 1").await?;

    let updated = user::update(&txn, u.id, user::UserChanges {
        last_name: Some("Pérez".into()),
        ..Default::default()
    }).await?;
    assert_eq!(updated.first_name, "Luis");
    assert_eq!(updated.last_name, "Pérez");

    let p = profile::update(&txn, u.id, None, Some("Carrera 7")).await?;
    assert_eq!(p.phone, "111");
    assert_eq!(p.address, "Carrera 7");
    assert!(matches!(profile::update(&txn, u.id, Some(&"9".repeat(21)), None).await, Err(ModelError::Validation(_))));

    txn.rollback().await?;
    Ok(())
}
