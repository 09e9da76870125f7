mod common;

use rust_decimal_macros::dec;
use uuid::Uuid;
use vereinskasse_api::{
    errors::ServiceError,
    services::drinks::{DrinkService, DrinkUpdate, NewDrink},
};

fn new_drink(name: String) -> NewDrink {
    NewDrink {
        name,
        price: dec!(3.00),
        price_reduced: Some(dec!(2.50)),
        color: None,
    }
}

#[tokio::test]
#[ignore]
async fn create_assigns_sort_order_and_default_color() {
    let (db, sender) = common::setup().await;
    let svc = DrinkService::new(db.clone(), sender);

    let first = svc
        .create(new_drink(format!("Radler {}", Uuid::new_v4())))
        .await
        .expect("create first");
    let second = svc
        .create(new_drink(format!("Spezi {}", Uuid::new_v4())))
        .await
        .expect("create second");

    assert_eq!(first.color, "#667eea");
    assert!(second.sort_order > first.sort_order);
    assert!(first.active);
}

#[tokio::test]
#[ignore]
async fn duplicate_name_maps_to_conflict() {
    let (db, sender) = common::setup().await;
    let svc = DrinkService::new(db.clone(), sender);

    let name = format!("Helles {}", Uuid::new_v4());
    svc.create(new_drink(name.clone())).await.expect("create");
    let err = svc
        .create(new_drink(name))
        .await
        .expect_err("duplicate must fail");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
#[ignore]
async fn update_replaces_all_fields_and_can_deactivate() {
    let (db, sender) = common::setup().await;
    let svc = DrinkService::new(db.clone(), sender);

    let created = svc
        .create(new_drink(format!("Weizen {}", Uuid::new_v4())))
        .await
        .expect("create");

    let renamed = format!("Weizen alkoholfrei {}", Uuid::new_v4());
    let updated = svc
        .update(
            created.id,
            DrinkUpdate {
                name: renamed.clone(),
                price: dec!(3.50),
                price_reduced: None,
                active: false,
                color: "#112233".to_string(),
                sort_order: 42,
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.name, renamed);
    assert_eq!(updated.price, dec!(3.50));
    assert_eq!(updated.price_reduced, None);
    assert!(!updated.active);
    assert_eq!(updated.color, "#112233");
    assert_eq!(updated.sort_order, 42);

    let active = svc.list_active().await.expect("list_active");
    assert!(active.iter().all(|d| d.id != created.id));
    let all = svc.list_all().await.expect("list_all");
    assert!(all.iter().any(|d| d.id == created.id));
}

#[tokio::test]
#[ignore]
async fn update_unknown_drink_is_not_found() {
    let (db, sender) = common::setup().await;
    let svc = DrinkService::new(db.clone(), sender);

    let err = svc
        .update(
            i32::MAX,
            DrinkUpdate {
                name: "Nichts".to_string(),
                price: dec!(1.00),
                price_reduced: None,
                active: true,
                color: "#667eea".to_string(),
                sort_order: 0,
            },
        )
        .await
        .expect_err("unknown id must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
