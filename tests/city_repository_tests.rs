//! Integration tests for CityRepository

mod test_utils;

use city_temperatures::models::{City, Temperature};
use city_temperatures::repositories::{
    CityChanges, CityRepository, NewCity, RepositoryError, TemperatureRepository,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{seed_city, setup_test_db};

#[tokio::test]
async fn test_create_and_get_city() {
    let db = setup_test_db().await.unwrap();
    let repo = CityRepository::new(&db);

    let created = repo
        .create(NewCity {
            name: "Kyiv".to_string(),
            additional_info: Some("Capital".to_string()),
            latitude: 50.45,
            longitude: 30.52,
        })
        .await
        .unwrap();

    let fetched = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.additional_info.as_deref(), Some("Capital"));
}

#[tokio::test]
async fn test_get_missing_city_is_none() {
    let db = setup_test_db().await.unwrap();

    assert!(CityRepository::new(&db).get(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_name_is_already_exists() {
    let db = setup_test_db().await.unwrap();
    seed_city(&db, "Paris", 48.85, 2.35).await.unwrap();

    let err = seed_city(&db, "Paris", 0.0, 0.0)
        .await
        .unwrap_err()
        .downcast::<RepositoryError>()
        .unwrap();

    assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    assert_eq!(City::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_orders_by_id() {
    let db = setup_test_db().await.unwrap();
    let b = seed_city(&db, "B", 1.0, 1.0).await.unwrap();
    let a = seed_city(&db, "A", 2.0, 2.0).await.unwrap();

    let names: Vec<String> = CityRepository::new(&db)
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|city| city.name)
        .collect();

    assert!(b.id < a.id);
    assert_eq!(names, vec!["B", "A"]);
}

#[tokio::test]
async fn test_update_only_touches_present_fields() {
    let db = setup_test_db().await.unwrap();
    let repo = CityRepository::new(&db);
    let city = repo
        .create(NewCity {
            name: "Lviv".to_string(),
            additional_info: Some("West".to_string()),
            latitude: 49.84,
            longitude: 24.03,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            city.clone(),
            CityChanges {
                longitude: Some(24.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Lviv");
    assert_eq!(updated.additional_info.as_deref(), Some("West"));
    assert_eq!(updated.latitude, 49.84);
    assert_eq!(updated.longitude, 24.0);

    let cleared = repo
        .update(
            updated,
            CityChanges {
                additional_info: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.additional_info, None);
    assert_eq!(repo.get(city.id).await.unwrap().unwrap(), cleared);
}

#[tokio::test]
async fn test_update_without_changes_returns_city() {
    let db = setup_test_db().await.unwrap();
    let city = seed_city(&db, "Rome", 41.9, 12.5).await.unwrap();

    let same = CityRepository::new(&db)
        .update(city.clone(), CityChanges::default())
        .await
        .unwrap();

    assert_eq!(same, city);
}

#[tokio::test]
async fn test_rename_to_taken_name_is_already_exists() {
    let db = setup_test_db().await.unwrap();
    seed_city(&db, "Madrid", 40.4, -3.7).await.unwrap();
    let seville = seed_city(&db, "Seville", 37.4, -6.0).await.unwrap();

    let err = CityRepository::new(&db)
        .update(
            seville.clone(),
            CityChanges {
                name: Some("Madrid".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    let unchanged = CityRepository::new(&db).get(seville.id).await.unwrap();
    assert_eq!(unchanged.unwrap().name, "Seville");
}

#[tokio::test]
async fn test_delete_removes_city_and_its_readings() {
    let db = setup_test_db().await.unwrap();
    let doomed = seed_city(&db, "Prague", 50.08, 14.43).await.unwrap();
    let kept = seed_city(&db, "Brno", 49.19, 16.6).await.unwrap();

    let readings = TemperatureRepository::new(&db);
    readings.create(doomed.id, 1.0, None).await.unwrap();
    readings.create(doomed.id, 2.0, None).await.unwrap();
    readings.create(kept.id, 3.0, None).await.unwrap();

    CityRepository::new(&db).delete(doomed.clone()).await.unwrap();

    assert!(CityRepository::new(&db).get(doomed.id).await.unwrap().is_none());
    assert!(readings.list(Some(doomed.id)).await.unwrap().is_empty());
    assert_eq!(Temperature::find().count(&db).await.unwrap(), 1);
}
