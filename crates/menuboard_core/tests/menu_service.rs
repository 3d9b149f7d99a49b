use menuboard_core::{
    AppState, AuthError, CategoryInput, ImageBlob, ItemForm, ItemStatus, KvBackend, LoadOrigin,
    Locale, LocaleMap, MemoryKvBackend, MenuFilter, MenuService, RecordStore, ServiceError,
    Session, SqliteKvBackend, StoreError, StoreOptions, DEFAULT_STORAGE_KEY,
};

fn open_service(quota_bytes: usize) -> MenuService<MemoryKvBackend> {
    MenuService::open(RecordStore::new(
        MemoryKvBackend::new(quota_bytes),
        StoreOptions::default(),
    ))
}

fn stored_state(service: &MenuService<MemoryKvBackend>) -> AppState {
    let bytes = service
        .store()
        .backend()
        .get(DEFAULT_STORAGE_KEY)
        .unwrap()
        .expect("snapshot should exist");
    serde_json::from_slice(&bytes).unwrap()
}

fn tea_form() -> ItemForm {
    ItemForm {
        id: String::new(),
        category_id: "2".to_string(),
        price: "500".to_string(),
        status: "available".to_string(),
        image: String::new(),
        name: LocaleMap::new("Tea", "شاي", "چا"),
        desc: LocaleMap::english("Black tea"),
    }
}

#[test]
fn fresh_store_accepts_default_passphrase_only() {
    let mut service = open_service(1024 * 1024);
    assert_eq!(service.load_origin(), LoadOrigin::Seeded);

    let err = service.login("wrong").unwrap_err();
    assert!(matches!(err, ServiceError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(service.session(), Session::Anonymous);

    assert_eq!(service.login("manager").unwrap(), Session::Manager);
    assert_eq!(stored_state(&service).session, Session::Manager);
}

#[test]
fn short_new_password_is_rejected_and_unchanged() {
    let mut service = open_service(1024 * 1024);
    service.login("manager").unwrap();

    let err = service.change_password("manager", "abc").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Auth(AuthError::PolicyViolation { min_len: 4 })
    ));
    assert_eq!(service.state().settings.password, "manager");
    assert_eq!(service.session(), Session::Manager);
}

#[test]
fn password_change_forces_relogin_with_new_passphrase() {
    let mut service = open_service(1024 * 1024);
    service.login("manager").unwrap();

    service.change_password("manager", "abcd").unwrap();
    assert_eq!(service.session(), Session::Anonymous);
    assert_eq!(stored_state(&service).settings.password, "abcd");

    assert!(matches!(
        service.login("manager").unwrap_err(),
        ServiceError::Auth(AuthError::InvalidCredentials)
    ));
    assert_eq!(service.login("abcd").unwrap(), Session::Manager);
}

#[test]
fn wrong_old_password_is_rejected() {
    let mut service = open_service(1024 * 1024);
    service.login("manager").unwrap();
    assert!(matches!(
        service.change_password("guess", "abcdef").unwrap_err(),
        ServiceError::Auth(AuthError::InvalidCredentials)
    ));
    assert_eq!(service.state().settings.password, "manager");
}

#[test]
fn dashboard_operations_require_manager_session() {
    let mut service = open_service(1024 * 1024);
    let before = service.state().clone();

    let input = tea_form().parse().unwrap();
    assert!(matches!(
        service.upsert_item(input).unwrap_err(),
        ServiceError::NotAuthorized
    ));
    assert!(matches!(
        service.delete_category(1).unwrap_err(),
        ServiceError::NotAuthorized
    ));
    assert!(matches!(
        service.delete_item(1).unwrap_err(),
        ServiceError::NotAuthorized
    ));
    assert!(matches!(
        service.change_password("manager", "abcd").unwrap_err(),
        ServiceError::NotAuthorized
    ));
    assert_eq!(service.state(), &before);
}

#[test]
fn item_form_save_persists_and_shows_on_menu() {
    let mut service = open_service(1024 * 1024);
    service.login("manager").unwrap();

    let outcome = service.upsert_item(tea_form().parse().unwrap()).unwrap();
    assert!(outcome.is_created());
    assert_eq!(stored_state(&service), *service.state());

    service.switch_locale(Locale::Ku).unwrap();
    let drinks = service.menu(MenuFilter::Category(2));
    let names: Vec<&str> = drinks.iter().map(|card| card.name.as_str()).collect();
    assert_eq!(names, ["کۆلا", "چا"]);
    assert_eq!(drinks[1].price, "500 IQD");
    // No Kurdish description, so English is shown.
    assert_eq!(drinks[1].desc, "Black tea");
    assert_eq!(stored_state(&service).locale, Locale::Ku);
}

#[test]
fn switching_locale_never_touches_records() {
    let mut service = open_service(1024 * 1024);
    let records = (service.state().categories.clone(), service.state().items.clone());

    service.switch_locale(Locale::Ar).unwrap();
    assert_eq!(service.locale(), Locale::Ar);
    assert_eq!(
        (service.state().categories.clone(), service.state().items.clone()),
        records
    );
    assert_eq!(service.tabs()[0].label, "طعام");
}

#[test]
fn deleting_category_keeps_items_on_all_tab() {
    let mut service = open_service(1024 * 1024);
    service.login("manager").unwrap();

    assert!(service.delete_category(2).unwrap());
    assert!(!service.delete_category(2).unwrap());

    let all = service.menu(MenuFilter::All);
    assert_eq!(all.len(), 3);
    let cola = all.iter().find(|card| card.id == 3).unwrap();
    assert_eq!(cola.category_label, None);
    assert!(!cola.available);
}

#[test]
fn category_edit_round_trips_through_storage() {
    let mut service = open_service(1024 * 1024);
    service.login("manager").unwrap();
    service
        .upsert_category(CategoryInput {
            id: Some(4),
            name: LocaleMap::new("Chef's picks", "", ""),
        })
        .unwrap();
    service.logout().unwrap();

    let stored = stored_state(&service);
    assert_eq!(stored.categories[3].name.en, "Chef's picks");
    assert_eq!(stored.session, Session::Anonymous);
}

#[test]
fn quota_failure_keeps_in_memory_edit_and_reports_it() {
    let mut service = open_service(6 * 1024);
    service.login("manager").unwrap();
    let stored_before = stored_state(&service);

    let mut input = tea_form().parse().unwrap();
    input.image = Some(ImageBlob::encode("image/png", &vec![7u8; 16 * 1024]).unwrap());
    let err = service.upsert_item(input).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Persist(StoreError::QuotaExceeded { .. })
    ));

    // Memory has the edit; storage still has the previous snapshot.
    assert_eq!(service.state().items.len(), 4);
    assert!(service.state().items[3].image.is_some());
    assert_eq!(stored_state(&service), stored_before);

    // Dropping the image lets the next save go through.
    let tea_id = service.state().items[3].id;
    let mut retry = tea_form().parse().unwrap();
    retry.id = Some(tea_id);
    retry.status = ItemStatus::Unavailable;
    service.upsert_item(retry).unwrap();
    let stored = stored_state(&service);
    assert_eq!(stored.items.len(), 4);
    assert!(stored.items[3].image.is_none());
    assert_eq!(stored.items[3].status, ItemStatus::Unavailable);
}

#[test]
fn retry_save_flushes_pending_state() {
    let mut service = open_service(1024 * 1024);
    service.login("manager").unwrap();
    service.retry_save().unwrap();
    assert_eq!(stored_state(&service), *service.state());
}

#[test]
fn sqlite_backed_service_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.db");
    let options = StoreOptions::default();

    let created = {
        let backend = SqliteKvBackend::open(&path, options.quota_bytes).unwrap();
        let mut service = MenuService::open(RecordStore::new(backend, options.clone()));
        service.login("manager").unwrap();
        service.upsert_item(tea_form().parse().unwrap()).unwrap().id()
    };

    let backend = SqliteKvBackend::open(&path, options.quota_bytes).unwrap();
    let service = MenuService::open(RecordStore::new(backend, options));
    assert_eq!(service.load_origin(), LoadOrigin::Persisted);
    assert_eq!(service.session(), Session::Manager);
    assert!(service.state().items.iter().any(|item| item.id == created));
}

fn broken_legacy_snapshot() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "lang": "en",
        "categories": [{ "id": 1, "name": { "en": "Soups", "ar": "", "ku": "" } }],
        "items": [{
            "id": 2,
            "categoryId": "1",
            "price": "2500.5",
            "status": "available",
            "image": null,
            "name": { "en": "Lentil soup", "ar": "", "ku": "" },
            "desc": { "en": "", "ar": "", "ku": "" }
        }]
    }))
    .unwrap()
}

#[test]
fn recovered_snapshot_is_set_aside_before_first_write() {
    let broken = broken_legacy_snapshot();
    let mut backend = MemoryKvBackend::new(1024 * 1024);
    backend.set(DEFAULT_STORAGE_KEY, &broken).unwrap();

    let mut service = MenuService::open(RecordStore::new(backend, StoreOptions::default()));
    assert_eq!(service.load_origin(), LoadOrigin::Recovered);
    assert!(service.store().has_pending_malformed());

    service.login("manager").unwrap();

    let malformed_key = StoreOptions::default().malformed_key();
    let backend = service.store().backend();
    assert_eq!(backend.get(&malformed_key).unwrap(), Some(broken));
    assert!(!service.store().has_pending_malformed());
    assert_eq!(stored_state(&service), *service.state());
}

#[test]
fn failed_set_aside_leaves_broken_snapshot_in_place() {
    let broken = broken_legacy_snapshot();
    // Room for one copy of the broken blob, not two.
    let mut backend = MemoryKvBackend::new(broken.len() + broken.len() / 2);
    backend.set(DEFAULT_STORAGE_KEY, &broken).unwrap();

    let mut service = MenuService::open(RecordStore::new(backend, StoreOptions::default()));
    let err = service.switch_locale(Locale::Ar).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Persist(StoreError::QuotaExceeded { .. })
    ));
    assert_eq!(service.locale(), Locale::Ar);

    let backend = service.store().backend();
    assert_eq!(
        backend.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
        Some(&broken[..])
    );
    assert!(backend
        .get(&StoreOptions::default().malformed_key())
        .unwrap()
        .is_none());
    assert!(service.store().has_pending_malformed());
}
