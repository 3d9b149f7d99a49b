use menuboard_core::service::catalog::{
    delete_category, delete_item, find_category, find_item, items_in, orphaned_items,
    upsert_category, upsert_item,
};
use menuboard_core::{
    AppState, CatalogError, CategoryInput, ImageBlob, ItemInput, ItemStatus, LocaleMap,
    MenuFilter, Price, Upserted,
};

fn item_input(id: Option<i64>, category_id: i64, name: &str, price: u64) -> ItemInput {
    ItemInput {
        id,
        category_id,
        price: Price::new(price),
        status: ItemStatus::Available,
        image: None,
        name: LocaleMap::english(name),
        desc: LocaleMap::default(),
    }
}

fn item_ids(state: &AppState) -> Vec<i64> {
    state.items.iter().map(|item| item.id).collect()
}

#[test]
fn new_item_gets_fresh_id_and_is_appended_last() {
    let mut state = AppState::seeded();
    let before = item_ids(&state);

    let outcome = upsert_item(&mut state, item_input(None, 2, "Ayran", 750)).unwrap();
    assert!(outcome.is_created());

    let after = item_ids(&state);
    assert_eq!(&after[..before.len()], &before[..]);
    assert_eq!(*after.last().unwrap(), outcome.id());
    assert!(!before.contains(&outcome.id()));
}

#[test]
fn repeated_creates_never_collide() {
    let mut state = AppState::seeded();
    let first = upsert_item(&mut state, item_input(None, 1, "A", 1)).unwrap().id();
    let second = upsert_item(&mut state, item_input(None, 1, "B", 1)).unwrap().id();
    let category = upsert_category(
        &mut state,
        CategoryInput {
            id: None,
            name: LocaleMap::english("Breakfast"),
        },
    )
    .unwrap()
    .id();

    assert_ne!(first, second);
    assert!(second > first);
    assert!(category > second);
}

#[test]
fn deleted_ids_are_not_reused() {
    let mut state = AppState::seeded();
    let created = upsert_item(&mut state, item_input(None, 1, "Temp", 1)).unwrap().id();
    assert!(delete_item(&mut state, created));

    let next = upsert_item(&mut state, item_input(None, 1, "Next", 1)).unwrap().id();
    assert_ne!(next, created);
}

#[test]
fn update_replaces_in_place_and_keeps_length() {
    let mut state = AppState::seeded();
    let target = state.items[1].id;
    let len = state.items.len();

    let mut input = item_input(Some(target), 2, "Beef Kebab XL", 12_000);
    input.status = ItemStatus::Unavailable;
    input.image = Some(ImageBlob::from_data_url("data:image/webp;base64,UklGRg==").unwrap());
    let outcome = upsert_item(&mut state, input).unwrap();

    assert_eq!(outcome, Upserted::Updated(target));
    assert_eq!(state.items.len(), len);
    assert_eq!(state.items[1].id, target);
    assert_eq!(state.items[1].name.en, "Beef Kebab XL");
    assert_eq!(state.items[1].price, Price::new(12_000));
    assert_eq!(state.items[1].category_id, 2);
    assert_eq!(state.items[1].status, ItemStatus::Unavailable);
}

#[test]
fn stale_id_creates_instead_of_failing() {
    let mut state = AppState::seeded();
    let outcome = upsert_item(&mut state, item_input(Some(999), 1, "Ghost", 5)).unwrap();
    assert!(outcome.is_created());
    assert_ne!(outcome.id(), 999);
    assert_eq!(state.items.len(), 4);
}

#[test]
fn category_upsert_follows_same_identity_rule() {
    let mut state = AppState::seeded();
    let outcome = upsert_category(
        &mut state,
        CategoryInput {
            id: Some(2),
            name: LocaleMap::new("Beverages", "مشروبات", ""),
        },
    )
    .unwrap();
    assert_eq!(outcome, Upserted::Updated(2));
    assert_eq!(state.categories[1].name.en, "Beverages");
    assert_eq!(state.categories.len(), 4);

    let created = upsert_category(
        &mut state,
        CategoryInput {
            id: None,
            name: LocaleMap::english("Salads"),
        },
    )
    .unwrap();
    assert_eq!(state.categories.last().unwrap().id, created.id());
}

#[test]
fn blank_english_names_are_rejected() {
    let mut state = AppState::seeded();
    let before = state.clone();

    let err = upsert_category(
        &mut state,
        CategoryInput {
            id: None,
            name: LocaleMap::new("  ", "سلطات", ""),
        },
    )
    .unwrap_err();
    assert_eq!(err, CatalogError::EmptyName { record: "category" });

    let err = upsert_item(&mut state, item_input(Some(1), 1, "", 10)).unwrap_err();
    assert_eq!(err, CatalogError::EmptyName { record: "item" });
    assert_eq!(state, before);
}

#[test]
fn delete_category_leaves_items_orphaned_but_retrievable() {
    let mut state = AppState::seeded();
    let items_before = state.items.clone();

    assert!(delete_category(&mut state, 1));
    assert!(find_category(&state, 1).is_none());
    assert_eq!(state.items, items_before);

    let orphan = find_item(&state, 1).expect("item survives category delete");
    assert_eq!(orphan.category_id, 1);
    let orphan_ids: Vec<i64> = orphaned_items(&state).iter().map(|item| item.id).collect();
    assert_eq!(orphan_ids, vec![1, 2]);
}

#[test]
fn deleting_missing_records_is_a_no_op() {
    let mut state = AppState::seeded();
    let before = state.clone();
    assert!(!delete_category(&mut state, 42));
    assert!(!delete_item(&mut state, 42));
    assert_eq!(state, before);
}

#[test]
fn category_filter_preserves_insertion_order() {
    let mut state = AppState::seeded();
    let added = upsert_item(&mut state, item_input(None, 1, "Falafel", 2000)).unwrap().id();
    upsert_item(&mut state, item_input(None, 2, "Tea", 500)).unwrap();
    // Editing the first food item must not move it.
    upsert_item(&mut state, item_input(Some(1), 1, "Chicken Shawarma", 6500)).unwrap();

    let food: Vec<i64> = items_in(&state, MenuFilter::Category(1))
        .iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(food, vec![1, 2, added]);
    assert_eq!(items_in(&state, MenuFilter::All).len(), 5);
}

#[test]
fn item_may_reference_missing_category() {
    let mut state = AppState::seeded();
    let id = upsert_item(&mut state, item_input(None, 77, "Mystery", 1)).unwrap().id();
    assert_eq!(find_item(&state, id).unwrap().category_id, 77);
    assert_eq!(items_in(&state, MenuFilter::Category(77)).len(), 1);
}

#[test]
fn create_fails_cleanly_when_no_id_is_left() {
    let mut state = AppState::seeded();
    state.categories[0].id = i64::MAX;
    let before = state.clone();

    let err = upsert_category(
        &mut state,
        CategoryInput {
            id: None,
            name: LocaleMap::english("Overflow"),
        },
    )
    .unwrap_err();
    assert_eq!(err, CatalogError::IdsExhausted);
    assert_eq!(
        upsert_item(&mut state, item_input(None, 1, "Overflow", 1)).unwrap_err(),
        CatalogError::IdsExhausted
    );
    assert_eq!(state, before);

    // Updates do not need a fresh id.
    let outcome = upsert_item(&mut state, item_input(Some(1), 1, "Still editable", 1)).unwrap();
    assert_eq!(outcome, Upserted::Updated(1));
}
