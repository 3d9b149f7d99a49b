//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `menuboard_core` linkage with a deterministic ping/version probe.
//! - Optionally print the public menu stored in a snapshot database.
//!
//! Usage: `menuboard_cli [DB_PATH] [en|ar|ku]`

use menuboard_core::{
    category_tabs, menu_cards, Locale, MenuFilter, RecordStore, SqliteKvBackend, StoreOptions,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("menuboard_core ping={}", menuboard_core::ping());
    println!("menuboard_core version={}", menuboard_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };

    match print_menu(&db_path, args.next().as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn print_menu(db_path: &str, locale: Option<&str>) -> Result<(), String> {
    let options = StoreOptions::default();
    let backend =
        SqliteKvBackend::open(db_path, options.quota_bytes).map_err(|err| err.to_string())?;
    let mut store = RecordStore::new(backend, options);
    let (state, origin) = store.load_with_origin();
    let locale = match locale {
        Some(code) => code.parse::<Locale>().map_err(|err| err.to_string())?,
        None => state.locale,
    };

    println!("snapshot origin={origin:?} locale={locale}");
    for tab in category_tabs(&state, locale) {
        println!("[{}] {}", tab.id, tab.label);
        for card in menu_cards(&state, locale, MenuFilter::Category(tab.id)) {
            let badge = if card.available { "" } else { " (unavailable)" };
            println!("  #{} {} - {}{}", card.id, card.name, card.price, badge);
        }
    }

    let orphans = menuboard_core::service::catalog::orphaned_items(&state);
    if !orphans.is_empty() {
        println!("[uncategorized]");
        for item in orphans {
            println!("  #{} {}", item.id, menuboard_core::resolve_text(&item.name, locale));
        }
    }
    Ok(())
}
