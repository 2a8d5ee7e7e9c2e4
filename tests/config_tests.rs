mod common;

use commodity_ledger::config::{Config, ConfigManager};
use commodity_ledger::ledger::{Commodity, LedgerKind};

#[test]
fn defaults_match_display_conventions() {
    let manager = ConfigManager::with_base_dir(common::temp_home()).expect("config manager");
    let config = manager.load().expect("load defaults");
    assert_eq!(config.default_kind, LedgerKind::Meal);
    assert_eq!(config.precision_for(Commodity::MilkPowder), 3);
    assert_eq!(config.precision_for(Commodity::Sugar), 2);
    assert_eq!(
        config.resolve_data_dir(manager.base_dir()),
        manager.base_dir().join("months")
    );
}

#[test]
fn custom_data_dir_survives_save() {
    let home = common::temp_home();
    let manager = ConfigManager::with_base_dir(home.clone()).expect("config manager");
    let config = Config {
        data_dir: Some(home.join("elsewhere")),
        mass_precision: 2,
        ..Config::default()
    };
    manager.save(&config).expect("save config");

    let reloaded = ConfigManager::with_base_dir(home.clone())
        .expect("config manager")
        .load()
        .expect("reload");
    assert_eq!(reloaded.resolve_data_dir(&home), home.join("elsewhere"));
    assert_eq!(reloaded.precision_for(Commodity::Rice), 2);
}
