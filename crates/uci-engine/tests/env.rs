use uci_engine::EngineConfig;
use uci_engine::config::{CONFIG_ENV, save_config};
use uci_engine::telemetry::{LogFormat, init_tracing};

// Mutates process environment; kept as the only test in this binary.
#[test]
fn config_and_logging_come_from_the_environment() {
    unsafe { std::env::remove_var(CONFIG_ENV) };
    assert_eq!(EngineConfig::from_env().unwrap(), EngineConfig::default());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = EngineConfig::default();
    config.assessment_grace.days = 2;
    save_config(&path, &config).unwrap();

    unsafe { std::env::set_var(CONFIG_ENV, &path) };
    assert_eq!(EngineConfig::from_env().unwrap(), config);

    assert!(init_tracing(LogFormat::Json));
    assert!(!init_tracing(LogFormat::Plain));
}
