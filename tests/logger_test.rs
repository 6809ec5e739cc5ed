use rawg_client::utils::logger;

// A process has one global subscriber, so both initialisers share this test.
#[test]
fn test_logger_installs_once() {
    assert!(logger::init_json_logger(true).is_ok());
    tracing::info!(component = "logger_test", "JSON logger installed");

    assert!(logger::init_cli_logger(false).is_err());
}
