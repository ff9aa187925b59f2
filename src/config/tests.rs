use super::*;

fn raw_with_admin() -> RawSettings {
    let mut raw = RawSettings::default();
    raw.admin.email = Some("admin@example.com".to_string());
    raw.admin.access_token = Some("s3cret".to_string());
    raw
}

fn invalid_key(result: Result<Settings, LoadError>) -> &'static str {
    match result {
        Err(LoadError::Invalid { key, .. }) => key,
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("settings unexpectedly valid"),
    }
}

#[test]
fn defaults_apply_when_only_admin_is_set() {
    let settings = Settings::from_raw(raw_with_admin()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(settings.database.url.is_none());
    assert_eq!(settings.session.cookie_name, DEFAULT_SESSION_COOKIE);
    assert_eq!(settings.session.ttl.get(), DEFAULT_SESSION_TTL_SECS);
    assert!(!settings.session.secure_cookie);
    assert_eq!(settings.admin.credentials.email(), "admin@example.com");
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = raw_with_admin();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        database: DatabaseOverride {
            database_url: Some("postgres://example".to_string()),
        },
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://example")
    );
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = raw_with_admin();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn missing_admin_email_fails_fast() {
    let mut raw = raw_with_admin();
    raw.admin.email = Some("   ".to_string());
    assert_eq!(invalid_key(Settings::from_raw(raw)), "admin.email");
}

#[test]
fn missing_access_token_fails_fast() {
    let mut raw = raw_with_admin();
    raw.admin.access_token = None;
    assert_eq!(invalid_key(Settings::from_raw(raw)), "admin.access_token");
}

#[test]
fn access_token_digest_must_be_sha256_hex() {
    let mut raw = raw_with_admin();
    raw.admin.access_token = None;
    raw.admin.access_token_sha256 = Some("abcd".to_string());
    assert_eq!(
        invalid_key(Settings::from_raw(raw)),
        "admin.access_token_sha256"
    );

    let mut raw = raw_with_admin();
    raw.admin.access_token = None;
    raw.admin.access_token_sha256 = Some(hex::encode(hash_token("s3cret")));
    assert!(Settings::from_raw(raw).is_ok());
}

#[test]
fn zero_values_are_rejected() {
    let mut raw = raw_with_admin();
    raw.server.port = Some(0);
    assert_eq!(invalid_key(Settings::from_raw(raw)), "server.port");

    let mut raw = raw_with_admin();
    raw.session.ttl_seconds = Some(0);
    assert_eq!(invalid_key(Settings::from_raw(raw)), "session.ttl_seconds");

    let mut raw = raw_with_admin();
    raw.database.max_connections = Some(0);
    assert_eq!(
        invalid_key(Settings::from_raw(raw)),
        "database.max_connections"
    );
}

#[test]
fn session_ttl_has_an_upper_bound() {
    let mut raw = raw_with_admin();
    raw.session.ttl_seconds = Some(u64::MAX);
    assert_eq!(invalid_key(Settings::from_raw(raw)), "session.ttl_seconds");

    let mut raw = raw_with_admin();
    raw.session.ttl_seconds = Some(MAX_SESSION_TTL_SECS);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.session.ttl.get(), MAX_SESSION_TTL_SECS);
}

#[test]
fn unparseable_log_level_is_rejected() {
    let mut raw = raw_with_admin();
    raw.logging.level = Some("loud".to_string());
    assert_eq!(invalid_key(Settings::from_raw(raw)), "logging.level");
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["quill"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from(["quill", "migrate", "--database-url", "postgres://example"]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(
                migrate.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}
