use ferrous_route_domain::{
    Config, ConfigError, FieldEntry, FieldValue, Pattern, PatternConfig, RouteAction,
    UpstreamTopology,
};

const SAMPLE: &str = r#"
fallback = "refuse"

[server]
bind_address = "127.0.0.1"
dns_port = 5353

[upstream]
servers = ["8.8.8.8", ["1.1.1.1", "9.9.9.9"]]
timeout = 1500

[logging]
level = "debug"

[[alias]]
fake = "local.example"
real = "example.com"

[[route]]
pattern = "printer.lan"
action = "nxdomain"

[[route]]
pattern = { regex = "\\.corp$" }

[[route]]
pattern = ["a.lan", { regex = "^b\\." }]
action = "refuse"

[[route]]
pattern = { name = { regex = "\\.lan$" }, type = ["A", "AAAA"] }
"#;

#[test]
fn test_parse_full_config() {
    let config = Config::from_toml_str(SAMPLE).unwrap();

    assert_eq!(config.server.dns_port, 5353);
    assert_eq!(config.server.listen_address(), "127.0.0.1:5353");
    assert_eq!(config.upstream.timeout, 1500);
    assert_eq!(config.upstream.servers.server_count(), 3);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.fallback, RouteAction::Refuse);
    assert_eq!(config.aliases.len(), 1);
    assert_eq!(config.aliases[0].fake, "local.example");
    assert_eq!(config.routes.len(), 4);
    assert_eq!(config.routes[0].action, RouteAction::NxDomain);
    assert_eq!(config.routes[1].action, RouteAction::Proxy);
    assert!(config.validate().is_ok());
}

#[test]
fn test_route_patterns_convert() {
    let config = Config::from_toml_str(SAMPLE).unwrap();
    let patterns: Vec<Pattern> = config
        .routes
        .into_iter()
        .map(|r| Pattern::try_from(r.pattern).unwrap())
        .collect();

    assert!(matches!(&patterns[0], Pattern::Name(n) if n == "printer.lan"));
    assert!(matches!(&patterns[1], Pattern::Regex(r) if r.as_str() == "\\.corp$"));
    assert!(matches!(&patterns[2], Pattern::AnyOf(list) if list.len() == 2));
    match &patterns[3] {
        Pattern::Fields(fields) => {
            assert!(matches!(fields.get("name"), Some(FieldEntry::One(FieldValue::Regex(_)))));
            assert_eq!(
                fields.get("type"),
                Some(&FieldEntry::Many(vec![
                    FieldValue::text("A"),
                    FieldValue::text("AAAA")
                ]))
            );
        }
        other => panic!("expected field pattern, got {:?}", other),
    }
}

#[test]
fn test_invalid_regex_in_pattern_is_rejected() {
    let config = Config::from_toml_str(
        r#"
[[route]]
pattern = { regex = "(" }
"#,
    )
    .unwrap();
    let pattern: PatternConfig = config.routes[0].pattern.clone();
    assert!(Pattern::try_from(pattern).is_err());
}

#[test]
fn test_defaults() {
    let config = Config::from_toml_str("").unwrap();

    assert_eq!(config.server.dns_port, 53);
    assert!(config.server.tcp_enabled);
    assert_eq!(config.upstream.timeout, 5000);
    assert_eq!(config.upstream.servers, UpstreamTopology::empty());
    assert_eq!(config.fallback, RouteAction::Proxy);
    assert!(config.aliases.is_empty());
}

#[test]
fn test_validate_rejects_zero_port() {
    let config = Config::from_toml_str("[server]\ndns_port = 0\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_validate_rejects_empty_alias() {
    let config = Config::from_toml_str("[[alias]]\nfake = \"\"\nreal = \"example.com\"\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_upstream_is_a_parse_error() {
    let result = Config::from_toml_str("[upstream]\nservers = [\"not-an-ip\"]\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_ipv6_listen_address() {
    let config = Config::from_toml_str("[server]\nbind_address = \"::\"\ndns_port = 53\n").unwrap();
    assert_eq!(config.server.listen_address(), "[::]:53");
}
