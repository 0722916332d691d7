#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use storefront_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
metrics:
  path: "/metrics"
  infometric: "typo_info" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config_uses_defaults() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.app.version, "1.0.0");
    assert_eq!(cfg.metrics.path, "/metrics");
    assert_eq!(cfg.metrics.info_metric, "microservice_app_info");
}

#[test]
fn unsupported_version_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn invalid_values_rejected() {
    let cases = [
        "version: 1\nserver: { listen: \"not-an-addr\" }\n",
        "version: 1\napp: { version: \"\" }\n",
        "version: 1\nmetrics: { path: \"metrics\" }\n",
        "version: 1\nmetrics: { path: \"/healthz\" }\n",
        "version: 1\nmetrics: { path: \"/*\" }\n",
        "version: 1\nmetrics: { path: \"/x/:y\" }\n",
        "version: 1\nmetrics: { info_metric: \"app-info\" }\n",
    ];
    for case in cases {
        let err = config::load_from_str(case).expect_err(case);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "{case}");
    }
}

#[test]
fn repository_config_file_loads() {
    let cfg = config::load_from_file("../../storefront.yaml").expect("must load");
    assert_eq!(cfg.app.name, "microservice");
    assert!(cfg.server.listen_addr().is_ok());
}
