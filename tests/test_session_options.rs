//! Session options tests
//!
//! Tests the builder contract and the copy semantics of `SessionOptions`:
//! a copy reproduces every setting while keeping its own reconnect state.

use mqtt_session::config::ConnectorConfig;
use mqtt_session::reconnect::{ExponentialDelay, ReconnectionDecision};
use mqtt_session::security::{IdentityMaterial, TrustMaterial};
use mqtt_session::session::{Qos, SessionOptions, DEFAULT_PORT};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn full_options() -> SessionOptions {
    SessionOptions::builder("orders")
        .hostname("10.0.0.5")
        .port(8884)
        .server_name("broker.example.com")
        .client_id("orders-1")
        .auto_generated_client_id(false)
        .username("svc")
        .password("pw")
        .clean_session(false)
        .auto_keep_alive(false)
        .keep_alive(Duration::from_secs(20))
        .connect_timeout(Duration::from_secs(5))
        .max_inflight_queue(32)
        .max_message_size(65_536)
        .will_flag(true)
        .will_topic("orders/status")
        .will_message("gone")
        .will_qos(2)
        .will_retain(true)
        .ssl(true)
        .identity(Some(IdentityMaterial::Pem {
            cert_path: PathBuf::from("/certs/client.crt"),
            key_path: PathBuf::from("/certs/client.key"),
        }))
        .trust(Some(TrustMaterial::Pem {
            cert_path: PathBuf::from("/certs/ca.crt"),
        }))
        .max_reconnect_attempts(Some(7))
        .reconnect_delay(Box::new(
            ExponentialDelay::new(Duration::from_millis(50), Duration::from_secs(2), 3.0)
                .with_jitter(0.25)
                .with_seed(99),
        ))
        .unsubscribe_on_disconnect(true)
        .build()
        .unwrap()
}

#[test]
fn test_copy_reproduces_every_setting() {
    let original = full_options();
    let copy = original.clone();

    assert_eq!(copy.channel(), original.channel());
    assert_eq!(copy.hostname(), original.hostname());
    assert_eq!(copy.port(), original.port());
    assert_eq!(copy.server_name(), original.server_name());
    assert_eq!(copy.tls_server_name(), "broker.example.com");
    assert_eq!(copy.client_id(), original.client_id());
    assert_eq!(
        copy.auto_generated_client_id(),
        original.auto_generated_client_id()
    );
    assert_eq!(copy.username(), original.username());
    assert_eq!(copy.password(), original.password());
    assert_eq!(copy.clean_session(), original.clean_session());
    assert_eq!(copy.auto_keep_alive(), original.auto_keep_alive());
    assert_eq!(copy.keep_alive(), original.keep_alive());
    assert_eq!(copy.connect_timeout(), original.connect_timeout());
    assert_eq!(copy.max_inflight_queue(), original.max_inflight_queue());
    assert_eq!(copy.max_message_size(), original.max_message_size());
    assert_eq!(copy.will(), original.will());
    assert_eq!(copy.will().qos, Qos::ExactlyOnce);
    assert_eq!(copy.ssl(), original.ssl());
    assert_eq!(copy.trust_all(), original.trust_all());
    assert_eq!(
        copy.max_reconnect_attempts(),
        original.max_reconnect_attempts()
    );
    assert_eq!(
        copy.unsubscribe_on_disconnect(),
        original.unsubscribe_on_disconnect()
    );
    assert_eq!(copy.summary(), original.summary());
    assert_eq!(
        format!("{:?}", copy.reconnect_delay()),
        format!("{:?}", original.reconnect_delay())
    );

    assert!(Arc::ptr_eq(
        copy.identity().unwrap(),
        original.identity().unwrap()
    ));
    assert!(Arc::ptr_eq(copy.trust().unwrap(), original.trust().unwrap()));
}

#[test]
fn test_copy_has_independent_reconnect_state() {
    let mut original = full_options();
    let first = original.next_reconnect(false);
    original.next_reconnect(false);

    let mut copy = original.clone();
    assert_eq!(copy.reconnect_attempt(), 0);

    // The copy replays from its first attempt with the same seeded jitter
    assert_eq!(copy.next_reconnect(false), first);
    assert_eq!(original.reconnect_attempt(), 2);
    assert_eq!(copy.reconnect_attempt(), 1);
}

#[test]
fn test_copy_of_config_built_options() {
    let config = ConnectorConfig::from_toml_str(
        r#"
[channels.telemetry]
host = "broker.local"
reconnect_attempts = 2
reconnect_interval_seconds = 3
"#,
    )
    .unwrap();

    let template = SessionOptions::from_config(config.channel("telemetry").unwrap()).unwrap();
    let mut session = template.clone();

    assert_eq!(
        session.next_reconnect(false),
        ReconnectionDecision::Proceed {
            attempt: 1,
            delay: Duration::from_secs(3)
        }
    );
    assert_eq!(template.reconnect_attempt(), 0);
}

#[test]
fn test_defaults() {
    let options = SessionOptions::builder("plain").build().unwrap();

    assert_eq!(options.hostname(), "localhost");
    assert_eq!(options.port(), DEFAULT_PORT);
    assert_eq!(options.server_name(), None);
    assert!(!options.unsubscribe_on_disconnect());
    assert!(options.auto_generated_client_id());
    assert!(!options.ssl());
    assert!(!options.will().flag);
}

#[test]
fn test_build_rejects_out_of_range_values() {
    let error = SessionOptions::builder("c").port(0).build().unwrap_err();
    assert_eq!(error.attribute(), "port");

    let error = SessionOptions::builder("c").port(65_536).build().unwrap_err();
    assert_eq!(error.attribute(), "port");

    let error = SessionOptions::builder("c").will_qos(3).build().unwrap_err();
    assert_eq!(error.attribute(), "will_qos");
}
