#![allow(clippy::unwrap_used)]
// End-to-end scrapes: wiremock controller -> LegacyClient -> AlarmCollector
// -> Registry -> text exposition.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unifi_exporter_api::{ControllerPlatform, LegacyClient};
use unifi_exporter_core::{AlarmCollector, CollectError, DEFAULT_NAMESPACE, Registry, Site};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<LegacyClient>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = LegacyClient::with_client(
        reqwest::Client::new(),
        base_url,
        ControllerPlatform::ClassicController,
    );
    (server, Arc::new(client))
}

async fn mount_alarms(server: &MockServer, site: &str, data: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/s/{site}/stat/alarm")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": data })),
        )
        .mount(server)
        .await;
}

fn registry_for(client: Arc<LegacyClient>, sites: Vec<Site>) -> Registry {
    let mut registry = Registry::new();
    registry
        .register(Arc::new(AlarmCollector::new(DEFAULT_NAMESPACE, client, sites)))
        .unwrap();
    registry
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn one_alarm_one_site() {
    let (server, client) = setup().await;

    mount_alarms(
        &server,
        "default",
        json!([{
            "_id": "abcdef",
            "ap": "de:ad:be:ef:de:ad",
            "ap_name": "foo",
            "archived": false,
            "datetime": "2018-09-08T18:56:12Z",
            "key": "EVT_AP_Lost_Contact",
            "msg": "AP[de:ad:be:ef:de:ad] was disconnected",
            "subsystem": "wlan",
            "time": 1_536_432_972_388_u64
        }]),
    )
    .await;

    let registry = registry_for(client, vec![Site::new("default", "Default")]);
    let gathered = registry.gather().await;
    let text = gathered.encode_text().unwrap();

    assert!(gathered.errors.is_empty());
    assert!(
        text.contains(r#"unifi_alarms_total{site="Default"} 1"#),
        "missing aggregate:\n{text}"
    );
    assert!(
        text.contains(
            r#"unifi_alarms{id="abcdef",key="EVT_AP_Lost_Contact",mac="de:ad:be:ef:de:ad",message="AP[de:ad:be:ef:de:ad] was disconnected",name="foo",site="Default",subsystem="wlan"} 1"#
        ),
        "missing alarm row:\n{text}"
    );
    assert!(text.contains("# HELP unifi_alarms Number of active alarms"));
    assert!(text.contains("# HELP unifi_alarms_total Total number of active alarms"));
    assert!(text.contains("# TYPE unifi_alarms_total gauge"));
}

#[tokio::test]
async fn site_without_alarms_renders_zero_and_no_rows() {
    let (server, client) = setup().await;
    mount_alarms(&server, "default", json!([])).await;

    let registry = registry_for(client, vec![Site::new("default", "Default")]);
    let text = registry.gather().await.encode_text().unwrap();

    assert!(text.contains(r#"unifi_alarms_total{site="Default"} 0"#));
    assert!(!text.contains("unifi_alarms{"));
}

#[tokio::test]
async fn failing_site_aborts_remaining_sites() {
    let (server, client) = setup().await;

    mount_alarms(
        &server,
        "a",
        json!([{ "_id": "a1", "ap_name": "ap-a", "key": "EVT_AP_Lost_Contact" }]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/api/s/b/stat/alarm"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/s/c/stat/alarm"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .expect(0)
        .mount(&server)
        .await;

    let registry = registry_for(
        client,
        vec![
            Site::new("a", "Site A"),
            Site::new("b", "Site B"),
            Site::new("c", "Site C"),
        ],
    );
    let gathered = registry.gather().await;
    let text = gathered.encode_text().unwrap();

    assert!(text.contains(r#"unifi_alarms_total{site="Site A"} 1"#));
    assert!(!text.contains("Site B"));
    assert!(!text.contains("Site C"));

    assert_eq!(gathered.errors.len(), 1);
    assert!(matches!(
        &gathered.errors[0],
        CollectError::Fetch { site, .. } if site == "b"
    ));
}

#[tokio::test]
async fn message_quotes_and_backslashes_are_escaped() {
    let (server, client) = setup().await;

    mount_alarms(
        &server,
        "default",
        json!([{
            "_id": "x1",
            "ap": "DEADBEEFDEAD",
            "ap_name": "lobby",
            "key": "EVT_AP_Lost_Contact",
            "msg": "AP \"lobby\" lost C:\\uplink",
            "subsystem": "wlan"
        }]),
    )
    .await;

    let registry = registry_for(client, vec![Site::new("default", "Default")]);
    let text = registry.gather().await.encode_text().unwrap();

    assert!(
        text.contains(r#"mac="de:ad:be:ef:de:ad",message="AP \"lobby\" lost C:\\uplink""#),
        "unexpected rendering:\n{text}"
    );
}

#[tokio::test]
async fn sites_sharing_a_label_render_one_series() {
    let (server, client) = setup().await;

    mount_alarms(&server, "a", json!([])).await;
    mount_alarms(&server, "b", json!([])).await;

    let registry = registry_for(
        client,
        vec![Site::new("a", "Same"), Site::new("b", "Same")],
    );
    let gathered = registry.gather().await;
    let text = gathered.encode_text().unwrap();

    assert_eq!(
        text.matches(r#"unifi_alarms_total{site="Same"} 0"#).count(),
        1,
        "repeated series rendered:\n{text}"
    );
    assert_eq!(gathered.errors.len(), 1);
    assert!(matches!(
        &gathered.errors[0],
        CollectError::DuplicateSeries { fq_name, .. } if fq_name == "unifi_alarms_total"
    ));
}
