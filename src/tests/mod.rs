use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::dom::NodeId;
use crate::interact::{Attach, Controllers, ScrollBehavior, ScrollBlock};
use crate::loader::{self, DatasetState, LoadError, Loader};
use crate::model::{Dataset, InsuranceOffer, LeasingOffer, OfferKind, SchemaVersion};
use crate::output::{self, OutputFormat};
use crate::page::{Page, FAQ_ENTRIES};
use crate::render::{self, CARDS_CONTAINER, MOBILE_CARDS};
use crate::runner::{FailurePolicy, Options, Runner};
use crate::view::{OfferView, SectionView};

fn tryg() -> InsuranceOffer {
    serde_json::from_value(json!({
        "udbyder": "Tryg",
        "produkt": "Basis",
        "pris_mdr": "399 kr",
        "dækning": "Ansvar",
        "tilvalg": ["Vejhjælp"],
        "kampagne": "",
        "link": "https://x"
    }))
    .unwrap()
}

fn insurance_records(n: usize) -> Vec<InsuranceOffer> {
    (0..n)
        .map(|i| InsuranceOffer {
            provider: format!("Selskab {i}"),
            product: format!("Produkt {i}"),
            monthly_price: format!("{} kr", 300 + i),
            coverage: "Kasko".to_string(),
            link: format!("https://example.dk/{i}"),
            ..Default::default()
        })
        .collect()
}

fn leasing_json() -> serde_json::Value {
    json!([
        {"mærke": "Tesla", "model": "Model 3", "pris_mdr": "4.295 kr", "udbetaling": "0 kr",
         "løbetid": "36 mdr", "kampagne": "Gratis ladeboks", "link": "https://tesla.example"},
        {"mærke": "Kia", "model": "EV6", "pris_mdr": "3.999 kr", "udbetaling": "19.995 kr",
         "løbetid": "36 mdr", "kampagne": "", "link": "https://kia.example"}
    ])
}

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) {
    std::fs::write(dir.join(name), serde_json::to_vec(value).unwrap()).unwrap();
}

fn loader_for(base: Option<String>) -> Loader {
    let client = loader::build_client(Duration::from_secs(5)).unwrap();
    Loader::new(client, base, true)
}

/// Serves the scripted responses in order, one per connection, and counts
/// requests. The last response repeats once the script is exhausted.
async fn http_fixture(responses: Vec<(u16, String)>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let (status, body) = responses[n.min(responses.len() - 1)].clone();
            let mut buf = vec![0u8; 4096];
            let mut read = Vec::new();
            while !read.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(len) => read.extend_from_slice(&buf[..len]),
                }
            }
            let reply = format!(
                "HTTP/1.1 {status} Fixture\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    (format!("http://{addr}/"), hits)
}

#[test]
fn tryg_card_scenario() {
    let card = tryg().card();
    assert_eq!(card.title, "Tryg");
    assert_eq!(card.subtitle, "Basis");
    assert!(card.campaign.is_none());

    let mut page = Page::default();
    let root = page.dom().root();
    let id = page.dom_mut().append(root, render::card(&card));
    let html = page.dom().outer_html(id);
    assert!(!html.contains("card-banner"));
    assert_eq!(html.matches("399 kr").count(), 2);
    assert_eq!(html.matches("Vejhjælp").count(), 1);
    assert!(html.contains(r#"<i class="fas fa-tools"></i> Vejhjælp"#));
}

#[test]
fn n_records_give_n_cards_mobile_cards_and_rows_in_order() {
    let records = insurance_records(4);
    let mut page = Page::default();
    page.apply_section(&SectionView::from_dataset(&Dataset::new(records.clone())));
    let dom = page.dom();
    let root = dom.root();

    let cards = dom.all_by_class(root, "comparison-card");
    let mobile = dom.all_by_class(root, "mobile-card");
    let tbody = dom.element_by_id("bilforsikring-table").unwrap();
    let rows = dom.element_children(tbody);
    assert_eq!((cards.len(), mobile.len(), rows.len()), (4, 4, 4));

    for (i, record) in records.iter().enumerate() {
        assert!(dom.text_content(cards[i]).contains(&record.product));
        assert!(dom.text_content(mobile[i]).contains(&record.provider));
        assert!(dom.text_content(rows[i]).contains(&record.provider));
    }
}

#[test]
fn reapplying_new_data_replaces_containers() {
    let mut page = Page::default();
    page.apply_section(&SectionView::from_dataset(&Dataset::new(insurance_records(3))));
    page.apply_section(&SectionView::from_dataset(&Dataset::new(insurance_records(1))));
    let dom = page.dom();
    let root = dom.root();
    assert_eq!(dom.all_by_class(root, CARDS_CONTAINER).len(), 1);
    assert_eq!(dom.all_by_class(root, MOBILE_CARDS).len(), 1);
    assert_eq!(dom.all_by_class(root, "comparison-card").len(), 1);
    assert_eq!(dom.all_by_class(root, "mobile-card").len(), 1);
}

#[test]
fn datasets_land_in_their_own_sections() {
    let mut page = Page::default();
    let leasing: Vec<LeasingOffer> = serde_json::from_value(leasing_json()).unwrap();
    page.apply_section(&SectionView::from_dataset(&Dataset::new(insurance_records(2))));
    page.apply_section(&SectionView::from_dataset(&Dataset::new(leasing)));
    let dom = page.dom();
    let insurance = dom.element_by_id("bilforsikring").unwrap();
    let leasing = dom.element_by_id("leasing").unwrap();
    assert_eq!(dom.all_by_class(insurance, "mobile-card").len(), 2);
    assert_eq!(dom.all_by_class(leasing, "mobile-card").len(), 2);
    let tesla = dom.first_by_class(leasing, "comparison-card").unwrap();
    assert!(dom.outer_html(tesla).contains("fa-bolt"));
    assert!(dom.outer_html(tesla).contains(r#"card-banner positive"#));
}

#[test]
fn empty_campaign_renders_nowhere() {
    let mut page = Page::default();
    let mut offer = tryg();
    offer.campaign = "   ".to_string();
    page.apply_section(&SectionView::from_dataset(&Dataset::new(vec![offer])));
    let html = page.to_html();
    assert!(!html.contains("card-banner"));
    assert!(!html.contains(r#"class="kampagne"#));
    let dom = page.dom();
    let mobile = dom.first_by_class(dom.root(), MOBILE_CARDS).unwrap();
    assert!(!dom.text_content(mobile).contains("Kampagne"));
    let tbody = dom.element_by_id("bilforsikring-table").unwrap();
    let row = dom.element_children(tbody)[0];
    let cells = dom.element_children(row);
    assert!(dom.children(cells[5]).is_empty());
}

#[test]
fn accordion_keeps_one_item_open() {
    let mut page = Page::default();
    let mut controllers = Controllers::new();
    let mounted = page.mount_faq(&FAQ_ENTRIES).unwrap();
    assert_eq!(controllers.attach_accordion(&mut page, &mounted), Attach::Registered);

    let items: Vec<NodeId> = mounted.items().to_vec();
    let header = |page: &Page, i: usize| page.dom().first_by_class(items[i], "faq-header").unwrap();
    let open = |page: &Page| -> Vec<bool> {
        items.iter().map(|i| page.dom().has_class(*i, "active")).collect()
    };
    assert_eq!(open(&page), vec![false, false, false]);

    let h0 = header(&page, 0);
    let outcome = controllers.click(&mut page, h0);
    assert!(outcome.default_prevented && outcome.propagation_stopped);
    assert_eq!(open(&page), vec![true, false, false]);

    let h1 = header(&page, 1);
    controllers.click(&mut page, h1);
    assert_eq!(open(&page), vec![false, true, false]);

    controllers.click(&mut page, h1);
    assert_eq!(open(&page), vec![false, false, false]);
}

#[test]
fn accordion_click_does_not_close_open_menu() {
    let mut page = Page::default();
    let mut controllers = Controllers::new();
    controllers.attach_menu(&mut page);
    let mounted = page.mount_faq(&FAQ_ENTRIES).unwrap();
    controllers.attach_accordion(&mut page, &mounted);

    let hamburger = page.dom().element_by_id("nav-hamburger").unwrap();
    controllers.click(&mut page, hamburger);
    assert!(controllers.menu().unwrap().is_open(page.dom()));

    let header = page.dom().first_by_class(mounted.items()[0], "faq-header").unwrap();
    controllers.click(&mut page, header);
    assert!(controllers.menu().unwrap().is_open(page.dom()));
}

#[test]
fn menu_toggles_and_closes_on_link_or_outside_click() {
    let mut page = Page::default();
    let mut controllers = Controllers::new();
    controllers.attach_menu(&mut page);
    let dom = page.dom();
    let hamburger = dom.element_by_id("nav-hamburger").unwrap();
    let menu = dom.element_by_id("nav-menu").unwrap();
    let link = dom.all_by_tag(menu, "a")[1];
    let outside = dom.element_by_id("leasing").unwrap();

    controllers.click(&mut page, hamburger);
    assert!(page.dom().has_class(menu, "active"));
    controllers.click(&mut page, hamburger);
    assert!(!page.dom().has_class(menu, "active"));

    controllers.click(&mut page, hamburger);
    controllers.click(&mut page, link);
    assert!(!page.dom().has_class(menu, "active"));
    assert!(!page.dom().has_class(hamburger, "active"));

    controllers.click(&mut page, hamburger);
    controllers.click(&mut page, menu);
    assert!(page.dom().has_class(menu, "active"));
    controllers.click(&mut page, outside);
    assert!(!page.dom().has_class(menu, "active"));
}

#[test]
fn fragment_links_request_smooth_scroll() {
    let mut page = Page::default();
    let mut controllers = Controllers::new();
    controllers.attach_smooth_scroll(&mut page);
    let dom = page.dom();
    let menu = dom.element_by_id("nav-menu").unwrap();
    let faq_link = dom
        .all_by_tag(menu, "a")
        .into_iter()
        .find(|a| dom.attr(*a, "href") == Some("#faq"))
        .unwrap();
    let faq = dom.element_by_id("faq").unwrap();

    let outcome = controllers.click(&mut page, faq_link);
    assert!(outcome.default_prevented);
    assert!(!outcome.propagation_stopped);
    let request = outcome.scroll_to.unwrap();
    assert_eq!(request.target, faq);
    assert_eq!(request.target_id, "faq");
    assert_eq!(request.behavior, ScrollBehavior::Smooth);
    assert_eq!(request.block, ScrollBlock::Start);
}

#[test]
fn fragment_to_missing_id_only_prevents_default() {
    let mut page = Page::default();
    let faq = page.dom().element_by_id("faq").unwrap();
    page.dom_mut().remove(faq);
    let mut controllers = Controllers::new();
    controllers.attach_smooth_scroll(&mut page);
    let dom = page.dom();
    let link = dom
        .all_by_tag(dom.root(), "a")
        .into_iter()
        .find(|a| dom.attr(*a, "href") == Some("#faq"))
        .unwrap();
    let outcome = controllers.click(&mut page, link);
    assert!(outcome.default_prevented);
    assert!(outcome.scroll_to.is_none());
}

#[tokio::test]
async fn loads_every_schema_version_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let records = json!([{"udbyder": "Tryg", "link": "https://x"}]);
    write_json(dir.path(), "v1.json", &records);
    write_json(
        dir.path(),
        "v2.json",
        &json!({"data": records, "metadata": {"last_updated": "2024-05-01T10:00:00", "total_records": 1}}),
    );
    write_json(
        dir.path(),
        "v3.json",
        &json!({"schema_version": 3, "metadata": {}, "data": records}),
    );

    let loader = loader_for(Some(dir.path().display().to_string()));
    for (name, version) in [
        ("v1.json", SchemaVersion::BareArray),
        ("v2.json", SchemaVersion::Envelope),
        ("v3.json", SchemaVersion::Versioned(3)),
    ] {
        let report = loader.load::<InsuranceOffer>(name).await;
        assert_eq!(report.version, Some(version), "{name}");
        assert_eq!(report.attempts, 1);
        match report.state {
            DatasetState::Loaded(dataset) => {
                assert_eq!(dataset.data[0].provider, "Tryg");
                assert_eq!(dataset.schema_version, 3);
            }
            other => panic!("{name}: {}", other.label()),
        }
    }
}

#[tokio::test]
async fn invalid_records_are_dropped_and_empty_sets_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_json(
        dir.path(),
        "bilforsikring.json",
        &json!([{"udbyder": "", "link": "https://x"}, {"udbyder": "Tryg", "link": null}]),
    );
    let loader = loader_for(Some(dir.path().display().to_string()));
    let report = loader.load::<InsuranceOffer>("bilforsikring.json").await;
    assert_eq!(report.dropped, 2);
    assert!(matches!(report.state, DatasetState::Empty));
}

#[tokio::test]
async fn mistyped_price_keeps_the_rest_of_the_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write_json(
        dir.path(),
        "bilforsikring.json",
        &json!([
            {"udbyder": "Tryg", "pris_mdr": "399 kr", "link": "https://tryg.dk"},
            {"udbyder": "Codan", "pris_mdr": 450, "link": "https://codan.dk"},
            {"udbyder": {"navn": "If"}, "link": "https://if.dk"}
        ]),
    );
    let loader = loader_for(Some(dir.path().display().to_string()));
    let report = loader.load::<InsuranceOffer>("bilforsikring.json").await;
    assert_eq!(report.dropped, 1);
    match report.state {
        DatasetState::Loaded(ds) => {
            let prices: Vec<_> = ds.data.iter().map(|o| o.monthly_price.as_str()).collect();
            assert_eq!(prices, vec!["399 kr", "450"]);
        }
        other => panic!("unexpected state {}", other.label()),
    }
}

#[tokio::test]
async fn mistyped_reliability_score_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_json(
        dir.path(),
        "leasing.json",
        &json!([{"mærke": "Kia", "model": "EV6", "link": "https://kia.dk", "reliability_score": "0.9"}]),
    );
    let loader = loader_for(Some(dir.path().display().to_string()));
    let report = loader.load::<LeasingOffer>("leasing.json").await;
    assert_eq!(report.dropped, 0);
    match report.state {
        DatasetState::Loaded(ds) => {
            assert_eq!(ds.len(), 1);
            assert!(ds.data[0].reliability_score.is_none());
        }
        other => panic!("unexpected state {}", other.label()),
    }
}

#[tokio::test]
async fn null_metadata_still_loads_records() {
    let dir = tempfile::tempdir().unwrap();
    write_json(
        dir.path(),
        "leasing.json",
        &json!({"data": leasing_json(), "metadata": null}),
    );
    let loader = loader_for(Some(dir.path().display().to_string()));
    let report = loader.load::<LeasingOffer>("leasing.json").await;
    assert_eq!(report.version, Some(SchemaVersion::Envelope));
    match report.state {
        DatasetState::Loaded(ds) => {
            assert_eq!(ds.len(), 2);
            assert!(ds.metadata.last_updated.is_none());
        }
        other => panic!("unexpected state {}", other.label()),
    }
}

#[tokio::test]
async fn unsupported_schema_fails_without_retry() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "x.json", &json!({"schema_version": 9, "data": []}));
    let loader = loader_for(Some(dir.path().display().to_string()));
    let report = loader.load::<LeasingOffer>("x.json").await;
    assert_eq!(report.attempts, 1);
    assert!(matches!(
        report.state,
        DatasetState::Failed(LoadError::Schema { .. })
    ));
}

#[tokio::test]
async fn transient_http_failure_is_retried_once() {
    let (base, hits) = http_fixture(vec![
        (503, "{}".to_string()),
        (200, leasing_json().to_string()),
    ])
    .await;
    let report = loader_for(Some(base)).load::<LeasingOffer>("leasing.json").await;
    assert_eq!(report.attempts, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    match report.state {
        DatasetState::Loaded(dataset) => assert_eq!(dataset.len(), 2),
        other => panic!("expected loaded, got {}", other.label()),
    }
}

#[tokio::test]
async fn retry_happens_at_most_once() {
    let (base, hits) = http_fixture(vec![(503, "{}".to_string())]).await;
    let report = loader_for(Some(base)).load::<LeasingOffer>("leasing.json").await;
    assert_eq!(report.attempts, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(matches!(
        report.state,
        DatasetState::Failed(LoadError::HttpStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let (base, hits) = http_fixture(vec![(404, "{}".to_string())]).await;
    let report = loader_for(Some(base)).load::<InsuranceOffer>("bilforsikring.json").await;
    assert_eq!(report.attempts, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(report.state.is_failed());
}

#[tokio::test]
async fn malformed_json_leaves_section_untouched_when_silent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bilforsikring.json"), "{ not json").unwrap();
    write_json(dir.path(), "leasing.json", &leasing_json());

    let runner = Runner::new(Options {
        base: Some(dir.path().display().to_string()),
        failure_policy: FailurePolicy::Silent,
        ..Default::default()
    })
    .unwrap();
    let build = runner.run().await.unwrap();

    let dom = build.page.dom();
    let insurance = dom.element_by_id("bilforsikring").unwrap();
    assert!(dom.first_by_class(insurance, CARDS_CONTAINER).is_none());
    assert!(dom.first_by_class(insurance, "section-notice").is_none());
    let tbody = dom.element_by_id("bilforsikring-table").unwrap();
    assert!(dom.children(tbody).is_empty());

    let leasing = dom.element_by_id("leasing").unwrap();
    assert_eq!(dom.all_by_class(leasing, "comparison-card").len(), 2);
    assert_eq!(build.failures(), 1);
    assert_eq!(build.sections.len(), 1);
    assert_eq!(build.sections[0].kind, OfferKind::Leasing);
}

#[tokio::test]
async fn missing_dataset_shows_notice_by_default() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "leasing.json", &leasing_json());
    let runner = Runner::new(Options {
        base: Some(dir.path().display().to_string()),
        ..Default::default()
    })
    .unwrap();
    let build = runner.run().await.unwrap();
    let dom = build.page.dom();
    let insurance = dom.element_by_id("bilforsikring").unwrap();
    let notice = dom.first_by_class(insurance, "section-notice").unwrap();
    assert!(dom.has_class(notice, "unavailable"));
    assert_eq!(build.statuses[0].state, "failed");
    assert_eq!(build.statuses[0].attempts, 1);
}

#[tokio::test]
async fn json_report_lists_statuses_and_sections() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "leasing.json", &leasing_json());
    let runner = Runner::new(Options {
        base: Some(dir.path().display().to_string()),
        ..Default::default()
    })
    .unwrap();
    let build = runner.run().await.unwrap();

    let bytes = output::render(OutputFormat::Json, &build).unwrap();
    let report: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["statuses"][0]["kind"], "insurance");
    assert_eq!(report["statuses"][0]["state"], "failed");
    assert_eq!(report["statuses"][1]["offers"], 2);
    assert!(report["sections"].as_array().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn built_page_has_metadata_faq_and_controllers() {
    let dir = tempfile::tempdir().unwrap();
    write_json(
        dir.path(),
        "bilforsikring.json",
        &json!({"data": [{"udbyder": "Tryg", "produkt": "Basis", "link": "https://x"}],
                "metadata": {"last_updated": "2024-05-01T10:00:00"}}),
    );
    write_json(dir.path(), "leasing.json", &leasing_json());
    let runner = Runner::new(Options {
        base: Some(dir.path().display().to_string()),
        ..Default::default()
    })
    .unwrap();
    let mut build = runner.run().await.unwrap();

    let html = build.page.to_html();
    assert_eq!(html.matches(r#"id="faq-structured-data""#).count(), 1);
    assert!(html.contains("Sidst opdateret: 2024-05-01"));
    assert!(html.contains(r#"data-controller="accordion""#));
    assert!(html.contains(r#"id="page-runtime""#));

    assert_eq!(build.controllers.accordion().unwrap().len(), 3);
    assert!(build.controllers.menu().is_some());
    assert!(!build.controllers.smooth_scroll().unwrap().is_empty());

    let card = build.page.dom().first_by_class(build.page.dom().root(), "faq-card").unwrap();
    let header = build.page.dom().first_by_class(card, "faq-header").unwrap();
    build.controllers.click(&mut build.page, header);
    assert!(build.page.dom().has_class(card, "active"));
}

#[tokio::test]
async fn migrate_file_rewrites_old_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leasing.json");
    write_json(dir.path(), "leasing.json", &leasing_json());

    let migration = loader::migrate_file(&path).await.unwrap();
    assert_eq!(migration.from, SchemaVersion::BareArray);
    assert_eq!(migration.records, 2);
    assert!(migration.changed());

    let rewritten: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(rewritten["schema_version"], 3);
    assert_eq!(rewritten["data"].as_array().unwrap().len(), 2);

    let again = loader::migrate_file(&path).await.unwrap();
    assert!(!again.changed());
}
