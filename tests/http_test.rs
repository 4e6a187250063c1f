//! HTTP-level tests driving the handlers through the shared route table.

mod common;

use actix_web::{test, web, App};
use consenso::config::AppConfig;
use consenso::handlers;
use consenso::models::session::{participant_id, Scale, VoteValue};
use consenso::registry::PreRegistry;
use consenso::store::SessionStore;

fn app_data() -> (
    web::Data<SessionStore>,
    web::Data<PreRegistry>,
    web::Data<AppConfig>,
) {
    (
        web::Data::new(SessionStore::new()),
        web::Data::new(PreRegistry::new()),
        web::Data::new(AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }),
    )
}

macro_rules! init_app {
    ($store:expr, $registry:expr, $config:expr) => {
        test::init_service(
            App::new()
                .app_data($store.clone())
                .app_data($registry.clone())
                .app_data($config.clone())
                .configure(handlers::routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn unknown_session_ballot_is_not_found() {
    let (store, registry, config) = app_data();
    let app = init_app!(store, registry, config);

    let req = test::TestRequest::get().uri("/vote/NOPE42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn standard_vote_flow_reaches_the_dashboard() {
    let (store, registry, config) = app_data();
    let code = store.create_standard(
        "Screen adults over 50 annually".to_string(),
        Scale::Likert,
        10,
        false,
        Vec::new(),
    );
    let app = init_app!(store, registry, config);

    // Ballot page renders.
    let req = test::TestRequest::get().uri(&format!("/vote/{code}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // Submit a vote; the confirmation echoes the participant id.
    let req = test::TestRequest::post()
        .uri(&format!("/vote/{code}"))
        .set_form([
            ("display_name", "Maria Lopez"),
            ("vote", "8"),
            ("comment", "agree with caveats"),
        ])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains(&participant_id("Maria Lopez")), "body: {body}");

    // Resubmission overwrites instead of appending.
    let req = test::TestRequest::post()
        .uri(&format!("/vote/{code}"))
        .set_form([("display_name", "Maria Lopez"), ("vote", "3"), ("comment", "")])
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/dashboard/{code}/metrics"))
        .to_request();
    let metrics: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(metrics["votes_received"], 1);
    assert_eq!(metrics["quorum"], 6);
    assert_eq!(metrics["verdict"], "quorum_pending");
    // 10 expected participants, one vote of 3 after the overwrite.
    assert_eq!(metrics["distribution"][2], 1);
    assert_eq!(metrics["distribution"][7], 0);
}

#[actix_rt::test]
async fn session_creation_form_round_trips() {
    let (store, registry, config) = app_data();
    let app = init_app!(store, registry, config);

    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_form([
            ("round_label", "Round 1"),
            ("recommendation_text", "Offer smoking cessation support"),
            ("scale", "likert"),
            ("expected_participants", "7"),
        ])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Session created"), "body: {body}");

    let sessions = store.all();
    assert_eq!(sessions.len(), 1);
    assert_eq!(
        sessions[0].session.description(),
        "Offer smoking cessation support (Round 1)"
    );
    assert_eq!(sessions[0].session.expected_participants(), 7);
}

#[actix_rt::test]
async fn missing_recommendation_text_re_renders_the_form() {
    let (store, registry, config) = app_data();
    let app = init_app!(store, registry, config);

    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_form([
            ("recommendation_text", "   "),
            ("scale", "likert"),
            ("expected_participants", "5"),
        ])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("The recommendation text is required"));
    assert!(store.all().is_empty());
}

#[actix_rt::test]
async fn exports_cover_votes_and_history() {
    let (store, registry, config) = app_data();
    let code = store.create_standard(
        "Screen adults over 50 annually".to_string(),
        Scale::Likert,
        3,
        false,
        Vec::new(),
    );
    store.record_vote(&code, "Alice", VoteValue::Score(8), "sensible", None);
    store.record_vote(&code, "Bob", VoteValue::Score(7), "", None);
    let app = init_app!(store, registry, config);

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{code}/export.csv"))
        .to_request();
    let csv = test::call_and_read_body(&app, req).await;
    let csv = String::from_utf8_lossy(&csv);
    assert!(csv.starts_with("Anonymous ID,Name,Recommendation,Round,Vote,Comment,Created"));
    assert!(csv.contains("Alice"));
    assert!(csv.contains("sensible"));

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{code}/report.txt"))
        .to_request();
    let report = test::call_and_read_body(&app, req).await;
    let report = String::from_utf8_lossy(&report);
    assert!(report.contains(&format!("CONSENSUS REPORT — Session {code}")));
    assert!(report.contains("Total votes: 2/3"));
    assert!(report.contains("- Alice"));
}

#[actix_rt::test]
async fn new_round_advances_and_redirects_to_the_dashboard() {
    let (store, registry, config) = app_data();
    let code = store.create_standard(
        "Screen adults over 50 annually".to_string(),
        Scale::Likert,
        3,
        false,
        Vec::new(),
    );
    store.record_vote(&code, "Alice", VoteValue::Score(4), "", None);
    let app = init_app!(store, registry, config);

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{code}/round"))
        .set_form([("revised_text", "Screen adults over 45 annually")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 303);

    let req = test::TestRequest::get()
        .uri(&format!("/dashboard/{code}/metrics"))
        .to_request();
    let metrics: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(metrics["round_number"], 2);
    assert_eq!(metrics["votes_received"], 0);
    assert_eq!(metrics["history"][0]["round_number"], 1);
    assert_eq!(metrics["history"][0]["votes_received"], 1);
}

#[actix_rt::test]
async fn qr_endpoint_serves_svg() {
    let (store, registry, config) = app_data();
    let code = store.create_standard(
        "Screen adults over 50 annually".to_string(),
        Scale::Likert,
        3,
        false,
        Vec::new(),
    );
    let app = init_app!(store, registry, config);

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{code}/qr.svg"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq!(content_type, "image/svg+xml");
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("<svg"));
}

#[actix_rt::test]
async fn state_blob_round_trips_over_http() {
    let (store, registry, config) = app_data();
    let code = store.create_standard(
        "Screen adults over 50 annually".to_string(),
        Scale::Likert,
        3,
        false,
        Vec::new(),
    );
    store.record_vote(&code, "Alice", VoteValue::Score(8), "", None);
    let app = init_app!(store, registry, config);

    let req = test::TestRequest::get().uri("/state/export").to_request();
    let blob = test::call_and_read_body(&app, req).await;
    let blob = String::from_utf8_lossy(&blob).to_string();

    // Import into a fresh process.
    let (store2, registry2, config2) = app_data();
    let app2 = init_app!(store2, registry2, config2);
    let req = test::TestRequest::post()
        .uri("/state/import")
        .set_form([("state", blob.as_str())])
        .to_request();
    let body = test::call_and_read_body(&app2, req).await;
    assert!(String::from_utf8_lossy(&body).contains("State restored: 1 sessions"));
    assert_eq!(store2.get(&code).expect("restored").session.votes_received(), 1);
}

#[actix_rt::test]
async fn grade_package_ballot_accepts_one_submission_per_name() {
    let (store, registry, config) = app_data();
    let rec = store.create_standard(
        "Screen adults over 50 annually".to_string(),
        Scale::Likert,
        5,
        false,
        Vec::new(),
    );
    for (name, score) in [("A", 8), ("B", 9), ("C", 7)] {
        store.record_vote(&rec, name, VoteValue::Score(score), "", None);
    }
    store.finalize(&rec);
    let pkg = store.create_grade_package("Prevention package".to_string(), vec![rec], 5);
    let app = init_app!(store, registry, config);

    // The ballot lists the GRADE domain questions.
    let req = test::TestRequest::get().uri(&format!("/vote/{pkg}")).to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Is the problem a priority?"));

    // Answer every domain with its first option.
    let mut pairs = vec![("display_name".to_string(), "Dr. Ruiz".to_string())];
    let state = store.get(&pkg).expect("package exists");
    if let consenso::models::session::SessionKind::GradePackage { domains, .. } =
        state.session.kind
    {
        for domain in &domains {
            pairs.push((format!("vote_{}", domain.key), domain.options[0].clone()));
            pairs.push((format!("comment_{}", domain.key), String::new()));
        }
    }
    let payload = serde_urlencoded::to_string(&pairs).expect("encodable");

    let req = test::TestRequest::post()
        .uri(&format!("/vote/{pkg}/grade"))
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload(payload.clone())
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains(&participant_id("Dr. Ruiz")));

    // The same name posting again gets the already-registered notice.
    let req = test::TestRequest::post()
        .uri(&format!("/vote/{pkg}/grade"))
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload(payload)
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("already been registered"));

    let req = test::TestRequest::get()
        .uri(&format!("/dashboard/{pkg}/metrics"))
        .to_request();
    let metrics: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(metrics["votes_received"], 1);
    assert_eq!(metrics["kind"], "grade_package");
}

#[actix_rt::test]
async fn confidentiality_registration_lands_in_the_csv() {
    let (store, registry, config) = app_data();
    let app = init_app!(store, registry, config);

    let req = test::TestRequest::post()
        .uri("/register/confidentiality")
        .set_form([
            ("name", "Dr. Vargas"),
            ("accept_confidentiality", "on"),
            ("accept_no_authorship", "on"),
        ])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("recorded"));

    let req = test::TestRequest::get().uri("/register/agreements.csv").to_request();
    let csv = test::call_and_read_body(&app, req).await;
    let csv = String::from_utf8_lossy(&csv);
    assert!(csv.starts_with("ID,Name,Accepted,Submitted"));
    assert!(csv.contains("Dr. Vargas"));
    assert_eq!(registry.agreements().len(), 1);
}
