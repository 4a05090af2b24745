//! End-to-end HTTP tests against the in-memory store

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use infra_store::{MemoryStore, StoreBackend};
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::{NoteFixtures, UserFixtures};

const SECRET: &str = "api-test-secret";

fn server() -> TestServer {
    let config = ApiConfig {
        jwt_secret: SECRET.to_string(),
        store_backend: StoreBackend::Memory,
        evidence_threshold: 1,
        ..Default::default()
    };
    let state = AppState::from_store(config, Arc::new(MemoryStore::new())).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

fn token(user: &str, roles: &[&str]) -> String {
    create_token(user, roles.iter().map(|r| r.to_string()).collect(), SECRET, 3600).unwrap()
}

fn athlete() -> String {
    token(UserFixtures::ATHLETE, &["athlete"])
}

fn coach() -> String {
    token(UserFixtures::COACH, &["coach"])
}

fn athlete_path(rest: &str) -> String {
    format!("/api/v1/athletes/{}{}", UserFixtures::ATHLETE, rest)
}

async fn link_coach(server: &TestServer) {
    server
        .post(&athlete_path("/coaches"))
        .authorization_bearer(athlete())
        .json(&json!({ "coach_id": UserFixtures::COACH }))
        .await
        .assert_status(StatusCode::CREATED);
}

async fn log_entry(server: &TestServer, body: Value) -> Value {
    let response = server
        .post(&athlete_path("/entries"))
        .authorization_bearer(athlete())
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

// ============================================================================
// Authentication
// ============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let server = server();
        server.get("/health").await.assert_status_ok();
        let ready = server.get("/health/ready").await;
        ready.assert_status_ok();
        assert_eq!(ready.json::<Value>()["adapters"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_or_bad_token_is_unauthorized() {
        let server = server();
        let response = server.get("/api/v1/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "UNAUTHORIZED");

        let forged = create_token(UserFixtures::ATHLETE, vec![], "other-secret", 3600).unwrap();
        server
            .get("/api/v1/me")
            .authorization_bearer(forged)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_reports_roles() {
        let server = server();
        let response = server
            .get("/api/v1/me")
            .authorization_bearer(token("dora", &["admin", "coach"]))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["user_id"], "dora");
        assert_eq!(body["primary_role"], "admin");
    }
}

// ============================================================================
// Entries and access
// ============================================================================

mod entry_tests {
    use super::*;

    #[tokio::test]
    async fn test_entry_gets_action_pack_and_hides_private_notes() {
        let server = server();
        let entry = log_entry(
            &server,
            json!({
                "shared_notes": NoteFixtures::mixed_session(),
                "private_notes": NoteFixtures::private_note(),
                "tags": ["Competition Prep", "competition prep"]
            }),
        )
        .await;
        assert_eq!(entry["action_pack"]["focus"], "half guard");
        assert_eq!(entry["tags"], json!(["competition prep"]));
        let path = athlete_path(&format!("/entries/{}", entry["id"].as_str().unwrap()));

        // coach without a link
        server
            .get(&path)
            .authorization_bearer(coach())
            .await
            .assert_status(StatusCode::FORBIDDEN);

        link_coach(&server).await;
        let as_coach = server.get(&path).authorization_bearer(coach()).await;
        as_coach.assert_status_ok();
        assert!(as_coach.json::<Value>().get("private_notes").is_none());

        let as_owner = server.get(&path).authorization_bearer(athlete()).await.json::<Value>();
        assert_eq!(as_owner["private_notes"], NoteFixtures::private_note());

        // coaches read but never write
        server
            .put(&path)
            .authorization_bearer(coach())
            .json(&json!({ "shared_notes": "rewritten" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_entry_is_rejected_with_details() {
        let server = server();
        let response = server
            .post(&athlete_path("/entries"))
            .authorization_bearer(athlete())
            .json(&json!({ "shared_notes": "rolled", "metrics": { "duration_minutes": 0 } }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "INVALID_REQUEST");
        assert!(body["details"][0].as_str().unwrap().starts_with("metrics.duration_minutes"));

        server
            .post(&athlete_path("/entries"))
            .authorization_bearer(athlete())
            .json(&json!({ "shared_notes": "rolled", "session_date": "0001-01-01" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let empty = server
            .post(&athlete_path("/entries"))
            .authorization_bearer(athlete())
            .json(&json!({}))
            .await;
        empty.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_filters_by_position() {
        let server = server();
        log_entry(&server, json!({ "rounds": [{ "position": "full mount", "outcome": "win" }] })).await;
        log_entry(&server, json!({ "rounds": [{ "position": "turtle", "outcome": "loss" }] })).await;

        let response = server
            .get(&athlete_path("/entries"))
            .add_query_param("positions", "mount")
            .authorization_bearer(athlete())
            .await;
        response.assert_status_ok();
        let entries = response.json::<Vec<Value>>();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["rounds"][0]["position"], "mount");
    }

    #[tokio::test]
    async fn test_comments_need_access_and_follow_entry() {
        let server = server();
        let entry = log_entry(&server, json!({ "shared_notes": NoteFixtures::flow_roll() })).await;
        let comments = athlete_path(&format!("/entries/{}/comments", entry["id"].as_str().unwrap()));

        server
            .post(&comments)
            .authorization_bearer(coach())
            .json(&json!({ "body": "Keep your elbows in" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        link_coach(&server).await;
        server
            .post(&comments)
            .authorization_bearer(coach())
            .json(&json!({ "body": "Keep your elbows in" }))
            .await
            .assert_status(StatusCode::CREATED);

        let listed = server.get(&comments).authorization_bearer(athlete()).await.json::<Vec<Value>>();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["author_role"], "coach");
    }
}

// ============================================================================
// Partners, searches and roster
// ============================================================================

mod journal_resource_tests {
    use super::*;

    #[tokio::test]
    async fn test_partner_in_use_cannot_be_deleted() {
        let server = server();
        let partner = server
            .post(&athlete_path("/partners"))
            .authorization_bearer(athlete())
            .json(&json!({ "display_name": "Bruno", "belt": "purple" }))
            .await
            .json::<Value>();
        let partner_id = partner["id"].as_str().unwrap().to_string();

        log_entry(
            &server,
            json!({ "rounds": [{ "partner_id": partner_id, "position": "half guard", "outcome": "loss" }] }),
        )
        .await;

        let path = athlete_path(&format!("/partners/{}", partner_id));
        let detail = server.get(&path).authorization_bearer(athlete()).await.json::<Value>();
        assert_eq!(detail["record"]["losses"], 1);

        let response = server.delete(&path).authorization_bearer(athlete()).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["error"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_saved_search_names_are_unique() {
        let server = server();
        log_entry(&server, json!({ "shared_notes": "worked guard retention", "tags": ["guard"] })).await;

        let created = server
            .post(&athlete_path("/searches"))
            .authorization_bearer(athlete())
            .json(&json!({ "name": "Guard work", "query": { "tags": ["guard"] } }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let id = created.json::<Value>()["id"].as_str().unwrap().to_string();

        server
            .post(&athlete_path("/searches"))
            .authorization_bearer(athlete())
            .json(&json!({ "name": "guard WORK" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let results = server
            .get(&athlete_path(&format!("/searches/{}/results", id)))
            .authorization_bearer(athlete())
            .await
            .json::<Value>();
        assert_eq!(results["entries"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_roster_links_are_mirrored() {
        let server = server();
        link_coach(&server).await;

        server
            .post(&athlete_path("/coaches"))
            .authorization_bearer(athlete())
            .json(&json!({ "coach_id": UserFixtures::COACH }))
            .await
            .assert_status(StatusCode::CONFLICT);
        server
            .post(&athlete_path("/coaches"))
            .authorization_bearer(athlete())
            .json(&json!({ "coach_id": UserFixtures::ATHLETE }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let athletes = server
            .get("/api/v1/coaches/me/athletes")
            .authorization_bearer(coach())
            .await
            .json::<Vec<Value>>();
        assert_eq!(athletes[0]["athlete_id"], UserFixtures::ATHLETE);

        let unlink = athlete_path(&format!("/coaches/{}", UserFixtures::COACH));
        server
            .delete(&unlink)
            .authorization_bearer(athlete())
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&unlink)
            .authorization_bearer(athlete())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

// ============================================================================
// Checkoffs and progress
// ============================================================================

mod progress_tests {
    use super::*;

    async fn triangle_checkoff(server: &TestServer) -> String {
        let response = server
            .post(&athlete_path("/checkoffs"))
            .authorization_bearer(athlete())
            .json(&json!({ "skill": "Triangle Choke" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["skill"], "triangle");
        assert_eq!(body["status"], "pending");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_entry_proposes_evidence_and_review_drives_lifecycle() {
        let server = server();
        link_coach(&server).await;
        let checkoff_id = triangle_checkoff(&server).await;
        let entry = log_entry(&server, json!({ "shared_notes": NoteFixtures::mixed_session() })).await;

        let checkoff_path = athlete_path(&format!("/checkoffs/{}", checkoff_id));
        let detail = server.get(&checkoff_path).authorization_bearer(athlete()).await.json::<Value>();
        let evidence = detail["evidence"].as_array().unwrap();
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0]["source"], "extraction");
        assert_eq!(evidence[0]["entry_id"], entry["id"]);
        let review = athlete_path(&format!(
            "/checkoffs/{}/evidence/{}/review",
            checkoff_id,
            evidence[0]["id"].as_str().unwrap()
        ));

        // extraction on the same entry does not propose twice
        server
            .post(&athlete_path(&format!("/entries/{}/extract", entry["id"].as_str().unwrap())))
            .authorization_bearer(athlete())
            .await
            .assert_status_ok();
        let detail = server.get(&checkoff_path).authorization_bearer(athlete()).await.json::<Value>();
        assert_eq!(detail["evidence"].as_array().unwrap().len(), 1);

        server
            .put(&review)
            .authorization_bearer(athlete())
            .json(&json!({ "decision": "confirm" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let confirmed = server
            .put(&review)
            .authorization_bearer(coach())
            .json(&json!({ "decision": "confirm" }))
            .await;
        confirmed.assert_status_ok();
        assert_eq!(confirmed.json::<Value>()["checkoff"]["status"], "earned");

        server
            .put(&review)
            .authorization_bearer(coach())
            .json(&json!({ "decision": "confirm" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let report = server
            .get(&athlete_path("/progress"))
            .authorization_bearer(coach())
            .await
            .json::<Value>();
        assert_eq!(report["summary"]["checkoffs"]["earned"], 1);

        let rejected = server
            .put(&review)
            .authorization_bearer(coach())
            .json(&json!({ "decision": "reject" }))
            .await
            .json::<Value>();
        assert_eq!(rejected["checkoff"]["status"], "superseded");
    }

    #[tokio::test]
    async fn test_deleting_entry_withdraws_its_evidence() {
        let server = server();
        link_coach(&server).await;
        let checkoff_id = triangle_checkoff(&server).await;
        let entry = log_entry(&server, json!({ "shared_notes": NoteFixtures::mixed_session() })).await;

        let checkoff_path = athlete_path(&format!("/checkoffs/{}", checkoff_id));
        let detail = server.get(&checkoff_path).authorization_bearer(athlete()).await.json::<Value>();
        let evidence_id = detail["evidence"][0]["id"].as_str().unwrap().to_string();
        server
            .put(&athlete_path(&format!("/checkoffs/{}/evidence/{}/review", checkoff_id, evidence_id)))
            .authorization_bearer(coach())
            .json(&json!({ "decision": "confirm" }))
            .await
            .assert_status_ok();

        server
            .delete(&athlete_path(&format!("/entries/{}", entry["id"].as_str().unwrap())))
            .authorization_bearer(athlete())
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let detail = server.get(&checkoff_path).authorization_bearer(athlete()).await.json::<Value>();
        assert!(detail["evidence"].as_array().unwrap().is_empty());
        assert_eq!(detail["status"], "superseded");
        assert_eq!(detail["confirmed_count"], 0);
    }

    #[tokio::test]
    async fn test_techniques_suffered_propose_nothing() {
        let server = server();
        let triangle = triangle_checkoff(&server).await;
        let armbar = server
            .post(&athlete_path("/checkoffs"))
            .authorization_bearer(athlete())
            .json(&json!({ "skill": "Arm Bar" }))
            .await
            .json::<Value>();
        assert_eq!(armbar["skill"], "armbar");
        let armbar = armbar["id"].as_str().unwrap().to_string();

        log_entry(
            &server,
            json!({
                "shared_notes": "Got caught in a triangle from closed guard.",
                "rounds": [{ "position": "mount", "outcome": "loss", "submission": "armbar" }]
            }),
        )
        .await;

        for checkoff_id in [triangle, armbar] {
            let detail = server
                .get(&athlete_path(&format!("/checkoffs/{}", checkoff_id)))
                .authorization_bearer(athlete())
                .await
                .json::<Value>();
            assert!(detail["evidence"].as_array().unwrap().is_empty(), "{}", detail["skill"]);
        }
    }

    #[tokio::test]
    async fn test_won_submission_proposes_evidence() {
        let server = server();
        let checkoff_id = triangle_checkoff(&server).await;
        log_entry(
            &server,
            json!({ "rounds": [{ "position": "closed guard", "outcome": "win", "submission": "triangle choke" }] }),
        )
        .await;

        let detail = server
            .get(&athlete_path(&format!("/checkoffs/{}", checkoff_id)))
            .authorization_bearer(athlete())
            .await
            .json::<Value>();
        assert_eq!(detail["evidence"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_checkoff_is_conflict() {
        let server = server();
        triangle_checkoff(&server).await;
        server
            .post(&athlete_path("/checkoffs"))
            .authorization_bearer(athlete())
            .json(&json!({ "skill": "triangle" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_filtered_report_is_computed_on_read() {
        let server = server();
        log_entry(&server, json!({ "rounds": [{ "position": "mount", "outcome": "win" }] })).await;
        log_entry(&server, json!({ "rounds": [{ "position": "turtle", "outcome": "loss" }] })).await;

        let stored = server
            .get(&athlete_path("/progress"))
            .authorization_bearer(athlete())
            .await
            .json::<Value>();
        assert_eq!(stored["summary"]["entries"], 2);

        let filtered = server
            .get(&athlete_path("/progress"))
            .add_query_param("position", "full mount")
            .authorization_bearer(athlete())
            .await
            .json::<Value>();
        assert_eq!(filtered["filter"]["position"], "mount");
        assert_eq!(filtered["summary"]["entries"], 1);
        assert_eq!(filtered["summary"]["wins"], 1);

        let again = server
            .get(&athlete_path("/progress"))
            .authorization_bearer(athlete())
            .await
            .json::<Value>();
        assert_eq!(again["summary"]["entries"], 2);

        server
            .get(&athlete_path("/progress"))
            .add_query_param("from", "2024-05-01")
            .add_query_param("to", "2024-04-01")
            .authorization_bearer(athlete())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_annotations_by_coach_deleted_by_author_only() {
        let server = server();
        link_coach(&server).await;
        let created = server
            .post(&athlete_path("/annotations"))
            .authorization_bearer(coach())
            .json(&json!({ "body": "Guard retention much better", "position": "closed guard" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let id = created.json::<Value>()["id"].as_str().unwrap().to_string();
        let path = athlete_path(&format!("/annotations/{}", id));

        server
            .delete(&path)
            .authorization_bearer(athlete())
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let report = server
            .get(&athlete_path("/progress"))
            .authorization_bearer(athlete())
            .await
            .json::<Value>();
        assert_eq!(report["timeline"][0]["kind"], "annotation");

        server
            .delete(&path)
            .authorization_bearer(coach())
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}
