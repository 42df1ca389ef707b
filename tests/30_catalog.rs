mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use study_tracker::database::models::RecordStatus;
use study_tracker::database::Store;

fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .map(|items| {
            items
                .iter()
                .map(|s| s["name"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn seeded_catalog_is_served() -> Result<()> {
    let server = common::spawn().await?;
    let token = server.user_token().await?;

    let (status, body) = server.get("/api/data", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subjects"].as_array().map(Vec::len), Some(8));
    assert_eq!(body["subjects"][0], "Polity");
    assert_eq!(body["tests"].as_array().map(Vec::len), Some(15));
    assert_eq!(body["tests"][12]["type"], "Full Mock");
    assert_eq!(body["routines"]["weekday"].as_array().map(Vec::len), Some(8));
    assert_eq!(body["routines"]["sunday"][1]["activity"], "Mock Test");
    Ok(())
}

#[tokio::test]
async fn bulk_subject_sync_reconciles_by_name() -> Result<()> {
    let server = common::spawn().await?;
    let admin = server.login_admin().await?;

    let (status, body) = server.put("/api/data", &admin, json!({ "subjects": ["B", "C"] })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data updated successfully");

    let (_, before) = server.get("/api/subjects", &admin).await?;
    assert_eq!(names(&before), vec!["B", "C"]);
    let b_id = before[0]["id"].clone();

    server.put("/api/data", &admin, json!({ "subjects": ["A", "B"] })).await?;

    let (_, after) = server.get("/api/subjects", &admin).await?;
    let mut active = names(&after);
    active.sort();
    assert_eq!(active, vec!["A", "B"]);
    let b = after.as_array().unwrap().iter().find(|s| s["name"] == "B").unwrap();
    assert_eq!(b["id"], b_id);

    let all = server.store.list_subjects(false).await?;
    let c = all.iter().find(|s| s.name == "C").unwrap();
    assert_eq!(c.status, RecordStatus::Inactive);
    Ok(())
}

#[tokio::test]
async fn bulk_sync_reactivates_inactive_subjects() -> Result<()> {
    let server = common::spawn().await?;
    let admin = server.login_admin().await?;

    server.put("/api/data", &admin, json!({ "subjects": ["General"] })).await?;
    server
        .put("/api/data", &admin, json!({ "subjects": ["General", "Polity"] }))
        .await?;

    // Polity comes back at its new position; General keeps its seeded one
    let (_, body) = server.get("/api/subjects", &admin).await?;
    assert_eq!(names(&body), vec!["Polity", "General"]);
    assert_eq!(body[0]["order"], 1);
    assert_eq!(body[1]["order"], 7);
    Ok(())
}

#[tokio::test]
async fn bulk_sync_updates_known_ids_and_creates_the_rest() -> Result<()> {
    let server = common::spawn().await?;
    let admin = server.login_admin().await?;

    let (_, data) = server.get("/api/data", &admin).await?;
    let first_test = data["tests"][0]["id"].as_str().unwrap().to_string();

    let body = json!({
        "tasks": [
            { "id": "tmp-1", "date": "2026-04-02", "morning": "Maps", "subject": "Geography" }
        ],
        "tests": [
            { "id": first_test, "target": 45 },
            { "id": Uuid::new_v4().to_string(), "target": 99 }
        ],
        "routines": { "saturday": [{ "time": "06:00", "activity": "Run" }] }
    });
    let (status, _) = server.put("/api/data", &admin, body).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, data) = server.get("/api/data", &admin).await?;
    assert_eq!(data["tasks"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["tasks"][0]["hours"], 3.0);
    assert_eq!(data["tests"].as_array().map(Vec::len), Some(15));
    assert_eq!(data["tests"][0]["target"], 45.0);
    assert_eq!(data["routines"]["saturday"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["routines"]["weekday"].as_array().map(Vec::len), Some(8));
    Ok(())
}

#[tokio::test]
async fn bulk_sync_stops_at_first_invalid_item() -> Result<()> {
    let server = common::spawn().await?;
    let admin = server.login_admin().await?;

    let body = json!({
        "tasks": [
            { "date": "2026-04-02", "morning": "Maps", "subject": "Geography" },
            { "date": "2026-04-03", "subject": "Geography" }
        ]
    });
    let (status, body) = server.put("/api/data", &admin, body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Task morning is required");

    let (_, tasks) = server.get("/api/tasks", &admin).await?;
    assert_eq!(tasks.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn subject_create_update_and_soft_delete() -> Result<()> {
    let server = common::spawn().await?;
    let admin = server.login_admin().await?;

    let (status, created) = server
        .post("/api/subjects", Some(&admin), json!({ "name": "Ethics", "color": "#123456" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["order"], 8);
    assert_eq!(created["icon"], "📚");
    assert_eq!(created["status"], "active");

    let (status, body) = server
        .post("/api/subjects", Some(&admin), json!({ "name": "Ethics" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Subject already exists");

    let id = created["id"].as_str().unwrap();
    let (_, updated) = server
        .put(&format!("/api/subjects/{}", id), &admin, json!({ "description": "Paper IV" }))
        .await?;
    assert_eq!(updated["description"], "Paper IV");
    assert_eq!(updated["color"], "#123456");

    let (_, body) = server.delete(&format!("/api/subjects/{}", id), &admin).await?;
    assert_eq!(body["message"], "Subject deleted");

    let (_, list) = server.get("/api/subjects", &admin).await?;
    assert!(!names(&list).contains(&"Ethics".to_string()));

    let stored = server.store.list_subjects(false).await?;
    assert!(stored.iter().any(|s| s.name == "Ethics" && !s.status.is_active()));
    Ok(())
}

#[tokio::test]
async fn tasks_are_open_to_every_user() -> Result<()> {
    let server = common::spawn().await?;
    let token = server.user_token().await?;

    let (status, task) = server
        .post(
            "/api/tasks",
            Some(&token),
            json!({ "date": "2026-02-03", "morning": "Polity ch. 1", "subject": "Polity" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["evening"], "");
    assert_eq!(task["test"], "-");
    assert!(task["createdBy"].is_string());

    server
        .post(
            "/api/tasks",
            Some(&token),
            json!({ "date": "2026-03-10", "morning": "Rivers", "subject": "Geography" }),
        )
        .await?;

    let (_, feb) = server.get("/api/tasks?month=2", &token).await?;
    assert_eq!(feb.as_array().map(Vec::len), Some(1));
    let (_, geo) = server.get("/api/tasks?subject=Geography", &token).await?;
    assert_eq!(geo[0]["morning"], "Rivers");
    let (status, _) = server.get("/api/tasks?month=xx", &token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = task["id"].as_str().unwrap();
    let (_, updated) = server
        .put(&format!("/api/tasks/{}", id), &token, json!({ "hours": 5 }))
        .await?;
    assert_eq!(updated["hours"], 5.0);
    assert_eq!(updated["morning"], "Polity ch. 1");

    let (_, body) = server.delete(&format!("/api/tasks/{}", id), &token).await?;
    assert_eq!(body["message"], "Task deleted");
    let (_, all) = server.get("/api/tasks", &token).await?;
    assert_eq!(all.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn missing_ids_are_not_errors() -> Result<()> {
    let server = common::spawn().await?;
    let admin = server.login_admin().await?;
    let missing = Uuid::new_v4();

    let (status, body) = server
        .put(&format!("/api/tasks/{}", missing), &admin, json!({ "hours": 1 }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, body) = server
        .put("/api/tests/not-an-id", &admin, json!({ "target": 1 }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, body) = server.delete(&format!("/api/tasks/{}", missing), &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted");
    Ok(())
}

#[tokio::test]
async fn tests_and_routines_are_admin_writable() -> Result<()> {
    let server = common::spawn().await?;
    let admin = server.login_admin().await?;

    let (status, test) = server
        .post(
            "/api/tests",
            Some(&admin),
            json!({ "number": 16, "date": "2026-03-21", "type": "Final Mock", "mcqs": 200, "focus": "Revision", "target": 150 }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(test["type"], "Final Mock");

    let (status, body) = server
        .post("/api/tests", Some(&admin), json!({ "number": 17, "type": "Quiz" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (_, tests) = server.get("/api/tests", &admin).await?;
    assert_eq!(tests.as_array().map(Vec::len), Some(16));
    assert_eq!(tests[15]["number"], 16);

    let (status, routine) = server
        .put(
            "/api/routines/sunday",
            &admin,
            json!({ "schedule": [{ "time": "08:00", "activity": "Rest", "details": "", "duration": "all day" }] }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(routine["type"], "sunday");

    let (_, routines) = server.get("/api/routines", &admin).await?;
    assert_eq!(routines["sunday"][0]["activity"], "Rest");

    let (status, _) = server
        .put("/api/routines/monday", &admin, json!({ "schedule": [] }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
