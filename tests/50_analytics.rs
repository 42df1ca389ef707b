mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn new_user_gets_zeroed_analytics() -> Result<()> {
    let server = common::spawn().await?;
    let token = server.user_token().await?;

    let (status, body) = server.get("/api/analytics", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overview"]["totalTasks"], 0);
    assert_eq!(body["overview"]["progressPercentage"], 0);
    assert_eq!(body["overview"]["totalStudyHours"], 0.0);
    assert!(body["overview"]["totalStudyHours"]
        .as_f64()
        .is_some_and(f64::is_sign_positive));
    assert_eq!(body["testPerformance"].as_array().map(Vec::len), Some(15));
    assert!(body["testPerformance"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["percentage"].is_null() && t["score"].is_null()));
    assert_eq!(body["studySessions"], json!([]));
    Ok(())
}

#[tokio::test]
async fn scores_and_completions_feed_the_statistics() -> Result<()> {
    let server = common::spawn().await?;
    let admin = server.login_admin().await?;
    let token = server.user_token().await?;

    let mut task_ids = Vec::new();
    for (subject, hours) in [("Polity", 3.0), ("Polity", 2.0), ("History", 4.0)] {
        let (_, task) = server
            .post(
                "/api/tasks",
                Some(&admin),
                json!({ "date": "2026-01-05", "morning": "Read", "subject": subject, "hours": hours }),
            )
            .await?;
        task_ids.push(task["id"].as_str().unwrap().to_string());
    }

    let (_, tests) = server.get("/api/tests", &token).await?;
    // Test #3 is a 75-question paper
    let test3 = tests
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["number"] == 3)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    server
        .put(
            "/api/progress",
            &token,
            json!({
                "completedTasks": { (task_ids[0].clone()): true, (task_ids[2].clone()): false },
                "testScores": { (test3.clone()): 60 },
                "studySessions": [
                    { "date": "2026-01-05", "duration": 1.5, "subject": "Polity" },
                    { "date": "2026-01-06", "duration": 2.5 }
                ]
            }),
        )
        .await?;

    let (_, body) = server.get("/api/analytics", &token).await?;

    assert_eq!(body["overview"]["totalTasks"], 3);
    assert_eq!(body["overview"]["completedCount"], 1);
    assert_eq!(body["overview"]["progressPercentage"], 33);
    assert_eq!(body["overview"]["totalStudyHours"], 4.0);

    assert_eq!(body["subjectStats"]["Polity"], json!({ "total": 2, "completed": 1, "hours": 3.0 }));
    assert_eq!(body["subjectStats"]["History"]["completed"], 0);

    let perf: &Value = body["testPerformance"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["number"] == 3)
        .unwrap();
    assert_eq!(perf["mcqs"], 75);
    assert_eq!(perf["score"], 60.0);
    assert_eq!(perf["percentage"], 80);

    assert_eq!(body["studySessions"].as_array().map(Vec::len), Some(2));
    Ok(())
}
