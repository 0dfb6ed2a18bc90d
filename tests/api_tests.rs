// tests/api_tests.rs

use std::sync::Arc;

use classroom_qa::{routes, state::AppState, store::MemoryStore};
use serde_json::{Value, json};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. Fresh in-memory store per test
    let store = Arc::new(MemoryStore::new());

    // 2. Create the state
    let state = AppState::new(store);

    // 3. Create the router with the app state
    let app = routes::create_router(state);

    // 4. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 5. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn create_question(
    client: &reqwest::Client,
    address: &str,
    date_or_week: &str,
    text: &str,
    reference_answer: Option<&str>,
) -> Value {
    let response = client
        .post(&format!("{}/api/questions", address))
        .json(&json!({
            "date_or_week": date_or_week,
            "text": text,
            "reference_answer": reference_answer,
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    response.json().await.expect("Failed to parse question json")
}

async fn submit(
    client: &reqwest::Client,
    address: &str,
    question_id: &str,
    student_id: &str,
    text: &str,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/questions/{}/answers", address, question_id))
        .json(&json!({ "student_id": student_id, "text": text }))
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn unknown_path_is_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn create_question_rejects_empty_text() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: whitespace-only text passes the length check but not the core's
    for text in ["", "   "] {
        let response = client
            .post(&format!("{}/api/questions", address))
            .json(&json!({ "date_or_week": "W1", "text": text }))
            .send()
            .await
            .expect("Failed to execute request");

        // Assert
        assert_eq!(response.status().as_u16(), 400);
    }

    let listed: Vec<Value> = client
        .get(&format!("{}/api/questions", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn questions_list_in_creation_order_with_filter() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let first = create_question(&client, &address, "W1", "first", None).await;
    let second = create_question(&client, &address, "W2", "second", None).await;
    let third = create_question(&client, &address, "W1", "third", Some("x")).await;

    // Act
    let w1: Vec<Value> = client
        .get(&format!("{}/api/questions?date_or_week=W1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let groupings: Vec<String> = client
        .get(&format!("{}/api/groupings", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert
    assert_eq!(w1.len(), 2);
    assert_eq!(w1[0]["id"], first["id"]);
    assert_eq!(w1[1]["id"], third["id"]);
    assert_ne!(first["id"], second["id"]);
    assert_eq!(groupings, vec!["W2".to_string(), "W1".to_string()]);
}

#[tokio::test]
async fn grading_flow_matches_worked_example() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let question = create_question(&client, &address, "W1", "2+2?", Some("4")).await;
    let id = question["id"].as_str().expect("id not found").to_string();

    // 1. Correct first attempt
    let first: Value = submit(&client, &address, &id, "s1", "4")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(first["status"]["state"], "correct");

    // 2. Resubmission overwrites and re-evaluates
    let second: Value = submit(&client, &address, &id, "s1", "5")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(second["status"]["state"], "incorrect");

    // 3. Teacher override
    let graded = client
        .put(&format!("{}/api/questions/{}/answers/s1/grade", address, id))
        .json(&json!({ "correct": true }))
        .send()
        .await
        .expect("Grade failed");
    assert_eq!(graded.status().as_u16(), 200);
    let graded: Value = graded.json().await.unwrap();
    assert_eq!(graded["status"]["state"], "manually_graded");
    assert_eq!(graded["status"]["correct"], true);

    // 4. Only one live answer, carrying the latest text
    let answers: Vec<Value> = client
        .get(&format!("{}/api/questions/{}/answers", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0]["submitted_text"], "5");

    // 5. Summary
    let summary: Value = client
        .get(&format!("{}/api/groupings/W1/summary", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.as_object().map(|m| m.len()), Some(1));
    assert_eq!(
        summary[id.as_str()],
        json!({ "correct_count": 1, "incorrect_count": 0, "ungraded_count": 0 })
    );
}

#[tokio::test]
async fn answer_to_unknown_question_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = submit(&client, &address, "no-such-question", "s1", "4").await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn grading_missing_answer_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let question = create_question(&client, &address, "W1", "Why?", None).await;
    let id = question["id"].as_str().unwrap();

    let response = client
        .put(&format!("{}/api/questions/{}/answers/ghost/grade", address, id))
        .json(&json!({ "correct": false }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn deleting_question_removes_its_answers() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let question = create_question(&client, &address, "W1", "Capital?", Some("Paris")).await;
    let id = question["id"].as_str().unwrap().to_string();
    let answer: Value = submit(&client, &address, &id, "s1", " paris ")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(answer["status"]["state"], "correct");

    // Act
    let deleted = client
        .delete(&format!("{}/api/questions/{}", address, id))
        .send()
        .await
        .unwrap();
    let deleted_again = client
        .delete(&format!("{}/api/questions/{}", address, id))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(deleted.status().as_u16(), 204);
    assert_eq!(deleted_again.status().as_u16(), 404);

    let answers: Vec<Value> = client
        .get(&format!("{}/api/questions/{}/answers", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(answers.is_empty());
}

#[tokio::test]
async fn check_ins_are_idempotent() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client
            .post(&format!("{}/api/check-ins", address))
            .json(&json!({ "student_id": "S001", "date_or_week": "W1" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let check_ins: Vec<Value> = client
        .get(&format!("{}/api/check-ins?date_or_week=W1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check_ins.len(), 1);
    assert_eq!(check_ins[0]["student_id"], "S001");
}

#[tokio::test]
async fn student_counts_per_grouping() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let q1 = create_question(&client, &address, "W1", "a", None).await;
    let q2 = create_question(&client, &address, "W1", "b", None).await;

    for (q, student) in [(&q1, "s1"), (&q2, "s1"), (&q2, "s2")] {
        let response = submit(&client, &address, q["id"].as_str().unwrap(), student, "x").await;
        assert_eq!(response.status().as_u16(), 200);
    }

    let counts: Value = client
        .get(&format!("{}/api/groupings/W1/students", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(counts, json!({ "s1": 2, "s2": 1 }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_positions() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let mut handles = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let address = address.clone();
        handles.push(tokio::spawn(async move {
            create_question(&client, &address, "W1", &format!("Question {}", i), None).await
        }));
    }
    for handle in handles {
        handle.await.expect("Create task panicked");
    }

    // Assert
    let listed: Vec<Value> = client
        .get(&format!("{}/api/questions", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mut positions: Vec<i64> = listed
        .iter()
        .map(|q| q["position"].as_i64().expect("position not found"))
        .collect();
    positions.dedup();
    assert_eq!(listed.len(), 20);
    assert_eq!(positions, (1..=20).collect::<Vec<i64>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn delete_racing_submissions_leaves_no_orphans() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let question = create_question(&client, &address, "W1", "2+2?", Some("4")).await;
    let id = question["id"].as_str().unwrap().to_string();

    // Act: submissions and the delete in flight together
    let mut submissions = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let address = address.clone();
        let id = id.clone();
        submissions.push(tokio::spawn(async move {
            submit(&client, &address, &id, &format!("s{}", i), "4")
                .await
                .status()
                .as_u16()
        }));
    }
    let deleted = client
        .delete(&format!("{}/api/questions/{}", address, id))
        .send()
        .await
        .unwrap();

    // Assert: every submission either landed before the delete or was refused
    for handle in submissions {
        let status = handle.await.expect("Submit task panicked");
        assert!(status == 200 || status == 404, "unexpected status {}", status);
    }
    assert_eq!(deleted.status().as_u16(), 204);

    let answers: Vec<Value> = client
        .get(&format!("{}/api/questions/{}/answers", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(answers.is_empty());
}

#[tokio::test]
async fn grading_through_spliced_ids_is_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let question = create_question(&client, &address, "W1", "2+2?", Some("4")).await;
    let id = question["id"].as_str().unwrap().to_string();
    let stored = submit(&client, &address, &id, "s1:x", "5").await;
    assert_eq!(stored.status().as_u16(), 200);

    // Act: question id "<id>:s1" plus student "x" must not reach student "s1:x"
    let response = client
        .put(&format!("{}/api/questions/{}%3As1/answers/x/grade", address, id))
        .json(&json!({ "correct": true }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 404);
    let answers: Vec<Value> = client
        .get(&format!("{}/api/questions/{}/answers", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0]["status"]["state"], "incorrect");
}

#[tokio::test]
async fn class_scores_and_participation_are_saved_per_student() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    for (student, score) in [("S001", 6.0), ("S001", 8.5), ("S002", 7.0)] {
        let response = client
            .put(&format!("{}/api/groupings/W1/class-scores/{}", address, student))
            .json(&json!({ "score": score, "note": "oral" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }
    for (student, count) in [("S001", 2), ("S002", 4)] {
        let response = client
            .put(&format!("{}/api/groupings/W1/participation/{}", address, student))
            .json(&json!({ "count": count }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    // Assert
    let scores: Vec<Value> = client
        .get(&format!("{}/api/class-scores?date_or_week=W1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0]["student_id"], "S001");
    assert_eq!(scores[0]["score"], 8.5);
    assert_eq!(scores[0]["note"], "oral");

    let participation: Value = client
        .get(&format!("{}/api/groupings/W1/participation", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(participation, json!({ "S001": 2, "S002": 4 }));
}

#[tokio::test]
async fn answers_can_be_searched_by_student() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let q1 = create_question(&client, &address, "W1", "a", None).await;
    let q2 = create_question(&client, &address, "W2", "b", None).await;
    for (q, student) in [(&q1, "S001"), (&q1, "T002"), (&q2, "S001")] {
        submit(&client, &address, q["id"].as_str().unwrap(), student, "x").await;
    }

    // Act
    let found: Vec<Value> = client
        .get(&format!("{}/api/answers?date_or_week=W1&student=s00", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["student_id"], "S001");
    assert_eq!(found[0]["question_id"], q1["id"]);
}
