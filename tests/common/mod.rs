// tests/common/mod.rs

#![allow(dead_code)]

use serde_json::{Map, Value, json};

/// Flat upstream response map with `total` questions, the first `correct` answered right.
pub fn response_map(total: usize, correct: usize) -> Value {
    let mut map = Map::new();
    for k in 0..total {
        map.insert(format!("q{k}"), json!("a"));
        let key = if k < correct { "a" } else { "b" };
        map.insert(format!("q{k}_correct"), json!(key));
    }
    Value::Object(map)
}

fn questions(topic: &str, total: usize, correct: usize, first_id: usize) -> Vec<Value> {
    (0..total)
        .map(|k| {
            json!({
                "id": first_id + k,
                "topic": topic,
                "difficulty": 1 + k % 3,
                "selectedOptionId": if k < correct { 1 } else { 2 },
                "correctOptionId": 1
            })
        })
        .collect()
}

/// Physics at 0.4 accuracy, Chemistry at 0.8.
pub fn current_quiz() -> Value {
    let mut all = questions("Physics", 5, 2, 1);
    all.extend(questions("Chemistry", 5, 4, 100));
    json!({ "questions": all })
}

/// Twenty users `user01..user20` plus `target` (score 75, accuracy 0.8), each with an exam rank.
pub fn history_and_results() -> (Value, Value) {
    let mut history = Vec::new();
    let mut results = Vec::new();

    for i in 1..=20usize {
        let user_id = format!("user{i:02}");
        let correct = i / 2;
        history.push(json!({
            "userId": user_id,
            "score": 35 + 3 * i,
            "responseMap": response_map(10, correct)
        }));
        history.push(json!({
            "userId": user_id,
            "score": 45 + 3 * i,
            "responseMap": response_map(10, correct)
        }));
        results.push(json!({ "userId": user_id, "rank": 25_000 - 1_000 * i as i64 }));
    }

    history.push(json!({
        "userId": "target",
        "score": 75,
        "responseMap": response_map(10, 8)
    }));
    results.push(json!({ "userId": "target", "rank": 8_000 }));

    (Value::Array(history), Value::Array(results))
}

pub const MIN_RANK: i64 = 5_000;
pub const MAX_RANK: i64 = 24_000;
