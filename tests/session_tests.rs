pub mod mock;

use std::sync::Arc;

use mindease_engine::modules::profile::{apply_feedback, ProfileFeedback, ProfileService, UserProfile};
use mindease_engine::modules::session::{SessionLedger, SessionState};
use mindease_engine::modules::store::InMemoryRepository;
use mindease_engine::{CanonicalEmotion, EngineError, Session};

use mock::{test_user_id, TestSessionData};

const EPSILON: f64 = 1e-9;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[test]
fn test_incremental_mean_matches_batch_mean() {
    let pairs = [(1.0, 5.0), (0.25, 2.0), (0.5, 0.0), (0.9, 4.5), (0.0, 1.0), (0.75, 3.0)];

    for n in 1..=pairs.len() {
        let mut profile = UserProfile::new("batch");
        for &(completion_ratio, rating) in &pairs[..n] {
            let feedback = ProfileFeedback {
                completion_ratio,
                rating,
                emotion: CanonicalEmotion::Calm,
            };
            profile = apply_feedback(&profile, &feedback);
        }

        let completions: Vec<f64> = pairs[..n].iter().map(|p| p.0).collect();
        let ratings: Vec<f64> = pairs[..n].iter().map(|p| p.1).collect();

        assert_eq!(profile.total_sessions, n as u64);
        assert!((profile.avg_completion - mean(&completions)).abs() < EPSILON);
        assert!((profile.avg_rating - mean(&ratings)).abs() < EPSILON);
        assert_eq!(profile.emotion_count(CanonicalEmotion::Calm), n as u64);
    }
}

#[test]
fn test_session_lifecycle() {
    let engine = TestSessionData::engine();
    let user_id = test_user_id();
    let session_id = TestSessionData::open(&engine, &user_id, "anxious");

    let session = engine.ledger().get(&session_id).unwrap();
    assert_eq!(session.state, SessionState::Created);
    assert_eq!(session.emotion, CanonicalEmotion::Stressed);

    let started = engine.begin_session(&session_id, &user_id).unwrap();
    assert_eq!(started.state, SessionState::Active);

    engine
        .submit_feedback(&TestSessionData::feedback(&session_id, &user_id, 1.0, 5.0))
        .unwrap();

    let closed = engine.ledger().get(&session_id).unwrap();
    assert_eq!(closed.state, SessionState::Closed);
    assert!(closed.completed);
    assert!(closed.ended_at.is_some());

    let profile = engine.profile(&user_id).unwrap();
    assert_eq!(profile.total_sessions, 1);
    assert_eq!(profile.emotion_count(CanonicalEmotion::Stressed), 1);

    assert!(matches!(engine.begin_session(&session_id, &user_id), Err(EngineError::Conflict(_))));
}

#[test]
fn test_double_close_counts_once() {
    let engine = TestSessionData::engine();
    let user_id = test_user_id();
    let session_id = TestSessionData::open(&engine, &user_id, "happy");

    let feedback = TestSessionData::feedback(&session_id, &user_id, 0.8, 4.0);
    engine.submit_feedback(&feedback).unwrap();
    let before = engine.profile(&user_id).unwrap();

    let retry = TestSessionData::feedback(&session_id, &user_id, 0.1, 1.0);
    match engine.submit_feedback(&retry) {
        Err(EngineError::Conflict(_)) => {}
        other => panic!("Expected Conflict, got: {:?}", other),
    }

    assert_eq!(engine.profile(&user_id).unwrap(), before);
    assert_eq!(engine.ledger().get(&session_id).unwrap().completion_ratio, 0.8);
}

#[test]
fn test_foreign_feedback_leaves_state_untouched() {
    let engine = TestSessionData::engine();
    let owner = test_user_id();
    let intruder = test_user_id();
    let session_id = TestSessionData::open(&engine, &owner, "sad");
    let before = engine.ledger().get(&session_id).unwrap();

    let result = engine.submit_feedback(&TestSessionData::feedback(&session_id, &intruder, 1.0, 5.0));
    assert!(matches!(result, Err(EngineError::Authorization(_))));

    assert_eq!(engine.ledger().get(&session_id).unwrap(), before);
    assert!(matches!(engine.profile(&owner), Err(EngineError::NotFound(_))));
    assert!(matches!(engine.profile(&intruder), Err(EngineError::NotFound(_))));
}

#[test]
fn test_invalid_feedback_rejected_before_any_change() {
    let engine = TestSessionData::engine();
    let user_id = test_user_id();
    let session_id = TestSessionData::open(&engine, &user_id, "calm");

    for (ratio, rating) in [(1.5, 3.0), (-0.1, 3.0), (0.5, 5.5), (f64::NAN, 3.0)] {
        let result = engine.submit_feedback(&TestSessionData::feedback(&session_id, &user_id, ratio, rating));
        assert!(matches!(result, Err(EngineError::Validation(_))), "ratio {} rating {}", ratio, rating);
    }

    assert_eq!(engine.ledger().get(&session_id).unwrap().state, SessionState::Created);
}

#[test]
fn test_profile_shapes_next_plan() {
    let engine = TestSessionData::engine();
    let user_id = test_user_id();

    let first = engine.recommend(&TestSessionData::request(&user_id, "calm")).unwrap();
    assert_eq!(first.total_duration, 150);

    engine
        .submit_feedback(&TestSessionData::feedback(&first.session_id, &user_id, 0.4, 2.0))
        .unwrap();

    let second = engine.recommend(&TestSessionData::request(&user_id, "calm")).unwrap();
    let durations: Vec<u32> = second.yoga_plan.iter().map(|p| p.duration).collect();
    assert_eq!(durations, vec![42, 63]);
    assert_eq!(second.total_duration, 105);
}

#[test]
fn test_concurrent_feedback_for_one_user() {
    const N: usize = 16;

    let profiles = Arc::new(ProfileService::new(Arc::new(InMemoryRepository::<UserProfile>::new()), 5));
    let ledger = SessionLedger::new(Arc::new(InMemoryRepository::<Session>::new()), profiles.clone(), 5);
    let personalizer = mindease_engine::RecommendationPersonalizer::new(Default::default());

    let user_id = test_user_id();
    let session_ids: Vec<String> = (0..N)
        .map(|_| {
            let plan = personalizer.recommend_for_completion(CanonicalEmotion::Happy, 0.7);
            ledger
                .open(&user_id, CanonicalEmotion::Happy, Default::default(), plan)
                .unwrap()
                .id
        })
        .collect();

    let submissions: Vec<_> = session_ids
        .iter()
        .enumerate()
        .map(|(i, id)| TestSessionData::feedback(id, &user_id, i as f64 / N as f64, (i % 6) as f64))
        .collect();

    std::thread::scope(|scope| {
        for submission in &submissions {
            let ledger = &ledger;
            scope.spawn(move || ledger.close(submission).unwrap());
        }
    });

    let completions: Vec<f64> = submissions.iter().map(|s| s.completion_ratio).collect();
    let ratings: Vec<f64> = submissions.iter().map(|s| s.rating).collect();

    let profile = profiles.get(&user_id).unwrap().unwrap();
    assert_eq!(profile.total_sessions, N as u64);
    assert_eq!(profile.emotion_count(CanonicalEmotion::Happy), N as u64);
    assert!((profile.avg_completion - mean(&completions)).abs() < EPSILON);
    assert!((profile.avg_rating - mean(&ratings)).abs() < EPSILON);
}

#[test]
fn test_concurrent_duplicate_closes_update_once() {
    const ATTEMPTS: usize = 8;

    let engine = TestSessionData::engine();
    let user_id = test_user_id();
    let session_id = TestSessionData::open(&engine, &user_id, "angry");
    let feedback = TestSessionData::feedback(&session_id, &user_id, 0.6, 3.0);

    let outcomes: Vec<Result<_, EngineError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|_| scope.spawn(|| engine.submit_feedback(&feedback)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let successes = outcomes.iter().filter(|o| o.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|o| matches!(o, Err(EngineError::Conflict(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, ATTEMPTS - 1);
    assert_eq!(engine.profile(&user_id).unwrap().total_sessions, 1);
}

#[test]
fn test_sessions_for_user_newest_first() {
    let engine = TestSessionData::engine();
    let user_id = test_user_id();

    let first = TestSessionData::open(&engine, &user_id, "happy");
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = TestSessionData::open(&engine, &user_id, "sad");
    TestSessionData::open(&engine, &test_user_id(), "calm");

    let sessions = engine.ledger().sessions_for_user(&user_id).unwrap();
    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}

#[test]
fn test_padded_user_id_owns_its_session() {
    let engine = TestSessionData::engine();
    let user_id = format!(" {} ", test_user_id());
    let session_id = TestSessionData::open(&engine, &user_id, "calm");

    assert_eq!(engine.ledger().get(&session_id).unwrap().user_id, user_id);

    engine.begin_session(&session_id, &user_id).unwrap();
    engine
        .submit_feedback(&TestSessionData::feedback(&session_id, &user_id, 0.9, 4.0))
        .unwrap();

    assert_eq!(engine.profile(&user_id).unwrap().total_sessions, 1);

    let trimmed = user_id.trim().to_string();
    let other = TestSessionData::open(&engine, &user_id, "sad");
    let result = engine.submit_feedback(&TestSessionData::feedback(&other, &trimmed, 0.5, 3.0));
    assert!(matches!(result, Err(EngineError::Authorization(_))));
}

#[test]
fn test_blank_user_id_rejected() {
    let engine = TestSessionData::engine();
    let result = engine.recommend(&TestSessionData::request("   ", "calm"));
    assert!(matches!(result, Err(EngineError::Validation(_))));
}
