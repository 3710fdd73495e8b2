use crate::unit_tests::TestError;
use crate::RequestState;

#[test]
fn test_not_started() {
    let state: RequestState<i32, TestError> = RequestState::default();
    assert!(state.is_not_started());
    assert!(!state.is_loading());
    assert!(!state.is_success());
    assert!(!state.is_failure());
    assert!(!state.is_complete());
    assert!(state.is_incomplete());
    assert!(state.value_ref().is_none());
    assert!(state.error_ref().is_none());
    assert_eq!(state.value(), None);
}

#[test]
fn test_loading() {
    let state: RequestState<i32, TestError> = RequestState::Loading;
    assert!(!state.is_not_started());
    assert!(state.is_loading());
    assert!(!state.is_complete());
    assert!(state.is_incomplete());
    assert!(state.value_ref().is_none());
}

#[test]
fn test_success() {
    let state: RequestState<i32, TestError> = RequestState::success(8);
    assert!(state.is_success());
    assert!(state.is_complete());
    assert!(!state.is_incomplete());
    assert_eq!(state.value_ref(), Some(&8));
    assert!(state.error_ref().is_none());
    assert_eq!(state.value(), Some(8));
}

#[test]
fn test_failure() {
    let state: RequestState<i32, TestError> = RequestState::failure(TestError::Connection);
    assert!(state.is_failure());
    assert!(state.is_complete());
    assert!(!state.is_incomplete());
    assert!(state.value_ref().is_none());
    assert_eq!(state.error_ref(), Some(&TestError::Connection));
    assert_eq!(state.value(), None);
}

#[test]
fn test_structural_equality() {
    assert_eq!(
        RequestState::<i32, TestError>::success(1),
        RequestState::success(1)
    );
    assert_ne!(
        RequestState::<i32, TestError>::success(1),
        RequestState::success(2)
    );
    assert_eq!(
        RequestState::<i32, TestError>::failure(TestError::NotFound("a".into())),
        RequestState::failure(TestError::NotFound("a".into()))
    );
    assert_ne!(
        RequestState::<i32, TestError>::failure(TestError::Connection),
        RequestState::failure(TestError::NotFound("a".into()))
    );
    assert_ne!(
        RequestState::<i32, TestError>::Loading,
        RequestState::NotStarted
    );
}

#[test]
fn test_map_success() {
    let state: RequestState<i32, TestError> = RequestState::success(42);
    assert_eq!(state.map(|value| value.to_string()), RequestState::success("42".to_string()));
}

#[test]
fn test_map_never_calls_transform_for_other_states() {
    let explode = |_: i32| -> String { panic!("transform must not run") };

    let not_started: RequestState<i32, TestError> = RequestState::NotStarted;
    assert_eq!(not_started.map(explode), RequestState::NotStarted);

    let loading: RequestState<i32, TestError> = RequestState::Loading;
    assert_eq!(loading.map(explode), RequestState::Loading);

    let failure: RequestState<i32, TestError> = RequestState::failure(TestError::Connection);
    assert_eq!(failure.map(explode), RequestState::failure(TestError::Connection));
}

#[test]
fn test_map_calls_transform_once() {
    let mut calls = 0;
    let state: RequestState<i32, TestError> = RequestState::success(1);
    let mapped = state.map(|value| {
        calls += 1;
        value + 1
    });
    assert_eq!(mapped, RequestState::success(2));
    assert_eq!(calls, 1);
}

#[test]
#[should_panic(expected = "boom")]
fn test_map_does_not_catch_panics() {
    let state: RequestState<i32, TestError> = RequestState::success(1);
    let _ = state.map(|_| -> i32 { panic!("boom") });
}

#[test]
fn test_map_err() {
    let state: RequestState<i32, TestError> = RequestState::failure(TestError::Connection);
    assert_eq!(
        state.map_err(|error| error.to_string()),
        RequestState::failure("connection failed".to_string())
    );

    let state: RequestState<i32, TestError> = RequestState::success(3);
    assert_eq!(state.map_err(|error| error.to_string()), RequestState::success(3));
}

#[test]
fn test_unwrap_or() {
    assert_eq!(RequestState::<i32, TestError>::success(42).unwrap_or(99), 42);
    assert_eq!(RequestState::<i32, TestError>::NotStarted.unwrap_or(99), 99);
    assert_eq!(RequestState::<i32, TestError>::Loading.unwrap_or(99), 99);
    assert_eq!(
        RequestState::<i32, TestError>::failure(TestError::Connection).unwrap_or(99),
        99
    );
    assert_eq!(RequestState::<i32, TestError>::Loading.unwrap_or_default(), 0);
}

#[test]
fn test_unwrap_or_none() {
    assert_eq!(RequestState::<i32, TestError>::success(42).unwrap_or_none(), Some(42));
    assert_eq!(RequestState::<i32, TestError>::NotStarted.unwrap_or_none(), None);
    assert_eq!(RequestState::<i32, TestError>::Loading.unwrap_or_none(), None);
    assert_eq!(
        RequestState::<i32, TestError>::failure(TestError::Connection).unwrap_or_none(),
        None
    );
}

#[test]
fn test_as_ref() {
    let state: RequestState<String, TestError> = RequestState::success("data".to_string());
    assert_eq!(state.as_ref().map(|value| value.len()), RequestState::success(4));
    assert!(state.is_success());
}

#[test]
fn test_fold() {
    let describe = |state: RequestState<i32, TestError>| {
        state.fold(
            || "initial".to_string(),
            || "loading".to_string(),
            |error| format!("failed: {error}"),
            |value| format!("value: {value}"),
        )
    };
    assert_eq!(describe(RequestState::NotStarted), "initial");
    assert_eq!(describe(RequestState::Loading), "loading");
    assert_eq!(describe(RequestState::success(5)), "value: 5");
    assert_eq!(
        describe(RequestState::failure(TestError::Connection)),
        "failed: connection failed"
    );
}

#[test]
fn test_from_result() {
    let ok: Result<i32, TestError> = Ok(1);
    assert_eq!(RequestState::from(ok), RequestState::success(1));

    let err: Result<i32, TestError> = Err(TestError::Connection);
    assert_eq!(RequestState::from(err), RequestState::failure(TestError::Connection));
}
