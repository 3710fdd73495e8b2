use crate::unit_tests::TestError;
use crate::{FlatOperation, Operation, RequestState, SingleOperation};
use futures::stream;
use futures::StreamExt;

#[tokio::test]
async fn test_single_operation_success() {
    let operation = SingleOperation::new(|input: i32| async move { Ok::<_, TestError>(input * 2) });
    let states: Vec<_> = operation.execute(21).collect().await;
    assert_eq!(states, vec![RequestState::success(42)]);
}

#[tokio::test]
async fn test_single_operation_failure() {
    let operation =
        SingleOperation::new(|_: i32| async move { Err::<i32, _>(TestError::Connection) });
    let states: Vec<_> = operation.execute(0).collect().await;
    assert_eq!(states, vec![RequestState::failure(TestError::Connection)]);
}

#[tokio::test]
async fn test_flat_operation_emits_each_element() {
    let operation = FlatOperation::new(|count: i32| async move {
        Ok::<_, TestError>(stream::iter((1..=count).map(Ok)))
    });
    let states: Vec<_> = operation.execute(3).collect().await;
    assert_eq!(
        states,
        vec![
            RequestState::success(1),
            RequestState::success(2),
            RequestState::success(3),
        ]
    );
}

#[tokio::test]
async fn test_flat_operation_stops_at_first_error() {
    let operation = FlatOperation::new(|_: ()| async move {
        Ok::<_, TestError>(stream::iter(vec![
            Ok(1),
            Err(TestError::NotFound("2".to_string())),
            Ok(3),
        ]))
    });
    let states: Vec<_> = operation.execute(()).collect().await;
    assert_eq!(
        states,
        vec![
            RequestState::success(1),
            RequestState::failure(TestError::NotFound("2".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_flat_operation_open_failure() {
    let operation = FlatOperation::new(|_: ()| async move {
        Err::<stream::Iter<std::vec::IntoIter<Result<i32, TestError>>>, _>(TestError::Connection)
    });
    let states: Vec<_> = operation.execute(()).collect().await;
    assert_eq!(states, vec![RequestState::failure(TestError::Connection)]);
}
