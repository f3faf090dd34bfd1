//! Reactive query surface

mod common;

use common::{find_by, keys, Fixture};
use futures_util::StreamExt;
use partquery::executor::PageRequest;
use partquery::part::{Part, PartTree, Sort};
use partquery::{QueryError, QueryResult, ReactivePartTreeQuery};

fn reactive(fx: &Fixture) -> ReactivePartTreeQuery {
    ReactivePartTreeQuery::new(fx.query.clone())
}

// =============================================================================
// Streams
// =============================================================================

#[tokio::test]
async fn test_stream_yields_sorted_records() {
    let fx = Fixture::default();
    let query = reactive(&fx);

    let records = query
        .find_all(find_by("AgeGreaterThan", vec![40.into()]), Sort::asc("age"))
        .collect::<Vec<QueryResult<_>>>()
        .await
        .into_iter()
        .collect::<QueryResult<Vec<_>>>()
        .unwrap();
    assert_eq!(keys(&records), vec!["dave", "leroi", "boyd", "carter"]);
}

#[tokio::test]
async fn test_stream_can_be_abandoned() {
    let fx = Fixture::default();
    let query = reactive(&fx);

    let mut stream = query.find_all(find_by("AgeGreaterThan", vec![0.into()]), Sort::unsorted());
    let first = stream.next().await.unwrap().unwrap();
    assert!(first.key().as_str().is_some());
    drop(stream);

    // the query stays usable after a dropped stream
    let count = query
        .find_all(find_by("LastName", vec!["Moore".into()]), Sort::unsorted())
        .count()
        .await;
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_derivation_error_is_the_only_item() {
    let fx = Fixture::default();
    let query = reactive(&fx);

    let items = query
        .find_all(find_by("ShoeSize", vec![42.into()]), Sort::unsorted())
        .collect::<Vec<_>>()
        .await;
    assert_eq!(items.len(), 1);
    assert!(matches!(
        items[0],
        Err(QueryError::UnresolvableProperty { .. })
    ));
}

// =============================================================================
// Slices and Pages
// =============================================================================

#[tokio::test]
async fn test_async_page_and_slice() {
    let fx = Fixture::default();
    let query = reactive(&fx);
    let tree = PartTree::find("Person", "findByLastNameStartsWithOrderByAgeAsc")
        .part(Part::parse("LastNameStartsWith", vec!["Mo".into()]).unwrap())
        .order_by(Sort::asc("age"))
        .build();

    let page = query
        .find_page(tree.clone(), PageRequest::of(0, 1))
        .await
        .unwrap();
    assert_eq!(page.total_pages(), 2);
    assert_eq!(keys(page.content()), vec!["leroi2"]);

    let slice = query
        .find_slice(tree, 1, 1, Sort::unsorted())
        .await
        .unwrap();
    assert_eq!(keys(slice.content()), vec!["leroi"]);
    assert!(!slice.has_next());
}

#[tokio::test]
async fn test_async_count_is_unsupported() {
    let fx = Fixture::default();
    let query = reactive(&fx);
    let tree = PartTree::count("Person", "countByLastName")
        .part(Part::parse("LastName", vec!["Matthews".into()]).unwrap())
        .build();

    let err = query.count(tree).await.unwrap_err();
    assert_eq!(err.to_string(), "Query method Person.countByLastName not supported.");
}
