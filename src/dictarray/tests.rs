use super::*;
use crate::types::dtype::{DATETIME64_NS, FLOAT64, INT32, INT64, OBJECT, STRING};
use arrow::array::{BinaryArray, Float64Array, Int64Array, TimestampNanosecondArray};

fn sample() -> DictArray {
    DictArray::from_arrays(vec![
        ("a", vec![1i64, 2, 3].into_array_ref()),
        ("b", vec![0.5f64, 1.5, 2.5].into_array_ref()),
        ("c", vec!["x", "y", "z"].into_array_ref()),
    ])
    .unwrap()
}

fn assert_keys_in_sync(dict: &DictArray) {
    let names: Vec<&str> = dict.keys().collect();
    let dtype_names: Vec<&str> = dict.dtypes().map(|(name, _)| name).collect();
    assert_eq!(names, dtype_names);
    assert_eq!(dict.arrays.len(), dict.dtypes.len());
    assert!(dict.arrays.keys().all(|name| dict.dtypes.contains_key(name)));
}

#[test]
fn test_subscript_returns_stored_array() {
    let dict = DictArray::from_arrays([("a", vec![1i64, 2, 3])]).unwrap();
    let expected: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3]));
    assert_eq!(&dict["a"], &expected);
    assert_eq!(dict.dtype("a"), Some(&INT64));
}

#[test]
fn test_existing_arrays_are_stored_by_reference() {
    let values: ArrayRef = Arc::new(Float64Array::from(vec![1.0, 2.0]));
    let dict = DictArray::from_arrays([("v", &values)]).unwrap();
    assert!(Arc::ptr_eq(&dict["v"], &values));
}

#[test]
fn test_select_subset() {
    let dict = DictArray::from_arrays([("a", vec![1i32]), ("b", vec![2i32])]).unwrap();
    let only_a = dict.select(["a"]).unwrap();
    assert_eq!(only_a.columns(), &["a".to_string()]);
    assert!(!only_a.contains("b"));
    assert_eq!(only_a.dtype("a"), Some(&INT32));

    let err = dict.select(["a", "missing"]).unwrap_err();
    assert!(matches!(err, MerlinError::ColumnNotFound(ref name) if name == "missing"));
}

#[test]
fn test_select_keeps_explicit_dtypes_and_order() {
    let dict = sample().with_dtypes([("a", INT32)]).unwrap();
    let selected = dict.select(vec!["c", "a"]).unwrap();
    assert_eq!(selected.keys().collect::<Vec<_>>(), vec!["c", "a"]);
    assert_eq!(selected.dtype("a"), Some(&INT32));
}

#[test]
fn test_insertion_order_and_replacement() {
    let mut dict = sample();
    assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);

    let previous = dict.insert("a", vec!["replaced"]).unwrap();
    assert!(previous.is_some());
    assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(dict.dtype("a"), Some(&STRING));

    assert!(dict.insert("d", vec![true, false]).unwrap().is_none());
    assert_eq!(dict.len(), 4);
    assert_keys_in_sync(&dict);
}

#[test]
fn test_with_dtypes_overrides_and_rejects_unknown_names() {
    let dict = sample().with_dtypes([("b", INT64)]).unwrap();
    assert_eq!(dict.dtype("b"), Some(&INT64));
    assert_eq!(dict.dtype("a"), Some(&INT64));

    let err = sample().with_dtypes([("nope", INT64)]).unwrap_err();
    assert!(matches!(err, MerlinError::ColumnNotFound(_)));
}

#[test]
fn test_explicit_dtypes_skip_inference() {
    let blobs: ArrayRef = Arc::new(BinaryArray::from(vec![&b"x"[..], &b"yz"[..]]));
    assert!(DictArray::from_arrays([("blob", blobs.clone())]).is_err());

    let dict = DictArray::from_arrays_with_dtypes(
        vec![("id", vec![1i64, 2].into_array_ref()), ("blob", blobs)],
        [("blob", OBJECT)],
    )
    .unwrap();
    assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["id", "blob"]);
    assert_eq!(dict.dtype("blob"), Some(&OBJECT));
    assert_eq!(dict.dtype("id"), Some(&INT64));
    assert_keys_in_sync(&dict);
}

#[test]
fn test_explicit_dtype_for_unknown_column_is_rejected() {
    let err = DictArray::from_arrays_with_dtypes([("a", vec![1i32])], [("b", INT64)]).unwrap_err();
    assert!(matches!(err, MerlinError::ColumnNotFound(ref name) if name == "b"));
}

#[test]
fn test_update_recomputes_every_dtype() {
    let mut dict = sample().with_dtypes([("b", INT64)]).unwrap();
    dict.update([("c", vec![1i32, 2, 3]), ("e", vec![4i32, 5, 6])]).unwrap();

    assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "b", "c", "e"]);
    assert_eq!(dict.dtype("c"), Some(&INT32));
    assert_eq!(dict.dtype("e"), Some(&INT32));
    // The override on an untouched column is recomputed too.
    assert_eq!(dict.dtype("b"), Some(&FLOAT64));
    assert_keys_in_sync(&dict);
}

#[test]
fn test_update_is_atomic_on_failure() {
    let mut dict = sample();
    let before = dict.copy();
    let binary: ArrayRef = Arc::new(arrow::array::BinaryArray::from(vec![&b"x"[..]]));
    let err = dict.update([("a", vec![9i64].into_array_ref()), ("bin", binary)]).unwrap_err();
    assert!(matches!(err, MerlinError::ExternalTypeNotInMapping { .. }));
    assert_eq!(dict, before);
    assert_keys_in_sync(&dict);
}

#[test]
fn test_remove_drops_both_entries() {
    let mut dict = sample();
    dict.remove("b").unwrap();
    assert!(!dict.contains("b"));
    assert!(dict.dtype("b").is_none());
    assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    assert_keys_in_sync(&dict);

    let err = dict.remove("b").unwrap_err();
    assert!(matches!(err, MerlinError::ColumnNotFound(_)));
}

#[test]
fn test_copy_decouples_maps_but_shares_arrays() {
    let original = sample();
    let mut copy = original.copy();
    copy.remove("a").unwrap();
    copy.insert("z", vec![0i32, 0, 0]).unwrap();

    assert!(original.contains("a"));
    assert!(!original.contains("z"));
    assert!(Arc::ptr_eq(&original["b"], &copy["b"]));
}

#[test]
fn test_equality_is_typed_and_order_insensitive() {
    let a = DictArray::from_arrays([("x", vec![1i32]), ("y", vec![2i32])]).unwrap();
    let b = DictArray::from_arrays([("y", vec![2i32]), ("x", vec![1i32])]).unwrap();
    assert_eq!(a, b);

    let retyped = a.clone().with_dtypes([("x", INT64)]).unwrap();
    assert_ne!(a, retyped);

    let fewer = a.select(["x"]).unwrap();
    assert_ne!(a, fewer);
}

#[test]
fn test_column_view() {
    let dict = sample();
    let column = dict.column("b").unwrap();
    assert_eq!(column.dtype(), &FLOAT64);
    assert_eq!(column.len(), 3);
    assert!(dict.column("nope").is_err());
}

#[test]
fn test_record_batch_roundtrip() {
    let dict = sample();
    let batch = dict.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(batch.num_columns(), 3);
    assert_eq!(batch.schema().field(2).name(), "c");

    let back = DictArray::from_record_batch(&batch).unwrap();
    assert_eq!(back, dict);
}

#[test]
fn test_empty_dict_converts_to_empty_batch() {
    let batch = DictArray::new().to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 0);
}

#[test]
fn test_ragged_columns_are_rejected() {
    let dict = DictArray::from_arrays([("a", vec![1i32, 2]), ("b", vec![1i32])]).unwrap();
    let err = dict.to_record_batch().unwrap_err();
    assert!(matches!(
        err,
        MerlinError::LengthMismatch { ref column, expected: 2, actual: 1 } if column == "b"
    ));
}

#[test]
fn test_timestamps_infer_datetime() {
    let stamps: ArrayRef = Arc::new(TimestampNanosecondArray::from(vec![0i64, 1]));
    let dict = DictArray::from_arrays([("ts", stamps)]).unwrap();
    assert_eq!(dict.dtype("ts"), Some(&DATETIME64_NS));
    assert!(dict.dtype("ts").unwrap().is_datetime());
}
