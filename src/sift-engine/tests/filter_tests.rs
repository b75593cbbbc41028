//! End-to-end tests: build a condition, filter a batch, view the result.

use std::sync::Arc;
use std::thread;

use arrow::array::{Array, Int64Array, UInt16Array};
use proptest::prelude::*;

use common_config::{IndexWidth, MemoryConfig, SelectionConfig};
use common_error::{SiftError, SiftResult};
use sift_core::{Column, ColumnAccess, DataType, Field, RecordBatch, Schema, SchemaRef, Value};
use sift_engine::{
    memory_manager_from_config, view_by_index, Filter, IndexType, MemoryManager,
    NoopMemoryManager, SelectionVector, TrackingMemoryManager,
};
use sift_expr::{Condition, TreeExprBuilder};

fn noop() -> Arc<dyn MemoryManager> {
    Arc::new(NoopMemoryManager::new())
}

fn int_schema() -> (Field, SchemaRef) {
    let field = Field::new("f0", DataType::Int64);
    let schema = Schema::try_new(vec![field.clone()]).unwrap().into_ref();
    (field, schema)
}

/// `mod(f0, divisor) == 0`
fn divisible_by(field: &Field, divisor: i64) -> Condition {
    let b = TreeExprBuilder::new();
    let f0 = b.make_field(field);
    let d = b.make_literal(divisor).unwrap();
    let rem = b
        .make_function("mod", vec![f0, d], DataType::Int64)
        .unwrap();
    let zero = b.make_literal(0i64).unwrap();
    let eq = b
        .make_function("equal", vec![rem, zero], DataType::Bool)
        .unwrap();
    b.make_condition(eq).unwrap()
}

fn int_batch(schema: &SchemaRef, values: Vec<Option<i64>>) -> RecordBatch {
    let n = values.len();
    RecordBatch::try_new(Arc::clone(schema), n, vec![Column::from_options(values)]).unwrap()
}

#[test]
fn test_even_rows_of_fifteen() {
    let (field, schema) = int_schema();
    let batch = int_batch(
        &schema,
        vec![
            Some(1),
            Some(2),
            Some(3),
            Some(4),
            Some(6),
            Some(7),
            Some(8),
            Some(9),
            Some(10),
            Some(11),
            Some(12),
            Some(13),
            Some(14),
            Some(15),
            Some(16),
        ],
    );
    let filter = Filter::make(Arc::clone(&schema), divisible_by(&field, 2)).unwrap();
    let mut selection = SelectionVector::make_int16(batch.num_rows(), noop()).unwrap();

    let matched = filter.evaluate(&batch, &mut selection).unwrap();
    assert_eq!(matched, 8);
    assert_eq!(
        selection.indices().collect::<Vec<_>>(),
        vec![1, 3, 4, 6, 8, 10, 12, 14]
    );

    let array = selection.to_array();
    let positions = array.as_any().downcast_ref::<UInt16Array>().unwrap();
    assert_eq!(positions.values().to_vec(), vec![1u16, 3, 4, 6, 8, 10, 12, 14]);

    let view = view_by_index(&batch.columns()[0], &selection).unwrap();
    let evens = view.values().collect::<SiftResult<Vec<_>>>().unwrap();
    assert_eq!(
        evens,
        [2i64, 4, 6, 8, 10, 12, 14, 16]
            .into_iter()
            .map(Value::Int64)
            .collect::<Vec<_>>()
    );

    let materialized = view.to_arrow().unwrap();
    let ints = materialized.as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(ints.values().to_vec(), vec![2, 4, 6, 8, 10, 12, 14, 16]);
}

#[test]
fn test_evaluate_is_idempotent() {
    let (field, schema) = int_schema();
    let batch = int_batch(&schema, (0..20).map(Some).collect());
    let filter = Filter::make(Arc::clone(&schema), divisible_by(&field, 3)).unwrap();
    let mut selection = SelectionVector::make(20, noop()).unwrap();
    let mut fresh = SelectionVector::make_int32(20, noop()).unwrap();

    filter.evaluate(&batch, &mut selection).unwrap();
    let first: Vec<usize> = selection.indices().collect();
    filter.evaluate(&batch, &mut selection).unwrap();
    let again: Vec<usize> = selection.indices().collect();
    filter.evaluate(&batch, &mut fresh).unwrap();
    let other: Vec<usize> = fresh.indices().collect();

    assert_eq!(first, again);
    assert_eq!(first, other);
    assert_eq!(first, vec![0, 3, 6, 9, 12, 15, 18]);
}

#[test]
fn test_no_matches_yields_empty_selection() {
    let (field, schema) = int_schema();
    let batch = int_batch(&schema, vec![Some(1), Some(3), Some(5)]);
    let filter = Filter::make(Arc::clone(&schema), divisible_by(&field, 2)).unwrap();
    let mut selection = SelectionVector::make_int16(3, noop()).unwrap();

    assert_eq!(filter.evaluate(&batch, &mut selection).unwrap(), 0);
    assert!(selection.is_empty());
    assert_eq!(selection.to_array().len(), 0);
}

#[test]
fn test_zero_capacity_with_a_match() {
    let (field, schema) = int_schema();
    let batch = int_batch(&schema, vec![Some(1), Some(2)]);
    let filter = Filter::make(Arc::clone(&schema), divisible_by(&field, 2)).unwrap();
    let mut selection = SelectionVector::make_int16(0, noop()).unwrap();

    let err = filter.evaluate(&batch, &mut selection).unwrap_err();
    assert!(matches!(err, SiftError::CapacityExceeded(_)));
}

#[test]
fn test_non_boolean_root_rejected() {
    let (field, _) = int_schema();
    let b = TreeExprBuilder::new();
    let f0 = b.make_field(&field);
    let two = b.make_literal(2i64).unwrap();
    let rem = b
        .make_function("mod", vec![f0, two], DataType::Int64)
        .unwrap();

    assert!(matches!(
        b.make_condition(rem).unwrap_err(),
        SiftError::NotBoolean(_)
    ));
}

#[test]
fn test_unknown_function_rejected() {
    let (field, _) = int_schema();
    let b = TreeExprBuilder::new();
    let f0 = b.make_field(&field);
    let err = b
        .make_function("modulo", vec![f0], DataType::Int64)
        .unwrap_err();
    assert!(matches!(err, SiftError::UnknownFunction(_)));
}

#[test]
fn test_three_valued_logic() {
    let a = Field::new("a", DataType::Int64);
    let flag = Field::new("flag", DataType::Bool);
    let schema = Schema::try_new(vec![a.clone(), flag.clone()])
        .unwrap()
        .into_ref();
    let batch = RecordBatch::try_new(
        Arc::clone(&schema),
        4,
        vec![
            Column::from_options(vec![Some(5i64), None, Some(20), None]),
            Column::from_options(vec![Some(true), Some(true), None, Some(false)]),
        ],
    )
    .unwrap();

    let b = TreeExprBuilder::new();
    // a > 10 OR flag
    let gt = b
        .make_function(
            "greater_than",
            vec![b.make_field(&a), b.make_literal(10i64).unwrap()],
            DataType::Bool,
        )
        .unwrap();
    let either = b.make_or(vec![gt, b.make_field(&flag)]).unwrap();
    let filter = Filter::make(Arc::clone(&schema), b.make_condition(either).unwrap()).unwrap();

    let mut selection = SelectionVector::make_int16(4, noop()).unwrap();
    filter.evaluate(&batch, &mut selection).unwrap();
    // row 1: null OR true = true; row 2: true OR null = true; row 3: null OR false = null
    assert_eq!(selection.indices().collect::<Vec<_>>(), vec![0, 1, 2]);

    // isnull(a)
    let missing = b
        .make_function("isnull", vec![b.make_field(&a)], DataType::Bool)
        .unwrap();
    let filter = Filter::make(Arc::clone(&schema), b.make_condition(missing).unwrap()).unwrap();
    filter.evaluate(&batch, &mut selection).unwrap();
    assert_eq!(selection.indices().collect::<Vec<_>>(), vec![1, 3]);
}

#[test]
fn test_wide_boolean_conditions() {
    let flag = Field::new("flag", DataType::Bool);
    let schema = Schema::try_new(vec![flag.clone()]).unwrap().into_ref();
    let batch = RecordBatch::try_new(
        Arc::clone(&schema),
        4,
        vec![Column::from_options(vec![Some(true), Some(false), None, Some(true)])],
    )
    .unwrap();

    let b = TreeExprBuilder::new();
    let leaf = b.make_field(&flag);
    let mut selection = SelectionVector::make_int16(4, noop()).unwrap();

    let all = b.make_and(vec![leaf.clone(); 200_000]).unwrap();
    let filter = Filter::make(Arc::clone(&schema), b.make_condition(all).unwrap()).unwrap();
    assert_eq!(filter.evaluate(&batch, &mut selection).unwrap(), 2);
    assert_eq!(selection.indices().collect::<Vec<_>>(), vec![0, 3]);

    let any = b.make_or(vec![leaf; 200_000]).unwrap();
    let filter = Filter::make(Arc::clone(&schema), b.make_condition(any).unwrap()).unwrap();
    assert_eq!(filter.evaluate(&batch, &mut selection).unwrap(), 2);
}

#[test]
fn test_shared_filter_across_threads() {
    let (field, schema) = int_schema();
    let filter = Arc::new(Filter::make(Arc::clone(&schema), divisible_by(&field, 2)).unwrap());

    let handles: Vec<_> = (0..4i64)
        .map(|offset| {
            let filter = Arc::clone(&filter);
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let batch = int_batch(&schema, (offset..offset + 10).map(Some).collect());
                let mut selection = SelectionVector::make_int32(10, noop()).unwrap();
                filter.evaluate(&batch, &mut selection).unwrap();
                selection.indices().collect::<Vec<_>>()
            })
        })
        .collect();

    for (offset, handle) in handles.into_iter().enumerate() {
        let expected: Vec<usize> = if offset % 2 == 0 {
            vec![0, 2, 4, 6, 8]
        } else {
            vec![1, 3, 5, 7, 9]
        };
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_configured_memory_limit() {
    let memory = memory_manager_from_config(&MemoryConfig { limit: Some(64) });
    let config = SelectionConfig {
        index_width: IndexWidth::Int64,
    };

    // 8 slots of 8 bytes fit exactly, 9 do not.
    let fits = SelectionVector::make_with_config(8, &config, Arc::clone(&memory)).unwrap();
    assert_eq!(fits.index_type(), IndexType::UInt64);
    assert_eq!(memory.used(), 64);

    let err = SelectionVector::make_with_config(1, &config, Arc::clone(&memory)).unwrap_err();
    assert!(matches!(err, SiftError::ResourceExhausted(_)));

    drop(fits);
    assert_eq!(memory.used(), 0);
}

#[test]
fn test_tracking_memory_released_after_filtering() {
    let (field, schema) = int_schema();
    let memory: Arc<dyn MemoryManager> = Arc::new(TrackingMemoryManager::unlimited());
    let batch = int_batch(&schema, (0..100).map(Some).collect());
    let filter = Filter::make(Arc::clone(&schema), divisible_by(&field, 10)).unwrap();
    {
        let mut selection = SelectionVector::make(100, Arc::clone(&memory)).unwrap();
        assert_eq!(selection.index_type(), IndexType::UInt16);
        assert_eq!(memory.used(), 200);
        assert_eq!(filter.evaluate(&batch, &mut selection).unwrap(), 10);
    }
    assert_eq!(memory.used(), 0);
}

proptest! {
    #[test]
    fn prop_selection_matches_predicate(
        values in prop::collection::vec(prop::option::of(-1000i64..1000), 0..300),
        divisor in 1i64..7,
    ) {
        let (field, schema) = int_schema();
        let batch = int_batch(&schema, values.clone());
        let filter = Filter::make(Arc::clone(&schema), divisible_by(&field, divisor)).unwrap();
        let mut selection = SelectionVector::make(values.len(), noop()).unwrap();
        filter.evaluate(&batch, &mut selection).unwrap();

        let indices: Vec<usize> = selection.indices().collect();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));

        let expected: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| matches!(v, Some(x) if x % divisor == 0))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(&indices, &expected);

        let column = &batch.columns()[0];
        let view = view_by_index(column, &selection).unwrap();
        prop_assert_eq!(view.len(), selection.len());
        for i in 0..view.len() {
            prop_assert_eq!(
                view.get(i).unwrap(),
                column.get(selection.get(i).unwrap()).unwrap()
            );
        }
    }
}
