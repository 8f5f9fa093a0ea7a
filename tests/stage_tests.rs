//! ConversionStage Tests
//!
//! Routing and mutual-exclusion behavior of the conversion stage.

use crossbeam::channel::unbounded;

use regionkv::{
    ConversionOutcome, ConversionStage, Disposition, RecordSchema, RejectPolicy, StoreError,
};

/// Converter used throughout: parses decimal strings, rejects the rest
fn parse_i64(input: &String) -> Option<i64> {
    input.parse().ok()
}

fn stage() -> ConversionStage<String, i64, fn(&String) -> Option<i64>> {
    let schema = RecordSchema::new("java.lang.Long").unwrap();
    ConversionStage::new(schema, parse_i64 as fn(&String) -> Option<i64>)
}

// =============================================================================
// Routing Tests
// =============================================================================

#[test]
fn test_mixed_records_route_to_exactly_one_port_each() {
    let mut stage = stage();
    let (out_tx, out_rx) = unbounded();
    let (err_tx, err_rx) = unbounded();
    stage.connect_output(out_tx);
    stage.connect_error(err_tx);

    assert_eq!(stage.process("42".to_string()), Disposition::EmittedPrimary);
    assert_eq!(
        stage.process("not a number".to_string()),
        Disposition::EmittedError
    );

    // Exactly one emission per port, each the expected record
    assert_eq!(out_rx.try_iter().collect::<Vec<_>>(), vec![42]);
    assert_eq!(
        err_rx.try_iter().collect::<Vec<_>>(),
        vec!["not a number".to_string()]
    );
}

#[test]
fn test_error_port_disconnected_drops_rejects_and_counts() {
    let mut stage = stage();
    let (out_tx, out_rx) = unbounded();
    stage.connect_output(out_tx);

    assert_eq!(stage.process("nope".to_string()), Disposition::Dropped);
    assert_eq!(stage.process("7".to_string()), Disposition::EmittedPrimary);
    assert_eq!(stage.process("also nope".to_string()), Disposition::Dropped);

    // Primary emissions unaffected by the missing error listener
    assert_eq!(out_rx.try_iter().collect::<Vec<_>>(), vec![7]);
    assert_eq!(stage.rejected_dropped(), 2);
}

#[test]
fn test_primary_port_disconnected_drops_converted_records() {
    let mut stage = stage();
    let (err_tx, err_rx) = unbounded();
    stage.connect_error(err_tx);

    assert_eq!(stage.process("13".to_string()), Disposition::Dropped);
    assert_eq!(stage.process("bad".to_string()), Disposition::EmittedError);

    assert_eq!(err_rx.try_iter().collect::<Vec<_>>(), vec!["bad".to_string()]);
    // Converted-but-unheard records are not rejects
    assert_eq!(stage.rejected_dropped(), 0);
}

#[test]
fn test_dropped_receiver_counts_as_no_listener() {
    let mut stage = stage();
    let (err_tx, err_rx) = unbounded::<String>();
    stage.connect_error(err_tx);
    drop(err_rx);

    assert_eq!(stage.process("bad".to_string()), Disposition::Dropped);
    assert_eq!(stage.rejected_dropped(), 1);
}

// =============================================================================
// Policy and Binding Tests
// =============================================================================

#[test]
fn test_reject_policy_drop_stays_silent() {
    let mut stage = stage().with_reject_policy(RejectPolicy::Drop);

    assert_eq!(stage.process("bad".to_string()), Disposition::Dropped);
    assert_eq!(stage.rejected_dropped(), 0);
}

#[test]
fn test_schema_rejects_empty_type_name() {
    match RecordSchema::new("") {
        Err(StoreError::Config(_)) => {}
        _ => panic!("Expected config error for empty type name"),
    }
}

#[test]
fn test_schema_is_readable_from_the_stage() {
    let stage = stage();
    assert_eq!(stage.schema().type_name(), "java.lang.Long");
}

// =============================================================================
// Outcome Tests
// =============================================================================

#[test]
fn test_convert_one_has_exactly_two_outcomes() {
    let mut stage = stage();

    match stage.convert_one("99".to_string()) {
        ConversionOutcome::Converted(n) => assert_eq!(n, 99),
        ConversionOutcome::Rejected(_) => panic!("Expected conversion"),
    }

    match stage.convert_one("x".to_string()) {
        ConversionOutcome::Rejected(original) => assert_eq!(original, "x"),
        ConversionOutcome::Converted(_) => panic!("Expected rejection"),
    }
}

#[test]
fn test_closure_converter_with_state() {
    let schema = RecordSchema::new("com.example.Order").unwrap();
    let mut seen = 0u32;
    let mut stage = ConversionStage::new(schema, move |input: &Vec<u8>| {
        seen += 1;
        if input.is_empty() {
            None
        } else {
            Some(seen)
        }
    });

    let (out_tx, out_rx) = unbounded();
    stage.connect_output(out_tx);

    assert_eq!(stage.process(b"a".to_vec()), Disposition::EmittedPrimary);
    assert_eq!(stage.process(Vec::new()), Disposition::Dropped);
    assert_eq!(stage.process(b"b".to_vec()), Disposition::EmittedPrimary);

    // The converter saw every record, including the rejected one
    assert_eq!(out_rx.try_iter().collect::<Vec<_>>(), vec![1, 3]);
}
