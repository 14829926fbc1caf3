use vericast_qc::{PlausibleRange, QcConfig, QcRejection};

#[test]
fn sentinel_temperature_is_rejected() {
    let qc = QcConfig::default();
    assert!(!qc.accept(Some(999.9), "temperature_2m"));
}

#[test]
fn custom_variable_range() {
    let qc = QcConfig::default().with_range("dewpoint_2m", PlausibleRange::new(200.0, 320.0));
    assert!(qc.validate().is_ok());
    assert!(qc.accept(Some(280.0), "dewpoint_2m"));
    assert!(matches!(
        qc.check(Some(150.0), "dewpoint_2m"),
        Err(QcRejection::OutOfRange { .. })
    ));
}

#[test]
fn empty_config_only_rejects_missing_and_non_finite() {
    let qc = QcConfig::empty();
    assert!(qc.accept(Some(999.9), "temperature_2m"));
    assert!(qc.accept(Some(-40_000.0), "mslp"));
    assert!(!qc.accept(None, "mslp"));
    assert!(!qc.accept(Some(f64::NEG_INFINITY), "mslp"));
}
