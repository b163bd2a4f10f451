use nqr_measurement::functions::{Domain, WindowFunction};
use nqr_measurement::measurement::{save_measurement, Measurement};
use nqr_measurement::panel::{
    Field, IndicatorState, MeasurementController, OutboundSignal, PanelConfig, Severity,
    SignalPayload, ViewMode,
};
use num_complex::Complex64;

fn controller() -> MeasurementController<Vec<OutboundSignal>> {
    MeasurementController::new(PanelConfig::default(), Vec::new())
}

fn measurement(name: &str, n: usize) -> Measurement {
    let tdx = (0..n).map(|k| k as f64 * 0.5).collect();
    let tdy = (0..n)
        .map(|k| Complex64::from_polar(1.0, k as f64 * 0.2))
        .collect();
    Measurement::new(tdx, tdy, 83.56e6, 0.0)
        .expect("valid measurement")
        .with_name(name)
}

fn notifications(signals: &[OutboundSignal]) -> Vec<(Severity, String)> {
    signals
        .iter()
        .filter_map(|s| match s {
            OutboundSignal::Notification { severity, message } => Some((*severity, message.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn measurement_cycle_updates_history_and_busy_state() {
    let mut panel = controller();

    assert!(panel.start_measurement());
    assert!(panel.model().is_busy());
    assert_eq!(panel.bus().last(), Some(&OutboundSignal::StartMeasurement));

    panel.busy_indicator_mut().animation_finished();
    assert!(panel.process_signal(
        "measurement_data",
        SignalPayload::Measurement(measurement("m1", 21))
    ));

    assert!(!panel.model().is_busy());
    assert_eq!(panel.busy_indicator().state(), IndicatorState::Hidden);
    assert_eq!(panel.model().displayed_measurement().unwrap().name(), "m1");
}

#[test]
fn data_arriving_during_fade_in_defers_hide() {
    let mut panel = controller();
    panel.start_measurement();
    panel.process_signal("measurement_data", SignalPayload::Measurement(measurement("m1", 5)));

    assert!(!panel.model().is_busy());
    assert!(panel.busy_indicator().is_visible());

    panel.busy_indicator_mut().animation_finished();
    assert_eq!(panel.busy_indicator().state(), IndicatorState::Hidden);
}

#[test]
fn history_keeps_arrival_order() {
    let mut panel = controller();
    for name in ["m1", "m2", "m3"] {
        panel.process_signal("measurement_data", SignalPayload::Measurement(measurement(name, 11)));
    }

    let names: Vec<&str> = panel.model().measurements().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["m1", "m2", "m3"]);
    assert_eq!(panel.model().displayed_measurement().unwrap().name(), "m3");

    panel.select_measurement(0).expect("select");
    let names: Vec<&str> = panel.model().measurements().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["m1", "m2", "m3"]);
    assert_eq!(panel.model().displayed_measurement().unwrap().name(), "m1");
}

#[test]
fn measurement_error_dismisses_and_notifies() {
    let mut panel = controller();
    panel.start_measurement();
    panel.process_signal("measurement_error", SignalPayload::None);

    assert!(!panel.model().is_busy());
    let notes = notifications(panel.bus());
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, Severity::Error);
    assert!(panel.model().measurements().is_empty());
}

#[test]
fn restart_after_error_during_fade_in_stays_busy() {
    let mut panel = controller();
    panel.start_measurement();
    panel.process_signal("measurement_error", SignalPayload::None);
    assert!(panel.busy_indicator().is_visible());

    assert!(panel.start_measurement());
    panel.busy_indicator_mut().animation_finished();

    assert!(panel.model().is_busy());
    assert_eq!(
        panel.busy_indicator().state(),
        IndicatorState::Showing { animating: false }
    );

    panel.process_signal("measurement_data", SignalPayload::Measurement(measurement("m1", 5)));
    assert_eq!(panel.busy_indicator().state(), IndicatorState::Hidden);
}

#[test]
fn stale_frequency_failure_is_ignored() {
    let mut panel = controller();
    panel.set_frequency("83.56");
    match panel.bus().last() {
        Some(OutboundSignal::SetFrequency(hz)) => assert!((hz - 83.56e6).abs() < 1e-3),
        other => panic!("expected set_frequency, got {:?}", other),
    }

    panel.process_signal("failure_set_frequency", SignalPayload::Text("83.5".into()));
    assert!(panel.model().field(Field::Frequency).valid);

    panel.process_signal("failure_set_frequency", SignalPayload::Text("83.56".into()));
    assert!(!panel.model().field(Field::Frequency).valid);
}

#[test]
fn averages_failure_and_correction() {
    let mut panel = controller();
    panel.set_averages("abc");
    assert!(!panel.model().field(Field::Averages).valid);
    assert!(panel.bus().is_empty());

    assert!(!panel.start_measurement());
    assert!(!panel.model().is_busy());
    assert_eq!(notifications(panel.bus())[0].0, Severity::Warning);

    panel.set_averages("256");
    assert!(panel.model().field(Field::Averages).valid);
    assert_eq!(panel.bus().last(), Some(&OutboundSignal::SetAverages("256".into())));

    panel.process_signal("failure_set_averages", SignalPayload::Text("256".into()));
    assert!(!panel.model().field(Field::Averages).valid);
}

#[test]
fn view_mode_toggles_between_two_states() {
    let mut panel = controller();
    assert_eq!(panel.model().view_mode(), ViewMode::Time);
    assert_eq!(panel.change_view_mode(), ViewMode::Fft);
    assert_eq!(panel.change_view_mode(), ViewMode::Time);
}

#[test]
fn active_spectrometer_label() {
    let mut panel = controller();
    panel.process_signal("active_spectrometer_changed", SignalPayload::Text("LimeNQR".into()));
    assert_eq!(panel.model().spectrometer_label(), "Active spectrometer: LimeNQR");
    assert!(!panel.process_signal("unrelated_key", SignalPayload::None));
}

#[test]
fn apodize_appends_and_keeps_source() {
    let mut panel = controller();
    let source = measurement("raw", 41);
    panel.add_measurement(source.clone());

    let index = panel.apodize(&WindowFunction::fid()).expect("apodized");
    assert_eq!(index, 1);
    assert_eq!(panel.model().measurements()[0], source);

    let apodized = panel.model().displayed_measurement().unwrap();
    assert_eq!(apodized.tdx(), source.tdx());
    assert_eq!(apodized.name(), "raw (apodized)");
}

#[test]
fn invalid_apodization_leaves_state_unchanged() {
    let mut panel = controller();
    panel.add_measurement(measurement("raw", 41));

    assert_eq!(panel.apodize_with("FID", &[("T2star", -1.0)]), None);
    assert_eq!(panel.model().measurements().len(), 1);
    assert_eq!(panel.model().displayed_index(), Some(0));
    assert_eq!(notifications(panel.bus())[0].0, Severity::Error);

    assert_eq!(panel.apodize_with("Lorentzian", &[]), None);
    assert_eq!(panel.apodize_with("gaussian", &[("sigma", 0.5)]), Some(1));
}

#[test]
fn window_undefined_at_time_zero_is_rejected() {
    let mut panel = controller();
    panel.add_measurement(measurement("raw", 41));

    let window = WindowFunction::custom("ln(x)", &[], Domain::Time).expect("parsed");
    assert_eq!(panel.apodize(&window), None);
    assert_eq!(panel.model().measurements().len(), 1);
    assert_eq!(notifications(panel.bus())[0].0, Severity::Error);
}

#[test]
fn apodize_without_measurement_warns() {
    let mut panel = controller();
    assert_eq!(panel.apodize(&WindowFunction::fid()), None);
    assert_eq!(notifications(panel.bus())[0].0, Severity::Warning);
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut panel = controller();
    panel.add_measurement(measurement("first", 17));

    let path = panel.save_measurement(&dir.path().join("run")).expect("saved");
    assert!(path.ends_with("run.meas"));

    let mut other = controller();
    let index = other.load_measurement(&path).expect("loaded");
    let loaded = &other.model().measurements()[index];
    let original = &panel.model().measurements()[0];

    assert_eq!(loaded.tdx(), original.tdx());
    for (a, b) in loaded.tdy().iter().zip(original.tdy()) {
        assert!((a - b).norm() < 1e-12);
    }
    assert_eq!(loaded.target_frequency(), original.target_frequency());
    assert_eq!(loaded.if_frequency(), original.if_frequency());
    assert_eq!(other.model().displayed_index(), Some(index));
}

#[test]
fn save_without_measurement_warns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut panel = controller();
    assert!(panel.save_measurement(&dir.path().join("empty")).is_none());
    assert_eq!(notifications(panel.bus())[0].0, Severity::Warning);
}

#[test]
fn load_failures_have_distinct_notifications() {
    let dir = tempfile::tempdir().expect("tempdir");
    let malformed = dir.path().join("malformed.meas");
    std::fs::write(&malformed, "{\"tdx\": [0.0, 0.5").unwrap();
    let incomplete = dir.path().join("incomplete.meas");
    std::fs::write(&incomplete, r#"{"tdy": [[1, 0], [1, 0]], "target_frequency": 1, "IF_frequency": 0}"#)
        .unwrap();

    let mut panel = controller();
    assert!(panel.load_measurement(&dir.path().join("missing.meas")).is_none());
    assert!(panel.load_measurement(&malformed).is_none());
    assert!(panel.load_measurement(&incomplete).is_none());

    let messages: Vec<String> = notifications(panel.bus()).into_iter().map(|(_, m)| m).collect();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].starts_with("File not found"));
    assert!(messages[1].contains("JSON"));
    assert!(messages[2].contains("'tdx'"));
    assert!(panel.model().measurements().is_empty());
}

#[test]
fn saved_file_loads_through_library_api() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("direct.meas");
    save_measurement(&measurement("direct", 9), &path).expect("save");

    let mut panel = controller();
    assert_eq!(panel.load_measurement(&path), Some(0));
    assert_eq!(panel.model().displayed_measurement().unwrap().name(), "direct");
}
