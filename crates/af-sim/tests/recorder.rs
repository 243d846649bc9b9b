//! Recorder integration: model tick → frame → gzip file → version-checked
//! read-back.

use af_bus::{InMemoryBus, SimVar, VariableBus};
use af_recorder::{FlightDataRecorder, FrameReader, RecorderSettings, INTERFACE_VERSION};
use af_sim::{AircraftModel, ModelOptions};

#[test]
fn model_frames_roundtrip_through_recorder() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = AircraftModel::new(ModelOptions::default());
    let mut bus = InMemoryBus::new();
    bus.set(SimVar::SimOnGround, 1.0);
    bus.set(SimVar::AmbientTemperatureDegC, 15.0);
    bus.set(SimVar::AmbientPressureMbar, 1013.25);
    bus.set(SimVar::FuelWeightPerGallonLbs, 6.7);
    bus.set(SimVar::Mach, 0.0);

    let mut recorder =
        FlightDataRecorder::new(dir.path().to_path_buf(), RecorderSettings::default());

    let mut t = 0.0;
    for _ in 0..25 {
        t += 0.1;
        bus.set(SimVar::AnimationDeltaTime, t);
        model.update(&mut bus, 0.1, t);
        recorder.record(&model.recorder_frame(&bus, t));
    }
    recorder.finish();

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let mut reader = FrameReader::open(&files[0], true).unwrap();
    assert_eq!(reader.version(), INTERFACE_VERSION);
    reader.check_version().unwrap();

    let mut count = 0;
    let mut last_time = 0.0;
    while let Some(frame) = reader.next_frame().unwrap() {
        count += 1;
        assert!(frame.ap_sm.simulation_time_s > last_time);
        last_time = frame.ap_sm.simulation_time_s;
        // Idle thrust limit is republished by the model every tick
        assert!(frame.additional.thrust_limit_clb > 0.0);
    }
    assert_eq!(count, 25);
}
