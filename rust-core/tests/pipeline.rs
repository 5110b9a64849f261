use eeg_bandpower::data::SignalLoader;
use eeg_bandpower::{
    calculate_band_powers, AnalysisParameters, BandPowerError, BandPowerPipeline, FilterStatus,
    FrequencyBand, RunStatus,
};
use std::f64::consts::PI;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
        .collect()
}

/// Write `channels` as columns under a header row
fn write_signal_file(dir: &TempDir, name: &str, channels: &[Vec<f64>], delimiter: char) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();

    let sep = delimiter.to_string();

    let header: Vec<String> = (0..channels.len()).map(|c| format!("ch{}", c)).collect();
    writeln!(file, "{}", header.join(sep.as_str())).unwrap();

    for i in 0..channels[0].len() {
        let row: Vec<String> = channels.iter().map(|c| c[i].to_string()).collect();
        writeln!(file, "{}", row.join(sep.as_str())).unwrap();
    }
    path
}

fn write_text(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn run(path: &Path, params: &AnalysisParameters) -> (eeg_bandpower::BandPowerReport, Vec<u8>) {
    let mut seen = Vec::new();
    let mut sink = |p: u8| seen.push(p);
    let report = calculate_band_powers(path, params, Some(&mut sink)).unwrap();
    (report, seen)
}

#[test]
fn test_ten_second_recording_gives_nine_epochs() {
    let dir = TempDir::new().unwrap();
    let path = write_signal_file(&dir, "rec.csv", &[sine(10.0, 128.0, 1280)], ',');

    let (report, progress) = run(&path, &AnalysisParameters::default());

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.nperseg, 256);
    assert_eq!(
        report.filter,
        Some(FilterStatus::Applied {
            low_hz: 0.5,
            high_hz: 35.0
        })
    );
    assert_eq!(report.table.times(), (1..=9).collect::<Vec<i64>>());
    assert_eq!(progress.first(), Some(&0));
    assert_eq!(progress.last(), Some(&100));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_sinusoid_lands_in_its_band() {
    let fs = 128.0;
    let n = 30 * 128;
    let cases = [
        (2.0, FrequencyBand::Delta),
        (6.0, FrequencyBand::Theta),
        (10.0, FrequencyBand::Alpha),
        (20.0, FrequencyBand::Beta),
    ];

    let dir = TempDir::new().unwrap();
    let channels: Vec<Vec<f64>> = cases.iter().map(|(f, _)| sine(*f, fs, n)).collect();
    let path = write_signal_file(&dir, "bands.csv", &channels, ',');

    for (channel_index, (freq, expected)) in cases.iter().enumerate() {
        let params = AnalysisParameters {
            channel_index,
            ..Default::default()
        };
        let (report, _) = run(&path, &params);
        assert_eq!(report.table.len(), 29);

        for row in &report.table {
            let target = row.band(*expected);
            let interior = row.time >= 4 && row.time <= 26;
            let limit = if interior { 1e-3 } else { 5e-2 };

            for band in FrequencyBand::ALL {
                if band != *expected {
                    assert!(
                        row.band(band) < limit * target,
                        "{} Hz, t={}: {} = {} vs {} = {}",
                        freq,
                        row.time,
                        band,
                        row.band(band),
                        expected,
                        target
                    );
                }
            }
            // Unit sine carries 0.5 power, all of it inside [1, 30)
            if interior {
                assert!((row.total_power - 0.5).abs() < 0.05, "total {}", row.total_power);
            }
        }
    }
}

#[test]
fn test_analysis_range_narrows_total_power() {
    let dir = TempDir::new().unwrap();
    let path = write_signal_file(&dir, "alpha.csv", &[sine(10.0, 128.0, 2560)], ',');

    let params = AnalysisParameters {
        lower_bound: 12.0,
        upper_bound: 30.0,
        ..Default::default()
    };
    let (report, _) = run(&path, &params);
    assert_eq!(report.table.len(), 19);

    for row in &report.table {
        assert_eq!(row.delta, 0.0);
        assert_eq!(row.theta, 0.0);
        if row.time >= 4 && row.time <= 16 {
            assert!(row.total_power < 1e-3, "t={}: {}", row.time, row.total_power);
        }
    }
}

#[test]
fn test_signal_shorter_than_epoch_gives_empty_table() {
    let dir = TempDir::new().unwrap();
    let path = write_signal_file(&dir, "short.csv", &[sine(10.0, 128.0, 100)], ',');

    let (report, progress) = run(&path, &AnalysisParameters::default());

    assert!(report.table.is_empty());
    assert_eq!(
        report.status,
        RunStatus::InsufficientData {
            nperseg: 256,
            available: 100
        }
    );
    assert_eq!(progress.last(), Some(&100));
}

#[test]
fn test_zero_epoch_length_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = write_signal_file(&dir, "rec.csv", &[sine(10.0, 128.0, 1280)], ',');
    let params = AnalysisParameters {
        epoch_length: 0.0,
        ..Default::default()
    };

    let err = calculate_band_powers(&path, &params, None).unwrap_err();
    assert!(matches!(err, BandPowerError::InvalidParameters(_)));
}

#[test]
fn test_missing_file() {
    let err = calculate_band_powers(
        Path::new("/no/such/recording.csv"),
        &AnalysisParameters::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, BandPowerError::FileNotFound { .. }));
}

#[test]
fn test_out_of_range_channel() {
    let dir = TempDir::new().unwrap();
    let path = write_signal_file(&dir, "rec.csv", &[vec![1.0; 300], vec![2.0; 300]], ',');
    let params = AnalysisParameters {
        channel_index: 2,
        ..Default::default()
    };

    let err = calculate_band_powers(&path, &params, None).unwrap_err();
    assert!(matches!(err, BandPowerError::InvalidData { column: 2, .. }));
}

#[test]
fn test_header_only_file() {
    let dir = TempDir::new().unwrap();
    let path = write_text(&dir, "empty.csv", "ch0,ch1\n");

    let err = calculate_band_powers(&path, &AnalysisParameters::default(), None).unwrap_err();
    assert!(matches!(err, BandPowerError::InvalidData { .. }));
}

#[test]
fn test_non_numeric_value() {
    let dir = TempDir::new().unwrap();
    let path = write_text(&dir, "bad.csv", "ch0\n1.0\n2.0\noops\n3.0\n");

    let err = calculate_band_powers(&path, &AnalysisParameters::default(), None).unwrap_err();
    assert!(matches!(err, BandPowerError::InvalidData { column: 0, .. }));
}

#[test]
fn test_tab_delimited_input() {
    let dir = TempDir::new().unwrap();
    let path = write_signal_file(&dir, "rec.tsv", &[sine(6.0, 128.0, 1280)], '\t');

    let report = BandPowerPipeline::new(AnalysisParameters::default())
        .with_loader(SignalLoader::new().delimiter(b'\t'))
        .run(&path, None)
        .unwrap();

    assert_eq!(report.table.len(), 9);
}

#[test]
fn test_results_are_deterministic_and_well_formed() {
    let dir = TempDir::new().unwrap();
    let signal: Vec<f64> = (0..2000)
        .map(|i| {
            let t = i as f64 / 128.0;
            3.0 * (2.0 * PI * 2.5 * t).sin() + (2.0 * PI * 17.0 * t).cos() + 0.01 * t
        })
        .collect();
    let path = write_signal_file(&dir, "mix.csv", &[signal], ',');

    let (first, _) = run(&path, &AnalysisParameters::default());
    let (second, _) = run(&path, &AnalysisParameters::default());
    assert_eq!(first.table, second.table);

    let times = first.table.times();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));

    for row in &first.table {
        for value in &row.values()[1..] {
            assert!(value.is_finite() && *value >= 0.0);
        }
        let band_sum = row.delta + row.theta + row.alpha + row.beta;
        assert!(band_sum <= row.total_power + 1e-9);
    }
}

#[test]
fn test_export_round_trip_layout() {
    let dir = TempDir::new().unwrap();
    let path = write_signal_file(&dir, "rec.csv", &[sine(10.0, 128.0, 1280)], ',');
    let (report, _) = run(&path, &AnalysisParameters::default());

    let out = eeg_bandpower::data::default_output_path(&path);
    report.table.save_csv(&out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "Time,Delta,Theta,Alpha,Beta,Total Power");
    assert!(lines[1].starts_with("1,"));
    assert!(lines[9].starts_with("9,"));
    for line in &lines[1..] {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 6);
        for value in &fields[1..] {
            assert_eq!(value.split('.').nth(1).map(str::len), Some(4));
        }
    }
}
