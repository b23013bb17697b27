use std::fs;
use std::path::PathBuf;

use dronegrid::*;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dronegrid-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn file_loader_reads_a_commented_grid() {
    let path = scratch_file(
        "commented.txt",
        "# 3x3 demo\n3\n0 1 2\n3 4 5  # middle row\n6 7 -8\n",
    );

    let field = GridFileLoader::new(&path, 0.5).unwrap().load_grid().unwrap();

    assert_eq!(field.side(), 3);
    assert_eq!(field.base(Vec2::new(1, 1)).unwrap(), 4);
    assert_eq!(field.base(Vec2::new(0, 2)).unwrap(), 6);
    assert_eq!(field.base(Vec2::new(2, 2)).unwrap(), 0);
    assert_eq!(field.increment(Vec2::new(2, 1)).unwrap(), 3);
}

#[test]
fn file_loader_reports_path_and_cause() {
    let path = scratch_file("short.txt", "3\n1 2 3\n4 5 6\n");

    let err = GridFileLoader::new(&path, 0.5).unwrap().load_grid().unwrap_err();
    let (reported, message) = match err {
        Error::Load { path, message } => (path, message),
        other => panic!("expected a load error, got {other:?}"),
    };
    assert_eq!(reported, path);
    assert!(message.contains("not enough grid rows"), "{message}");

    let missing = path.with_file_name("does-not-exist.txt");
    let err = GridFileLoader::new(&missing, 0.5).unwrap().load_grid().unwrap_err();
    assert!(matches!(err, Error::Load { .. }));
}

#[test]
fn file_loader_rejects_negative_rate() {
    assert!(matches!(
        GridFileLoader::new("grid.txt", -0.1),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn config_file_is_overridden_by_command_line() {
    let path = scratch_file(
        "run.toml",
        r#"
file = "grids/from-file.txt"
steps = 100
time_ms = 25
regrowth_rate = 0.2
allow_stay = false
second_step = "independent"
starts = [[0, 0], [2, 3]]
"#,
    );

    let from_file = PartialConfig::load(&path).unwrap();
    let cli = PartialConfig {
        steps: Some(7),
        allow_stay: Some(true),
        ..PartialConfig::default()
    };

    let cfg = from_file.overlay(cli).resolve().unwrap();

    assert_eq!(cfg.file, PathBuf::from("grids/from-file.txt"));
    assert_eq!(cfg.run.total_steps, 7);
    assert_eq!(cfg.run.time_budget_ms, 25);
    assert_eq!(cfg.run.horizon, 2);
    assert!(cfg.run.allow_stay);
    assert_eq!(cfg.run.second_step, SecondStep::Independent);
    assert_eq!(cfg.starts, vec![Vec2::new(0, 0), Vec2::new(2, 3)]);
    assert_eq!(cfg.regrowth_rate, 0.2);
}

#[test]
fn malformed_config_file_is_an_error() {
    let path = scratch_file("broken.toml", "steps = \"many\"\n");
    assert!(matches!(PartialConfig::load(&path), Err(Error::ConfigFile(_))));

    let missing = path.with_file_name("absent.toml");
    assert!(matches!(PartialConfig::load(&missing), Err(Error::Io(_))));
}

#[test]
fn end_to_end_run_serializes_expected_shape() {
    let grid = scratch_file("e2e.txt", "2\n5 1\n2 8\n");
    let cfg = PartialConfig {
        file: Some(grid),
        steps: Some(4),
        time_ms: Some(5_000),
        regrowth_rate: Some(1.0),
        starts: Some(vec![[0, 0], [1, 1]]),
        ..PartialConfig::default()
    }
    .resolve()
    .unwrap();

    let loader = GridFileLoader::new(cfg.file.clone(), cfg.regrowth_rate).unwrap();
    let mut strategy = Strategy::greedy(Box::new(loader), cfg.starts.clone(), cfg.run.clone());
    strategy.load().unwrap();
    let result = strategy.run().unwrap();

    let json: serde_json::Value = serde_json::from_str(&to_json(&result, false).unwrap()).unwrap();

    assert_eq!(json["score"], result.total_score);
    assert_eq!(json["drones"], 2);
    assert!(json["time_elapsed_ms"].is_u64());

    let paths = json["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[1]["drone_id"], 1);
    assert_eq!(paths[1]["steps"], 4);

    let first = &paths[1]["path"][0];
    assert_eq!(first["t"], 0);
    assert_eq!(first["x"], 1);
    assert_eq!(first["y"], 1);
    assert_eq!(first["value"], 8);

    let mut buf = Vec::new();
    write_json(&mut buf, &result, true).unwrap();
    let pretty: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(pretty, json);
}
