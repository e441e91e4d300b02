use psl_query_stats::{
    final_timestamp, final_timestamp_of_file, full_run_times, path_ids, phase_table, FullRun,
    PhaseTimes, RunType,
};
use std::path::Path;

mod common;
use common::cell;

const LOGGER: &str = "[main] INFO  org.linqs.psl";

fn full_run(path: &str, time: u64) -> FullRun {
    FullRun::from_path(Path::new(path), time).unwrap()
}

#[test]
fn test_full_run_from_path() {
    let run = full_run("results/citeseer/full_run_fastest/out.txt", 1200);
    assert_eq!(run.dataset, "citeseer");
    assert_eq!(run.run_type, RunType::Optimal);
    assert_eq!(run.time, 1200);

    assert!(FullRun::from_path(Path::new("results/citeseer/rewrites/out.txt"), 5).is_none());
    assert_eq!(
        RunType::from_dir_name("full_run_s_score"),
        Some(RunType::Chosen)
    );
}

#[test]
fn test_final_timestamp() {
    let lines = [
        format!("100 {LOGGER}.Launcher  - Loading data"),
        "    at org.linqs.psl.Foo(Foo.java:12)".to_owned(),
        format!("2500 {LOGGER}.Launcher  - Inference Complete"),
        "Exception trace without a timestamp".to_owned(),
    ];
    assert_eq!(final_timestamp(&lines), Some(2500));
    assert_eq!(final_timestamp(["no timestamps here"]), None);
}

#[test]
fn test_final_timestamp_of_file() {
    let path = std::env::temp_dir().join(format!(
        "psl_query_stats_full_run_{}.txt",
        std::process::id()
    ));
    std::fs::write(&path, format!("10 {LOGGER} - a\n\n345 {LOGGER} - b\n")).unwrap();
    let time = final_timestamp_of_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(time, Some(345));
}

#[test]
fn test_full_run_times_table() {
    let runs = [
        full_run("out/epinions/full_run_base/1.txt", 1000),
        full_run("out/citeseer/full_run_base/1.txt", 400),
        full_run("out/citeseer/full_run_base/2.txt", 600),
        full_run("out/citeseer/full_run_s_score/1.txt", 300),
        full_run("out/citeseer/full_run_fastest/1.txt", 250),
        full_run("out/citeseer/full_run_fastest/2.txt", 250),
    ];
    let table = full_run_times(&runs);

    assert_eq!(
        table.headers(),
        ["Dataset", "Base Time", "Optimal Time", "Chosen Time"]
    );
    assert_eq!(table.rows().len(), 2, "one row per dataset");
    assert_eq!(
        table.rows()[0],
        ["citeseer", "500 ± 100", "250 ± 0", "300 ± 0"]
    );
    assert_eq!(cell(&table, 1, "Dataset"), "epinions");
    assert_eq!(cell(&table, 1, "Base Time"), "1000 ± 0");
    assert_eq!(cell(&table, 1, "Chosen Time"), "");
}

#[test]
fn test_phase_times() {
    let lines = [
        format!("50 {LOGGER}.Launcher  - Grounding 1 rule(s) with query: ( A(x) )"),
        format!("80 {LOGGER}.Launcher  - Generated 10 ground rules with query: ( A(x) )"),
        "some output between the spans".to_owned(),
        format!("100 {LOGGER}.Launcher  - Grounding 2 rule(s) with query: ( B(x) )"),
        format!("145 {LOGGER}.Launcher  - Generated 7 ground rules with query: ( B(x) )"),
        format!("150 {LOGGER}.Launcher  - Initializing objective terms for 17 ground rules"),
        format!("900 {LOGGER}.Launcher  - Inference Complete"),
    ];
    let times = PhaseTimes::from_lines(&lines);
    assert_eq!(
        times,
        PhaseTimes {
            grounding_time: Some(30 + 45),
            total_time: Some(900),
        }
    );

    // A run that dies while grounding.
    let unfinished = PhaseTimes::from_lines(&lines[..3]);
    assert_eq!(unfinished.grounding_time, None);
    assert_eq!(unfinished.total_time, None);
}

#[test]
fn test_phase_table() {
    let paths: Vec<String> = [
        "/runs/citeseer/full/out.txt",
        "/runs/epinions/full/out.txt",
        "/runs/lastfm/full/out.txt",
    ]
    .map(str::to_owned)
    .to_vec();
    let ids = path_ids(&paths);
    assert_eq!(ids, ["citeseer", "epinions", "lastfm"]);
    assert_eq!(path_ids(&paths[..1]), [paths[0].clone()]);

    let entries = vec![
        (
            ids[0].clone(),
            PhaseTimes {
                grounding_time: Some(75),
                total_time: Some(900),
            },
        ),
        (ids[1].clone(), PhaseTimes::default()),
    ];
    let table = phase_table(&entries);

    assert_eq!(
        table.headers(),
        ["ID", "Grounding Time (ms)", "Total Time (ms)"]
    );
    assert_eq!(table.rows()[0], ["citeseer", "75", "900"]);
    assert_eq!(table.rows()[1], ["epinions", "", ""]);
}
