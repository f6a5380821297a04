//! Collections loaded from result directories, compared across configurations.

use std::path::Path;

use equivbench_core::{
    BenchError, BenchmarkCollection, CollectionLayout, CompareConfig, Consensus, Dialect,
    IncompletePolicy, Metric, MultiComparator, PairwiseComparator, RunConfig, Style, Value,
};

const TIMER: &str = "\u{1b}[32mtotal: 4 calls, 1.0s\u{1b}[0m";

fn trailer(time: f64, status: &str) -> String {
    format!(
        "[runlim] real:\t{time} seconds\n\
         [runlim] time:\t{time} seconds\n\
         [runlim] space:\t100.0 MB\n\
         [runlim] status:\t{status}\n"
    )
}

fn write_run(dir: &Path, name: &str, stdout: &str, stderr: &str) {
    std::fs::write(dir.join(format!("{name}.out")), stdout).expect("write stdout");
    std::fs::write(dir.join(format!("{name}.err")), stderr).expect("write stderr");
}

fn load(dir: &Path) -> BenchmarkCollection {
    BenchmarkCollection::load(
        dir,
        &RunConfig::default(),
        &CollectionLayout::default(),
        IncompletePolicy::Skip,
    )
    .expect("load collection")
}

/// A finished run with the given time and equivalence outcome.
fn finished(dir: &Path, name: &str, time: f64, equiv: bool) {
    let stdout = if equiv {
        format!("{TIMER}\n")
    } else {
        format!("[NEQUIV] 0.5\n{TIMER}\n")
    };
    write_run(dir, name, &stdout, &trailer(time, "ok"));
}

#[test]
fn load_skips_incomplete_and_unpaired_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    finished(dir.path(), "good", 1.0, true);
    write_run(dir.path(), "truncated", TIMER, "[runlim] real:\t1.0\n");
    std::fs::write(dir.path().join("orphan.out"), TIMER).expect("write orphan");
    std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write notes");

    let collection = load(dir.path());
    assert_eq!(
        collection.names().collect::<Vec<_>>(),
        vec!["good", "orphan", "truncated"]
    );
    assert!(collection.get("good").is_some());
    assert!(collection.get("truncated").is_none());
    assert!(collection.get("orphan").is_none());
    assert_eq!(collection.present_count(), 1);
}

#[test]
fn load_with_abort_policy_surfaces_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_run(dir.path(), "truncated", TIMER, "[runlim] real:\t1.0\n");

    let err = BenchmarkCollection::load(
        dir.path(),
        &RunConfig::default(),
        &CollectionLayout::default(),
        IncompletePolicy::Abort,
    )
    .unwrap_err();
    assert!(err.is_incomplete());
}

#[test]
fn load_tolerates_invalid_utf8_captures() {
    let dir = tempfile::tempdir().expect("tempdir");
    finished(dir.path(), "good", 1.0, true);
    let mut stdout = b"solver says caf\xe9\n".to_vec();
    stdout.extend_from_slice(format!("{TIMER}\n").as_bytes());
    std::fs::write(dir.path().join("latin.out"), stdout).expect("write stdout");
    std::fs::write(dir.path().join("latin.err"), trailer(2.0, "ok")).expect("write stderr");

    let collection = load(dir.path());
    assert!(collection.get("good").is_some());
    let latin = collection.get("latin").expect("latin parsed");
    assert!(latin.succeeded());
    assert_eq!(Metric::Time.extract_number(latin), Some(2.0));
}

#[test]
fn load_skips_unreadable_capture() {
    let dir = tempfile::tempdir().expect("tempdir");
    finished(dir.path(), "good", 1.0, true);
    // a directory named like a capture opens but cannot be read
    std::fs::create_dir(dir.path().join("weird.out")).expect("mkdir");
    std::fs::write(dir.path().join("weird.err"), trailer(1.0, "ok")).expect("write stderr");

    let collection = load(dir.path());
    assert!(collection.get("good").is_some());
    assert!(collection.contains("weird"));
    assert!(collection.get("weird").is_none());
}

#[test]
fn pairwise_bolds_faster_configuration() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    finished(first.path(), "mnist_0", 5.0, true);
    finished(second.path(), "mnist_0", 3.0, true);
    finished(first.path(), "mnist_1", 2.0, true);

    let (c1, c2) = (load(first.path()), load(second.path()));
    let styled = PairwiseComparator::new(&c1, &c2).styled();

    assert_eq!(styled.table.rows.len(), 2);
    let row = &styled.table.rows[0];
    assert_eq!(row.benchmark, "mnist_0");
    assert_eq!(row.values[4], Value::Number(5.0));
    assert_eq!(row.values[5], Value::Number(3.0));
    let styles = &styled.styles[0];
    assert_eq!(styles[4], Style::Plain);
    assert_eq!(styles[5], Style::Bold);
    assert_eq!(styles[0], Style::Plain);
    assert_eq!(styles[1], Style::Plain);

    // absent from configuration 2: neither numeric cell is bold
    let row = &styled.table.rows[1];
    assert_eq!(row.benchmark, "mnist_1");
    assert_eq!(row.values[1], Value::Unknown);
    let styles = &styled.styles[1];
    assert_eq!(styles[1], Style::Failure);
    assert!(styles[2..].iter().all(|s| *s == Style::Plain));
}

#[test]
fn pairwise_marks_failed_status() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    finished(first.path(), "b", 1.0, true);
    write_run(second.path(), "b", "", &trailer(3600.0, "out of time"));

    let (c1, c2) = (load(first.path()), load(second.path()));
    let styled = PairwiseComparator::new(&c1, &c2).styled();
    assert_eq!(styled.table.rows[0].values[1], Value::Text("out of time".to_string()));
    assert_eq!(styled.styles[0][1], Style::Failure);
    assert_eq!(styled.styles[0][4], Style::Bold);
}

#[test]
fn multi_way_consensus_and_minimum() {
    let dirs: Vec<_> = (0..3).map(|_| tempfile::tempdir().expect("tempdir")).collect();
    // agree-on-equivalent
    finished(dirs[0].path(), "agree", 4.0, true);
    finished(dirs[1].path(), "agree", 2.0, true);
    finished(dirs[2].path(), "agree", 2.0, true);
    // disagree
    finished(dirs[0].path(), "split", 1.0, true);
    finished(dirs[1].path(), "split", 1.0, true);
    finished(dirs[2].path(), "split", 1.0, false);
    // only a failed run besides an unfinished one
    write_run(dirs[0].path(), "broken", "", &trailer(9.0, "out of memory"));
    write_run(dirs[1].path(), "broken", "", &trailer(9.0, "ok"));

    let collections: Vec<_> = dirs.iter().map(|d| load(d.path())).collect();
    let comparator = MultiComparator::new(
        ["a", "b", "c"]
            .into_iter()
            .zip(collections.iter()),
    );

    assert_eq!(comparator.consensus("agree"), Consensus::Equivalent);
    assert_eq!(comparator.consensus("split"), Consensus::Unknown);
    assert_eq!(comparator.consensus("broken"), Consensus::Unknown);

    let styled = comparator.styled(Metric::Time, true);
    assert_eq!(styled.table.columns, vec!["a", "b", "c", "Equiv"]);
    let names: Vec<_> = styled.table.rows.iter().map(|r| r.benchmark.as_str()).collect();
    assert_eq!(names, vec!["agree", "broken", "split"]);

    let agree = &styled.table.rows[0];
    assert_eq!(agree.values[3], Value::Text("equivalent".to_string()));
    assert_eq!(
        styled.styles[0],
        vec![Style::Plain, Style::Bold, Style::Bold, Style::Plain]
    );

    let broken = &styled.table.rows[1];
    assert_eq!(broken.values[0], Value::Failure("out of memory".to_string()));
    // clean exit without the completion timer still counts as failed
    assert_eq!(broken.values[1], Value::Failure("ok".to_string()));
    assert_eq!(broken.values[2], Value::Absent);
    assert_eq!(styled.styles[1][..3], [Style::Failure; 3]);
}

#[test]
fn multi_way_not_equivalent_consensus() {
    let dirs: Vec<_> = (0..2).map(|_| tempfile::tempdir().expect("tempdir")).collect();
    finished(dirs[0].path(), "x", 1.0, false);
    write_run(dirs[1].path(), "x", "", &trailer(9.0, "out of time"));

    let collections: Vec<_> = dirs.iter().map(|d| load(d.path())).collect();
    let comparator = MultiComparator::new(vec![
        ("first", &collections[0]),
        ("second", &collections[1]),
    ]);
    assert_eq!(comparator.consensus("x"), Consensus::NotEquivalent);
}

#[test]
fn config_file_drives_collection_loading() {
    let root = tempfile::tempdir().expect("tempdir");
    let cegar = root.path().join("cegar");
    let milp = root.path().join("milp");
    std::fs::create_dir_all(&cegar).expect("mkdir");
    std::fs::create_dir_all(&milp).expect("mkdir");
    finished(&cegar, "net", 3.0, true);
    write_run(
        &milp,
        "net",
        "Best objective 0.5, best bound 0.5, gap 0.0000%\n",
        &trailer(1.0, "ok"),
    );

    let config_path = root.path().join("compare.toml");
    std::fs::write(
        &config_path,
        r#"
        benchmarks = ["net", "other"]

        [[configuration]]
        label = "cegar"
        dir = "cegar"

        [[configuration]]
        label = "milp"
        dir = "milp"
        dialect = "milp"
        "#,
    )
    .expect("write config");

    let config = CompareConfig::load(&config_path).expect("config");
    assert_eq!(config.configurations[1].dialect, Dialect::Milp);
    let collections = config
        .load_collections(IncompletePolicy::Skip)
        .expect("collections");
    assert_eq!(collections.len(), 2);
    assert!(collections[0].1.contains("other"));

    let comparator = MultiComparator::new(collections.iter().map(|(l, c)| (l.as_str(), c)));
    let table = comparator.table(Metric::Time);
    assert_eq!(table.rows[0].values, vec![Value::Number(3.0), Value::Number(1.0)]);
    assert_eq!(table.rows[1].values, vec![Value::Absent, Value::Absent]);
    assert_eq!(comparator.consensus("net"), Consensus::Unknown);
}

#[test]
fn missing_directory_is_io_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let err = BenchmarkCollection::load(
        &root.path().join("absent"),
        &RunConfig::default(),
        &CollectionLayout::default(),
        IncompletePolicy::Skip,
    )
    .unwrap_err();
    assert!(matches!(err, BenchError::Io { .. }));
}
