use psl_query_stats::cli::{wants_help, CliError, CliSpec};

fn search_space_cli() -> CliSpec {
    CliSpec {
        program: "search_space".to_owned(),
        synopsis: "[--prune-dups] <output file>",
        toggles: &["--prune-dups"],
        max_paths: Some(1),
    }
}

fn args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| (*arg).to_owned()).collect()
}

#[test]
fn test_paths_and_toggles() {
    let cli = search_space_cli();

    let parsed = cli.parse(&args(&["out.txt"])).unwrap();
    assert_eq!(parsed.paths, ["out.txt"]);
    assert!(!parsed.has("--prune-dups"));

    let parsed = cli.parse(&args(&["--prune-dups", "out.txt"])).unwrap();
    assert_eq!(parsed.paths, ["out.txt"]);
    assert!(parsed.has("--prune-dups"));
}

#[test]
fn test_help() {
    let cli = search_space_cli();
    for help in ["help", "--help", "-h-e-l-p", "HELP"] {
        let err = cli.parse(&args(&[help, "out.txt"])).unwrap_err();
        assert_eq!(
            err,
            CliError::Usage("search_space [--prune-dups] <output file>".to_owned())
        );
        assert_eq!(err.exit_code(), 1, "{help}");
    }
    assert!(!wants_help(&args(&["helpful.txt"])));
}

#[test]
fn test_wrong_path_count() {
    let cli = search_space_cli();

    let err = cli.parse(&[]).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert_eq!(
        err.to_string(),
        "USAGE: search_space [--prune-dups] <output file>"
    );

    let err = cli.parse(&args(&["a.txt", "b.txt"])).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));

    let many = CliSpec {
        max_paths: None,
        ..search_space_cli()
    };
    let parsed = many.parse(&args(&["a.txt", "b.txt", "c.txt"])).unwrap();
    assert_eq!(parsed.paths.len(), 3);
}

#[test]
fn test_bad_option() {
    let cli = search_space_cli();
    let err = cli.parse(&args(&["--prune", "out.txt"])).unwrap_err();

    assert_eq!(err, CliError::BadOption("--prune".to_owned()));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.to_string(), "Bad option: '--prune'.");
}
