use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parse_watch_with_global_flags() {
	let cli = Cli::try_parse_from(["almanac", "watch", "todo.txt", "-v", "--url", "http://analysis:9000"]).unwrap();
	assert!(cli.verbose);
	match cli.command {
		Command::Watch { ref file, interval } => {
			assert_eq!(file, &PathBuf::from("todo.txt"));
			assert_eq!(interval, 500);
		}
		ref other => panic!("unexpected command {other:?}"),
	}
}

#[test]
fn parse_preview_html() {
	let cli = Cli::try_parse_from(["almanac", "preview", "--html", "todo.txt"]).unwrap();
	assert!(matches!(cli.command, Command::Preview { html: true, .. }));
}

#[test]
fn flags_override_defaults() {
	let cli = Cli::try_parse_from(["almanac", "--todo-file-name", "tasks.txt", "--url", "http://analysis:9000", "clean"]).unwrap();
	let config = cli.load_config().unwrap();
	assert_eq!(config.rest_url, "http://analysis:9000");
	assert_eq!(config.todo_file_name, "tasks.txt");
	assert_eq!(config.debounce_ms, 250);
}

#[test]
fn invalid_url_override_is_rejected() {
	let cli = Cli::try_parse_from(["almanac", "--url", "nope", "trash"]).unwrap();
	assert!(matches!(cli.load_config(), Err(ConfigError::Url { .. })));
}

#[test]
fn subcommand_is_required() {
	assert!(Cli::try_parse_from(["almanac"]).is_err());
}
