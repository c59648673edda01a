use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use super::*;

fn write(root: &Path, entry: &str, bytes: &[u8]) {
	let path = root.join(entry);
	fs::create_dir_all(path.parent().expect("entry has a parent")).expect("must create dirs");
	fs::write(path, bytes).expect("must write entry");
}

fn session(root: &Path) -> Session {
	let shared = root.join("shared");
	let tenant = root.join("tenant");
	write(&shared, "org/example/Widget.mod", b"shared");
	write(&shared, "META-INF/codec", b"shared");
	write(&tenant, "org/example/Gadget.mod", b"tenant");
	write(&tenant, "META-INF/codec", b"tenant");

	let config = Config::parse(&format!(
		r#"
[[environment]]
name = "Shared"
paths = [{shared:?}]

[[environment]]
name = "Tenant"
paths = [{tenant:?}]

[[consumer]]
name = "webapp"
environments = ["tenant", "shared"]
"#,
		shared = shared.display().to_string(),
		tenant = tenant.display().to_string(),
	))
	.expect("config parses");
	Session::open(config)
}

fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<bool>) -> (bool, String) {
	let mut out = Vec::new();
	let ok = run(&mut out).expect("command succeeds");
	(ok, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn lists_environments_in_name_order() {
	let root = tempfile::tempdir().expect("must create tempdir");
	let session = session(root.path());

	let (ok, text) = output(|out| environments(&session, out));
	assert!(ok);
	let headers: Vec<_> = text.lines().filter(|line| !line.starts_with(' ')).collect();
	assert_eq!(headers, vec!["Shared\t1 paths", "Tenant\t1 paths"]);
	let locations: Vec<_> = text.lines().filter(|line| line.starts_with("  file:")).collect();
	assert_eq!(locations.len(), 2);
	assert!(locations.iter().all(|line| line.ends_with("\tdirectory")));
}

#[test]
fn resolve_reports_origin_and_misses() {
	let root = tempfile::tempdir().expect("must create tempdir");
	let session = session(root.path());
	let names = ["org.example.Widget".to_string(), "org.example.Gadget".to_string(), "Missing".to_string()];

	let (ok, text) = output(|out| resolve(&session, "webapp", &names, out));
	assert!(!ok);
	let lines: Vec<_> = text.lines().collect();
	assert!(lines[0].starts_with("org.example.Widget\tShared\tfile:"));
	assert!(lines[1].starts_with("org.example.Gadget\tTenant\tfile:"));
	assert_eq!(lines[2], "Missing\t-");
}

#[test]
fn unknown_consumer_is_an_error() {
	let root = tempfile::tempdir().expect("must create tempdir");
	let session = session(root.path());
	let err = resolve(&session, "nobody", &[], &mut Vec::<u8>::new()).unwrap_err();
	assert!(err.to_string().contains("nobody"));
}

#[test]
fn resource_follows_environment_order() {
	let root = tempfile::tempdir().expect("must create tempdir");
	let session = session(root.path());

	let (ok, one) = output(|out| resource(&session, "webapp", "META-INF/codec", false, out));
	assert!(ok);
	assert!(one.trim_end().ends_with("/tenant/META-INF/codec"));

	let (ok, all) = output(|out| resource(&session, "webapp", "META-INF/codec", true, out));
	assert!(ok);
	assert_eq!(all, one);

	let (ok, none) = output(|out| resource(&session, "webapp", "META-INF/none", true, out));
	assert!(!ok);
	assert!(none.is_empty());
}
