use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use nifdoc::nif::version::v;
use nifdoc_testkit::{NifBuilder, target_dir as workspace_target_dir, write_scratch};

static NIFDOC_BIN: OnceLock<PathBuf> = OnceLock::new();

/// Fallout 3 style scene: root with two children, one of them a fade node with a grandchild.
pub(crate) fn scene_fixture(name: &str) -> String {
	let bytes = NifBuilder::new(v::V20_2_0_7)
		.user(11, 34)
		.node("Scene Root", &[1, 2])
		.node("Arm", &[])
		.typed_node("BSFadeNode", "Leg", &[3])
		.node("Foot", &[])
		.root(0)
		.build();
	write_scratch(name, &bytes).to_string_lossy().into_owned()
}

pub(crate) fn run_nifdoc(args: &[&str]) -> Output {
	Command::new(nifdoc_bin()).args(args).output().expect("nifdoc command executes")
}

pub(crate) fn run_nifdoc_json(args: &[&str]) -> serde_json::Value {
	let output = run_nifdoc(args);
	assert!(
		output.status.success(),
		"nifdoc command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

pub(crate) fn run_nifdoc_text(args: &[&str]) -> String {
	let output = run_nifdoc(args);
	assert!(
		output.status.success(),
		"nifdoc command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

fn nifdoc_bin() -> &'static PathBuf {
	NIFDOC_BIN.get_or_init(resolve_nifdoc_bin)
}

fn resolve_nifdoc_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_nifdoc") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "nifdoc.exe" } else { "nifdoc" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "nifdoc"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build nifdoc binary at {}", bin.display());

	bin
}
