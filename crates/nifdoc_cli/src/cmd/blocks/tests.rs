use nifdoc::nif::version::v;
use nifdoc_testkit::{NifBuilder, write_scratch};

use crate::cmd::test_support::{run_nifdoc, run_nifdoc_json, scene_fixture};

#[test]
fn blocks_json_lists_every_block_in_order() {
	let fixture = scene_fixture("cli_blocks_scene.nif");
	let json = run_nifdoc_json(&["blocks", &fixture, "--json"]);

	assert_eq!(json["count"], 4);
	let blocks = json["blocks"].as_array().expect("blocks array");
	let names: Vec<_> = blocks.iter().map(|b| b["name"].as_str().unwrap_or_default().to_owned()).collect();
	assert_eq!(names, ["Scene Root", "Arm", "Leg", "Foot"]);
	assert_eq!(blocks[2]["type"], "BSFadeNode");
	assert!(blocks.windows(2).all(|pair| pair[0]["offset"].as_u64() < pair[1]["offset"].as_u64()));
}

#[test]
fn blocks_type_filter_keeps_matching_rows() {
	let fixture = scene_fixture("cli_blocks_filter.nif");
	let json = run_nifdoc_json(&["blocks", &fixture, "--json", "--type", "BSFadeNode"]);
	assert_eq!(json["count"], 1);
	assert_eq!(json["blocks"][0]["index"], 2);
}

#[test]
fn lenient_flag_recovers_from_size_mismatch() {
	let mut builder = NifBuilder::new(v::V20_2_0_7).user(12, 83);
	let mut body = builder.node_body("Padded", &[]);
	body.extend_from_slice(&[0; 2]);
	let bytes = builder.block("NiNode", body).node("Next", &[]).build();
	let path = write_scratch("cli_blocks_padded.nif", &bytes);
	let path = path.to_string_lossy().into_owned();

	let strict = run_nifdoc(&["blocks", &path]);
	assert!(!strict.status.success());

	let json = run_nifdoc_json(&["--lenient", "blocks", &path, "--json"]);
	assert_eq!(json["blocks"][1]["name"], "Next");
}
